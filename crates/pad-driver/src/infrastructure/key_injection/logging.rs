//! Key sink that logs events instead of touching the OS.

use pad_core::KeyCode;
use tracing::info;

use crate::application::emit_keys::{InjectionError, KeyEventSink};

/// Stand-in sink for headless runs.
///
/// Every event is logged with the key's HID usage ID, so a full session
/// can be verified end to end before an injection backend is wired up.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingKeySink;

impl LoggingKeySink {
    /// Creates the sink.
    pub fn new() -> Self {
        Self
    }
}

impl KeyEventSink for LoggingKeySink {
    fn key_down(&self, key: KeyCode) -> Result<(), InjectionError> {
        info!(?key, usage_id = key.usage_id(), "key down");
        Ok(())
    }

    fn key_up(&self, key: KeyCode) -> Result<(), InjectionError> {
        info!(?key, usage_id = key.usage_id(), "key up");
        Ok(())
    }
}
