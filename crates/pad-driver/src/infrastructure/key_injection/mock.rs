//! Recording key sink for unit and integration tests.
//!
//! The real sinks post events the test process cannot observe, so tests
//! inject this one instead: every call is pushed into a `Mutex<Vec<...>>`
//! in dispatch order, and assertions read the record back.

use std::sync::Mutex;

use pad_core::KeyCode;

use crate::application::emit_keys::{InjectionError, KeyEventSink};

/// A sink that records every injected event without performing any OS call.
///
/// Stored as `(key, is_down)` pairs in dispatch order. Set `should_fail`
/// before use to make every call return an error, for exercising the
/// callers' failure paths.
#[derive(Default)]
pub struct RecordingKeySink {
    events: Mutex<Vec<(KeyCode, bool)>>,
    /// When `true`, every call returns [`InjectionError::Platform`].
    pub should_fail: bool,
}

impl RecordingKeySink {
    /// Creates an empty recording sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// The events recorded so far, in dispatch order, by copy.
    pub fn recorded(&self) -> Vec<(KeyCode, bool)> {
        self.events.lock().expect("lock poisoned").clone()
    }
}

impl KeyEventSink for RecordingKeySink {
    fn key_down(&self, key: KeyCode) -> Result<(), InjectionError> {
        if self.should_fail {
            return Err(InjectionError::Platform("mock failure".to_string()));
        }
        self.events.lock().expect("lock poisoned").push((key, true));
        Ok(())
    }

    fn key_up(&self, key: KeyCode) -> Result<(), InjectionError> {
        if self.should_fail {
            return Err(InjectionError::Platform("mock failure".to_string()));
        }
        self.events.lock().expect("lock poisoned").push((key, false));
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
