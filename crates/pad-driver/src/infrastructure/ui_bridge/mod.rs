//! Command bridge between a UI shell and the driver.
//!
//! The window that displays the pad, its port picker, and its button
//! colors is an external collaborator. This module gives it two things:
//!
//! - **Commands** – async handlers over a shared [`PadDriver`] returning a
//!   uniform [`CommandResult`] shape, so every response is
//!   `{ success, data, error }` regardless of outcome. The two commands
//!   that retire a reader thread (`select_port`, `stop`) block for up to a
//!   poll interval, so they hop through `spawn_blocking` rather than stall
//!   the async runtime.
//!
//! - **[`UiStateForwarder`]** – the observer implementation that marshals
//!   snapshots off the reader thread and onto a channel the UI consumes on
//!   its own context.

use std::sync::Arc;

use pad_core::StateVector;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::debug;

use crate::application::drive_pad::{PadDriver, StateObserver};
use crate::infrastructure::serial;

// ── Data Transfer Objects ─────────────────────────────────────────────────────

/// DTO for the full pad state shown by a UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PadStateDto {
    /// Pressed flag per button, in frame-index order
    /// (Up, Down, Left, Right, Escape, Enter).
    pub pressed: Vec<bool>,
}

impl From<StateVector> for PadStateDto {
    fn from(v: StateVector) -> Self {
        Self {
            pressed: v.iter().map(|(_, s)| s.is_pressed()).collect(),
        }
    }
}

/// Unified response wrapper used by UI commands.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResult<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> CommandResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

// ── Observer forwarding ───────────────────────────────────────────────────────

/// Forwards observer snapshots onto a UI-owned consumer context.
///
/// The reader thread calls [`StateObserver::on_state_changed`]; the
/// snapshot is handed to a bounded channel with `try_send`, so a slow or
/// absent UI can never block frame processing. When the channel is full
/// the snapshot is dropped: a display only ever needs the latest state.
pub struct UiStateForwarder {
    tx: mpsc::Sender<PadStateDto>,
}

impl UiStateForwarder {
    /// Creates a forwarder and the receiving end for the UI context.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<PadStateDto>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }
}

impl StateObserver for UiStateForwarder {
    fn on_state_changed(&self, snapshot: StateVector) {
        if self.tx.try_send(snapshot.into()).is_err() {
            debug!("ui channel full or closed, dropping snapshot");
        }
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

/// Returns the serial ports available on this machine.
pub async fn list_ports() -> CommandResult<Vec<String>> {
    CommandResult::ok(serial::list_ports())
}

/// Switches the driver to the named port, retiring any running session
/// first.
pub async fn select_port(driver: Arc<PadDriver>, port_name: String) -> CommandResult<()> {
    let result = tokio::task::spawn_blocking(move || driver.select_port(&port_name)).await;
    match result {
        Ok(Ok(())) => CommandResult::ok(()),
        Ok(Err(e)) => CommandResult::err(e.to_string()),
        Err(e) => CommandResult::err(format!("driver task failed: {e}")),
    }
}

/// Stops the running session, if any.
pub async fn stop(driver: Arc<PadDriver>) -> CommandResult<()> {
    match tokio::task::spawn_blocking(move || driver.stop()).await {
        Ok(()) => CommandResult::ok(()),
        Err(e) => CommandResult::err(format!("driver task failed: {e}")),
    }
}

/// Returns a snapshot of the current button states.
pub async fn get_states(driver: Arc<PadDriver>) -> CommandResult<PadStateDto> {
    CommandResult::ok(driver.current_states().into())
}

/// Returns the currently open port name, or an empty string when idle.
pub async fn get_port_name(driver: Arc<PadDriver>) -> CommandResult<String> {
    CommandResult::ok(driver.current_port_name().unwrap_or_default())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
