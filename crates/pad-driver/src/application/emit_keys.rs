//! Key event emission: translating button edges into key calls.
//!
//! This use case sits between the edge detector and the OS. It delegates
//! to a [`KeyEventSink`] trait object for the actual event injection; the
//! implementations live in the infrastructure layer.

use std::sync::Arc;

use pad_core::{key_code_for, ButtonState, Edge, KeyCode};
use thiserror::Error;

/// Error type for key injection operations.
#[derive(Debug, Error)]
pub enum InjectionError {
    /// The injection primitive reported a failure.
    #[error("key injection failed: {0}")]
    Platform(String),
}

/// Capability that posts synthetic key events to the host.
///
/// The OS-level primitive itself is an external collaborator; anything
/// adapting it (or standing in for it) implements this trait so the driver
/// core can be exercised without touching the OS.
#[cfg_attr(test, mockall::automock)]
pub trait KeyEventSink: Send + Sync {
    /// Posts a key-down event.
    fn key_down(&self, key: KeyCode) -> Result<(), InjectionError>;

    /// Posts a key-up event.
    fn key_up(&self, key: KeyCode) -> Result<(), InjectionError>;
}

/// Dispatches edges to a [`KeyEventSink`], one call per edge.
#[derive(Clone)]
pub struct KeyEmitter {
    sink: Arc<dyn KeyEventSink>,
}

impl KeyEmitter {
    /// Creates an emitter over the given sink.
    pub fn new(sink: Arc<dyn KeyEventSink>) -> Self {
        Self { sink }
    }

    /// Emits the key event for one edge: a press becomes `key_down`, a
    /// release becomes `key_up`, using the fixed button-to-key table.
    ///
    /// # Errors
    ///
    /// Returns [`InjectionError`] if the sink rejects the event.
    pub fn emit(&self, edge: Edge) -> Result<(), InjectionError> {
        let key = key_code_for(edge.button);
        match edge.state {
            ButtonState::Pressed => self.sink.key_down(key),
            ButtonState::Released => self.sink.key_up(key),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;
    use pad_core::PadButton;

    #[test]
    fn test_pressed_edge_dispatches_key_down() {
        // Arrange
        let mut sink = MockKeyEventSink::new();
        sink.expect_key_down()
            .with(eq(KeyCode::ArrowUp))
            .times(1)
            .returning(|_| Ok(()));
        sink.expect_key_up().never();

        // Act
        let emitter = KeyEmitter::new(Arc::new(sink));
        let result = emitter.emit(Edge {
            button: PadButton::Up,
            state: ButtonState::Pressed,
        });

        // Assert
        assert!(result.is_ok());
    }

    #[test]
    fn test_released_edge_dispatches_key_up() {
        // Arrange
        let mut sink = MockKeyEventSink::new();
        sink.expect_key_up()
            .with(eq(KeyCode::Enter))
            .times(1)
            .returning(|_| Ok(()));
        sink.expect_key_down().never();

        // Act
        let emitter = KeyEmitter::new(Arc::new(sink));
        let result = emitter.emit(Edge {
            button: PadButton::Enter,
            state: ButtonState::Released,
        });

        // Assert
        assert!(result.is_ok());
    }

    #[test]
    fn test_sink_failure_is_surfaced_to_the_caller() {
        // Arrange
        let mut sink = MockKeyEventSink::new();
        sink.expect_key_down()
            .returning(|_| Err(InjectionError::Platform("injected failure".to_string())));

        // Act
        let emitter = KeyEmitter::new(Arc::new(sink));
        let result = emitter.emit(Edge {
            button: PadButton::Left,
            state: ButtonState::Pressed,
        });

        // Assert
        assert!(result.is_err());
    }
}
