//! Decoder for the pad's newline-delimited button state frames.
//!
//! Wire format, one frame per line:
//! ```text
//! 0\r1\r1\r1\r1\r1\r
//! ```
//! After splitting on the null and carriage-return field terminators and
//! discarding empty fragments, a line must yield exactly six fields, each
//! the literal `0` or `1`. The encoding is inverted: `0` means pressed,
//! `1` means released. The example above is "Up pressed, everything else
//! released".

use thiserror::Error;

use crate::domain::buttons::{ButtonState, StateVector, PAD_BUTTON_COUNT};

/// Characters that terminate fields within a frame line.
const FIELD_SEPARATORS: [char; 2] = ['\0', '\r'];

/// Errors produced while decoding one frame line.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    /// The line did not split into exactly six fields.
    #[error("expected {expected} button fields, got {actual}")]
    WrongFieldCount { expected: usize, actual: usize },

    /// A field held something other than the literal `0` or `1`.
    #[error("invalid button field {raw:?} at index {index}")]
    InvalidToken { index: usize, raw: String },
}

/// Decodes one raw line into a validated [`StateVector`].
///
/// The whole frame is rejected if any field is invalid; a malformed frame
/// never produces a partial vector, so a corrupted line can never leave the
/// driver's state half-updated.
///
/// Pure and side-effect free. Errors are returned for the caller to log;
/// they carry no control-flow meaning beyond "drop this frame".
///
/// # Errors
///
/// Returns [`FrameError::WrongFieldCount`] when the field count is not six,
/// or [`FrameError::InvalidToken`] for the first field that is not the
/// literal `0` or `1`.
pub fn parse_frame(line: &str) -> Result<StateVector, FrameError> {
    let tokens: Vec<&str> = line
        .split(FIELD_SEPARATORS)
        .filter(|t| !t.is_empty())
        .collect();

    if tokens.len() != PAD_BUTTON_COUNT {
        return Err(FrameError::WrongFieldCount {
            expected: PAD_BUTTON_COUNT,
            actual: tokens.len(),
        });
    }

    let mut states = [ButtonState::Released; PAD_BUTTON_COUNT];
    for (index, token) in tokens.iter().enumerate() {
        states[index] = match *token {
            "0" => ButtonState::Pressed,
            "1" => ButtonState::Released,
            raw => {
                return Err(FrameError::InvalidToken {
                    index,
                    raw: raw.to_string(),
                })
            }
        };
    }

    Ok(StateVector::new(states))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
