//! # pad-core
//!
//! Shared library for PadBridge containing the frame protocol decoder, the
//! button domain model, and the pad-to-keyboard key code table.
//!
//! PadBridge turns a hardware dance pad that streams button states over a
//! serial line into synthesized keyboard events. This crate is the pure
//! foundation of that pipeline. It defines:
//!
//! - **`protocol`** – How a raw line of device output becomes a validated
//!   snapshot of all six button states, or a decode error.
//!
//! - **`domain`** – The button identities, the six-slot state vector, and
//!   the edge detector that diffs consecutive snapshots into per-button
//!   state changes.
//!
//! - **`keymap`** – The fixed table translating each pad button to the
//!   keyboard key it stands in for.
//!
//! It has zero dependencies on OS APIs, serial I/O, or threads, so every
//! rule in it can be unit-tested on any machine without a pad plugged in.

pub mod domain;
pub mod keymap;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `pad_core::StateVector` instead of `pad_core::domain::buttons::StateVector`.
pub use domain::buttons::{ButtonState, PadButton, StateVector, PAD_BUTTON_COUNT};
pub use domain::edges::{Edge, EdgeDetector};
pub use keymap::{key_code_for, KeyCode};
pub use protocol::frame::{parse_frame, FrameError};
