//! Key sink implementations.
//!
//! The OS primitive that actually posts synthetic key events is an
//! external collaborator. The sinks here either stand in for it
//! ([`logging`], used by the headless binary) or record calls for test
//! assertions ([`mock`]).

pub mod logging;
pub mod mock;
