//! pad-driver library entry point.
//!
//! Re-exports the public module tree so that the binary in `main.rs` and
//! the integration tests in `tests/` share the same code.
//!
//! The driver turns the pad's serial byte stream into host key events:
//!
//! 1. A background reader thread drains one open serial channel, one text
//!    line per pad report.
//! 2. Each line is decoded by `pad-core` into a validated six-button state
//!    vector, or dropped if malformed.
//! 3. The edge detector diffs the vector against the previous one.
//! 4. Every edge becomes exactly one key-down or key-up call on the
//!    injected sink, and the full snapshot goes to the registered observer.
//!
//! Port switching and shutdown retire the running reader synchronously, so
//! at most one reader is ever alive per driver instance.

/// Application layer: the driver state machine and key emission use case.
pub mod application;

/// Infrastructure layer: serial transport, injection sinks, and UI bridge.
pub mod infrastructure;
