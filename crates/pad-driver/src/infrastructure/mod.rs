//! Infrastructure layer: adapters around the OS-facing edges of the driver.
//!
//! Everything here is replaceable in tests: the serial transport behind
//! [`serial::PadChannel`], the key sinks behind the application layer's
//! `KeyEventSink`, and the UI side of [`ui_bridge`].

pub mod key_injection;
pub mod serial;
pub mod ui_bridge;
