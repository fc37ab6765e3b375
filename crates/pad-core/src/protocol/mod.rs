//! The pad's serial wire protocol.
//!
//! The device streams one text line per state report. Decoding a line into
//! a validated [`crate::StateVector`] lives in [`frame`]; line framing
//! itself (reading bytes until a newline) is the serial channel's job in
//! the driver crate.

pub mod frame;
