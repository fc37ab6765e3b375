//! Application layer use cases for the driver.
//!
//! - **`drive_pad`** – the `PadDriver` state machine: port selection,
//!   shutdown, and the background reader loop that ties channel, decoder,
//!   detector, sink, and observer together.
//!
//! - **`emit_keys`** – turns detected edges into key-down/key-up calls on
//!   the injected `KeyEventSink` capability. The OS primitive behind the
//!   sink is an external collaborator supplied by the infrastructure layer.

pub mod drive_pad;
pub mod emit_keys;
