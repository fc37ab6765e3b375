//! Serial transport for the pad's frame stream.
//!
//! The pad streams continuously whenever it is powered, so a read with no
//! deadline would be fine on a healthy link. What forces the polling shape
//! of [`SerialChannel::read_line`] is shutdown: closing a serial handle
//! while another thread is blocked reading from it is a well-known hazard,
//! so the channel never lets a read block past one poll interval without
//! checking whether a shutdown has been requested. The thread that owns
//! the channel is always the one that releases the device handle.

pub mod mock;

use std::io::{self, Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serialport::{ClearBuffer, SerialPort};
use thiserror::Error;
use tracing::{debug, warn};

/// Baud rate of the pad's serial link. Fixed by the protocol, not
/// user-configurable.
pub const BAUD_RATE: u32 = 9_600;

/// How long one blocking read waits before checking for a shutdown
/// request. Bounds the latency of `stop`/`select_port`, not of data
/// delivery.
pub const READ_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Error type for channel operations.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// The port could not be opened or prepared for reading.
    #[error("failed to open serial port {port_name}: {source}")]
    Open {
        port_name: String,
        #[source]
        source: serialport::Error,
    },

    /// A read failed mid-session (device unplugged, line error).
    #[error("serial read failed: {0}")]
    Io(#[from] io::Error),

    /// The channel was closed while the read was in flight. This is the
    /// normal end of a session, not a fault.
    #[error("channel closed")]
    Closed,
}

/// Clonable handle that asks an in-flight read loop to wind down.
#[derive(Debug, Clone, Default)]
pub struct ShutdownHandle(Arc<AtomicBool>);

impl ShutdownHandle {
    /// Creates a handle with no shutdown requested.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests shutdown. Safe to call from any thread while a read is in
    /// flight; the owning channel observes it within one poll interval.
    pub fn request(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// `true` once shutdown has been requested.
    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// One open line-framed connection to the pad.
///
/// The production implementation is [`SerialChannel`]; tests script device
/// behavior with [`mock::MockChannel`] instead of hardware.
pub trait PadChannel: Send {
    /// Blocks until a full line is available, the device fails, or a
    /// shutdown request is observed.
    ///
    /// # Errors
    ///
    /// [`ChannelError::Closed`] after a shutdown request,
    /// [`ChannelError::Io`] for device failures.
    fn read_line(&mut self) -> Result<String, ChannelError>;

    /// A handle that unblocks `read_line` from another thread.
    fn shutdown_handle(&self) -> ShutdownHandle;

    /// The name of the underlying port.
    fn port_name(&self) -> &str;

    /// Releases the device handle. Failures here are logged and swallowed;
    /// the channel is already being torn down and an unplugged device must
    /// not turn teardown into a fault.
    fn close(self: Box<Self>);
}

/// Opens channels by port name.
///
/// Injected into the driver at construction so the whole session lifecycle
/// can run under test against [`mock::MockChannelFactory`].
pub trait ChannelFactory: Send + Sync {
    /// Opens the named port, ready for line reads.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::Open`] when the device cannot be opened.
    fn open(&self, port_name: &str) -> Result<Box<dyn PadChannel>, ChannelError>;
}

/// One open serial connection to the pad.
pub struct SerialChannel {
    port: Box<dyn SerialPort>,
    port_name: String,
    shutdown: ShutdownHandle,
    /// Bytes received but not yet returned as a complete line.
    pending: Vec<u8>,
}

impl SerialChannel {
    /// Opens `port_name` at the protocol baud rate and discards any input
    /// buffered before this session, which would otherwise desync line
    /// framing.
    ///
    /// # Errors
    ///
    /// Returns [`ChannelError::Open`] if the port cannot be opened or its
    /// stale input cannot be discarded.
    pub fn open(port_name: &str) -> Result<Self, ChannelError> {
        let open_err = |source| ChannelError::Open {
            port_name: port_name.to_string(),
            source,
        };

        let port = serialport::new(port_name, BAUD_RATE)
            .timeout(READ_POLL_INTERVAL)
            .open()
            .map_err(open_err)?;
        port.clear(ClearBuffer::Input).map_err(open_err)?;

        Ok(Self {
            port,
            port_name: port_name.to_string(),
            shutdown: ShutdownHandle::new(),
            pending: Vec::new(),
        })
    }

    /// Takes the first complete line out of the pending buffer, without its
    /// newline terminator.
    fn take_buffered_line(&mut self) -> Option<String> {
        let pos = self.pending.iter().position(|&b| b == b'\n')?;
        let line: Vec<u8> = self.pending.drain(..=pos).collect();
        Some(String::from_utf8_lossy(&line[..line.len() - 1]).into_owned())
    }
}

impl PadChannel for SerialChannel {
    fn read_line(&mut self) -> Result<String, ChannelError> {
        let mut scratch = [0u8; 64];
        loop {
            // Checked every pass, not only on timeout: a device that streams
            // continuously would otherwise never let a shutdown through.
            if self.shutdown.is_requested() {
                return Err(ChannelError::Closed);
            }

            if let Some(line) = self.take_buffered_line() {
                return Ok(line);
            }

            match self.port.read(&mut scratch) {
                Ok(0) => {
                    return Err(ChannelError::Io(io::ErrorKind::UnexpectedEof.into()));
                }
                Ok(n) => self.pending.extend_from_slice(&scratch[..n]),
                // A timeout is not a fault; it is the poll tick on a quiet
                // line.
                Err(e) if e.kind() == io::ErrorKind::TimedOut => {}
                Err(e) => return Err(ChannelError::Io(e)),
            }
        }
    }

    fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    fn port_name(&self) -> &str {
        &self.port_name
    }

    fn close(mut self: Box<Self>) {
        // A ripped-out cable makes the final flush fail; the handle is
        // released either way when the port drops, so the error is only
        // worth a log line.
        if let Err(e) = self.port.flush() {
            debug!(port_name = %self.port_name, error = %e, "flush during close failed");
        }
    }
}

/// Production factory opening real serial ports.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerialChannelFactory;

impl ChannelFactory for SerialChannelFactory {
    fn open(&self, port_name: &str) -> Result<Box<dyn PadChannel>, ChannelError> {
        Ok(Box::new(SerialChannel::open(port_name)?))
    }
}

/// Enumerates the serial ports present on this machine.
///
/// Enumeration failure is reported as an empty list; the UI treats "no
/// ports" and "cannot enumerate" the same way.
pub fn list_ports() -> Vec<String> {
    match serialport::available_ports() {
        Ok(ports) => ports.into_iter().map(|p| p.port_name).collect(),
        Err(e) => {
            warn!(error = %e, "serial port enumeration failed");
            Vec::new()
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shutdown_handle_starts_unrequested() {
        let handle = ShutdownHandle::new();
        assert!(!handle.is_requested());
    }

    #[test]
    fn test_shutdown_handle_clones_share_state() {
        let handle = ShutdownHandle::new();
        let clone = handle.clone();

        clone.request();

        assert!(handle.is_requested());
    }

    #[test]
    fn test_open_nonexistent_port_reports_open_error() {
        let result = SerialChannel::open("/dev/does-not-exist-pad0");
        assert!(matches!(
            result,
            Err(ChannelError::Open { ref port_name, .. }) if port_name == "/dev/does-not-exist-pad0"
        ));
    }
}
