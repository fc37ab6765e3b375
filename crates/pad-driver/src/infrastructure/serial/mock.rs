//! Scripted channels for testing the driver without hardware.
//!
//! A [`MockChannelFactory`] is loaded with one [`ScriptedPort`] per
//! expected `open` call. Each scripted channel replays its lines to the
//! reader loop, then either behaves like a healthy-but-silent device
//! (blocking until shutdown) or like an unplugged one (failing the next
//! read). The factory keeps an ordered event log so tests can assert that
//! a previous channel was fully released before the next one was opened.

use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use super::{ChannelError, ChannelFactory, PadChannel, ShutdownHandle};

/// What the scripted device does once its lines run out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AfterScript {
    /// Keep reads blocked until shutdown is requested, like a healthy
    /// device that has gone quiet.
    BlockUntilShutdown,
    /// Fail the next read, like a device that was unplugged.
    FailRead,
}

/// Scripted behavior for one `open` call.
pub struct ScriptedPort {
    lines: VecDeque<String>,
    after: AfterScript,
}

impl ScriptedPort {
    /// Creates a script that replays `lines` in order, then follows the
    /// `after` behavior.
    pub fn new<I, S>(lines: I, after: AfterScript) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            after,
        }
    }
}

/// A [`PadChannel`] that replays a script instead of touching a port.
pub struct MockChannel {
    port_name: String,
    lines: VecDeque<String>,
    after: AfterScript,
    shutdown: ShutdownHandle,
    events: Arc<Mutex<Vec<String>>>,
}

impl PadChannel for MockChannel {
    fn read_line(&mut self) -> Result<String, ChannelError> {
        loop {
            if self.shutdown.is_requested() {
                return Err(ChannelError::Closed);
            }
            if let Some(line) = self.lines.pop_front() {
                return Ok(line);
            }
            match self.after {
                AfterScript::BlockUntilShutdown => thread::sleep(Duration::from_millis(1)),
                AfterScript::FailRead => {
                    return Err(ChannelError::Io(io::Error::new(
                        io::ErrorKind::BrokenPipe,
                        "scripted device unplugged",
                    )))
                }
            }
        }
    }

    fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    fn port_name(&self) -> &str {
        &self.port_name
    }

    fn close(self: Box<Self>) {
        self.events
            .lock()
            .expect("lock poisoned")
            .push(format!("close:{}", self.port_name));
    }
}

/// Factory handing out scripted channels in FIFO order.
///
/// An `open` with no script left fails the way a missing device would.
#[derive(Default)]
pub struct MockChannelFactory {
    scripts: Mutex<VecDeque<ScriptedPort>>,
    events: Arc<Mutex<Vec<String>>>,
}

impl MockChannelFactory {
    /// Creates an empty factory; load it with [`push_script`][Self::push_script].
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues the script for the next unconsumed `open` call.
    pub fn push_script(&self, script: ScriptedPort) {
        self.scripts.lock().expect("lock poisoned").push_back(script);
    }

    /// The ordered `open:<port>` / `close:<port>` event log.
    pub fn events(&self) -> Vec<String> {
        self.events.lock().expect("lock poisoned").clone()
    }

    /// Number of scripted channels whose device handle the driver has
    /// released.
    pub fn close_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| e.starts_with("close:"))
            .count()
    }
}

impl ChannelFactory for MockChannelFactory {
    fn open(&self, port_name: &str) -> Result<Box<dyn PadChannel>, ChannelError> {
        let script = self.scripts.lock().expect("lock poisoned").pop_front();
        match script {
            Some(script) => {
                self.events
                    .lock()
                    .expect("lock poisoned")
                    .push(format!("open:{port_name}"));
                Ok(Box::new(MockChannel {
                    port_name: port_name.to_string(),
                    lines: script.lines,
                    after: script.after,
                    shutdown: ShutdownHandle::new(),
                    events: Arc::clone(&self.events),
                }))
            }
            None => Err(ChannelError::Open {
                port_name: port_name.to_string(),
                source: serialport::Error::new(
                    serialport::ErrorKind::NoDevice,
                    "no scripted channel prepared",
                ),
            }),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
