//! The pad driver state machine and its background reader loop.
//!
//! A driver is `Idle` (no open channel), `Active` (channel open, one reader
//! thread draining it), or briefly `Closing` while a retire is in flight.
//! `select_port` and `stop` always pass through the full
//! `Active → Closing → Idle` sequence before doing anything else, blocking
//! the caller until the previous device handle is released and the reader
//! thread has exited. That ordering is what guarantees at most one reader
//! per driver, so the detector, the sink, and the observer are never raced.
//!
//! The reader thread performs the only blocking operation in the system.
//! Shutdown is cooperative: the channel's shutdown handle is raised and the
//! reader observes it within one read-poll interval, so retiring a session
//! is a short blocking call rather than an instantaneous one.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use pad_core::{parse_frame, EdgeDetector, StateVector};
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::application::emit_keys::{KeyEmitter, KeyEventSink};
use crate::infrastructure::serial::{ChannelError, ChannelFactory, PadChannel, ShutdownHandle};

/// Receives a full state snapshot after every decoded frame.
///
/// Called from the reader thread; implementations marshal onto whatever
/// execution context their consumer needs and must return promptly.
pub trait StateObserver: Send + Sync {
    /// One complete snapshot, delivered whether or not the frame produced
    /// any edges.
    fn on_state_changed(&self, snapshot: StateVector);
}

/// Errors surfaced by the driver control surface.
#[derive(Debug, Error)]
pub enum DriverError {
    /// Opening the requested port failed; the driver remains idle.
    #[error(transparent)]
    Open(#[from] ChannelError),

    /// The reader thread could not be started.
    #[error("failed to start reader thread: {0}")]
    Spawn(#[source] std::io::Error),
}

/// One running session: an open channel being drained by one named thread.
struct ReaderSession {
    port_name: String,
    shutdown: ShutdownHandle,
    reader: JoinHandle<()>,
}

/// Orchestrates the serial channel, the edge detector, and the injected
/// key-sink and observer capabilities.
///
/// All capabilities are supplied at construction; the driver itself never
/// reaches for the OS directly, which is what lets the whole lifecycle run
/// under test against scripted channels.
pub struct PadDriver {
    channels: Arc<dyn ChannelFactory>,
    emitter: KeyEmitter,
    observer: Arc<dyn StateObserver>,
    detector: Arc<Mutex<EdgeDetector>>,
    session: Mutex<Option<ReaderSession>>,
}

impl PadDriver {
    /// Creates an idle driver with the given capabilities.
    ///
    /// The button state vector starts all-released and lives for the whole
    /// driver lifetime; switching ports does not reset it.
    pub fn new(
        channels: Arc<dyn ChannelFactory>,
        sink: Arc<dyn KeyEventSink>,
        observer: Arc<dyn StateObserver>,
    ) -> Self {
        Self {
            channels,
            emitter: KeyEmitter::new(sink),
            observer,
            detector: Arc::new(Mutex::new(EdgeDetector::new())),
            session: Mutex::new(None),
        }
    }

    /// Switches the driver to the named port.
    ///
    /// Any running session is retired first, synchronously: the caller does
    /// not get control back until the old device handle is released. Then
    /// the new channel is opened and exactly one new reader thread starts.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::Open`] when the port cannot be opened; the
    /// driver is left idle in that case.
    pub fn select_port(&self, port_name: &str) -> Result<(), DriverError> {
        let mut session = self.lock_session();
        Self::retire(&mut session);

        let channel = self.channels.open(port_name)?;
        let shutdown = channel.shutdown_handle();

        let detector = Arc::clone(&self.detector);
        let emitter = self.emitter.clone();
        let observer = Arc::clone(&self.observer);
        let reader = thread::Builder::new()
            .name("pad-reader".to_string())
            .spawn(move || run_reader_loop(channel, detector, emitter, observer))
            .map_err(DriverError::Spawn)?;

        *session = Some(ReaderSession {
            port_name: port_name.to_string(),
            shutdown,
            reader,
        });
        info!(port_name, "serial session started");
        Ok(())
    }

    /// Stops the running session, if any.
    ///
    /// Blocks until the channel is fully released and the reader thread has
    /// exited. Calling this on an idle driver is a no-op that returns
    /// immediately.
    pub fn stop(&self) {
        let mut session = self.lock_session();
        Self::retire(&mut session);
    }

    /// A snapshot copy of the current button states, never a live reference.
    pub fn current_states(&self) -> StateVector {
        self.lock_detector().states()
    }

    /// The name of the currently open port, or `None` when idle.
    ///
    /// A session whose reader exited on its own (device failure) is
    /// observed here and pruned, completing the transition back to idle.
    pub fn current_port_name(&self) -> Option<String> {
        let mut session = self.lock_session();
        Self::prune_finished(&mut session);
        session.as_ref().map(|s| s.port_name.clone())
    }

    /// Requests shutdown and joins the reader, releasing the device handle.
    fn retire(session: &mut Option<ReaderSession>) {
        if let Some(s) = session.take() {
            info!(port_name = %s.port_name, "closing serial session");
            s.shutdown.request();
            if s.reader.join().is_err() {
                error!(port_name = %s.port_name, "reader thread panicked");
            }
        }
    }

    /// Drops a session whose reader already exited; the join is immediate.
    fn prune_finished(session: &mut Option<ReaderSession>) {
        if session.as_ref().is_some_and(|s| s.reader.is_finished()) {
            Self::retire(session);
        }
    }

    fn lock_session(&self) -> MutexGuard<'_, Option<ReaderSession>> {
        // A poisoning panic can only come from a caller thread dying inside
        // the control surface; the session slot itself is still coherent.
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_detector(&self) -> MutexGuard<'_, EdgeDetector> {
        self.detector.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for PadDriver {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Drains one channel until it is closed or fails.
///
/// Runs on its own named thread so the blocking reads never stall the
/// control surface. Every failure mode degrades to loop exit; nothing in
/// here may panic or terminate the process.
fn run_reader_loop(
    mut channel: Box<dyn PadChannel>,
    detector: Arc<Mutex<EdgeDetector>>,
    emitter: KeyEmitter,
    observer: Arc<dyn StateObserver>,
) {
    let port_name = channel.port_name().to_string();
    debug!(port_name = %port_name, "reader thread started");

    loop {
        let line = match channel.read_line() {
            Ok(line) => line,
            Err(ChannelError::Closed) => {
                debug!(port_name = %port_name, "shutdown observed, reader exiting");
                break;
            }
            Err(e) => {
                warn!(port_name = %port_name, error = %e, "serial read failed, closing channel");
                break;
            }
        };

        let vector = match parse_frame(&line) {
            Ok(v) => v,
            Err(e) => {
                debug!(
                    port_name = %port_name,
                    error = %e,
                    line = %line.escape_debug(),
                    "dropping malformed frame"
                );
                continue;
            }
        };

        // Diff and snapshot under one lock acquisition so the published
        // snapshot always matches the edges just computed.
        let (edges, snapshot) = {
            let mut detector = detector.lock().unwrap_or_else(PoisonError::into_inner);
            let edges = detector.apply(vector);
            (edges, detector.states())
        };

        for edge in edges {
            if let Err(e) = emitter.emit(edge) {
                warn!(port_name = %port_name, error = %e, "key injection failed");
            }
        }

        observer.on_state_changed(snapshot);
    }

    channel.close();
    debug!(port_name = %port_name, "reader thread exited");
}

// ── Tests ─────────────────────────────────────────────────────────────────────
