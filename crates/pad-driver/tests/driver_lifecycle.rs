//! Integration tests for the driver lifecycle and the full ingestion
//! pipeline, run against scripted channels in place of real hardware.
//!
//! These exercise the application layer of pad-driver end-to-end:
//! `PadDriver` + reader thread + `pad-core` decode/diff + mock
//! infrastructure.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use pad_core::{KeyCode, PadButton, StateVector};
use pad_driver::application::drive_pad::{PadDriver, StateObserver};
use pad_driver::application::emit_keys::KeyEventSink;
use pad_driver::infrastructure::key_injection::mock::RecordingKeySink;
use pad_driver::infrastructure::serial::mock::{AfterScript, MockChannelFactory, ScriptedPort};
use pad_driver::infrastructure::serial::ChannelFactory;

const ALL_RELEASED: &str = "1\r1\r1\r1\r1\r1\r";
const UP_PRESSED: &str = "0\r1\r1\r1\r1\r1\r";

// ── Test doubles ──────────────────────────────────────────────────────────────

#[derive(Default)]
struct RecordingObserver {
    snapshots: Mutex<Vec<StateVector>>,
}

impl RecordingObserver {
    fn snapshots(&self) -> Vec<StateVector> {
        self.snapshots.lock().expect("lock poisoned").clone()
    }
}

impl StateObserver for RecordingObserver {
    fn on_state_changed(&self, snapshot: StateVector) {
        self.snapshots.lock().expect("lock poisoned").push(snapshot);
    }
}

/// Polls `cond` until it holds or the deadline passes; returns the final
/// evaluation. The reader thread paces itself, so tests wait on observable
/// effects instead of sleeping fixed amounts.
fn wait_for(deadline: Duration, mut cond: impl FnMut() -> bool) -> bool {
    let start = Instant::now();
    while start.elapsed() < deadline {
        if cond() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    cond()
}

struct Harness {
    factory: Arc<MockChannelFactory>,
    sink: Arc<RecordingKeySink>,
    observer: Arc<RecordingObserver>,
    driver: PadDriver,
}

fn make_harness() -> Harness {
    let factory = Arc::new(MockChannelFactory::new());
    let sink = Arc::new(RecordingKeySink::new());
    let observer = Arc::new(RecordingObserver::default());
    let driver = PadDriver::new(
        Arc::clone(&factory) as Arc<dyn ChannelFactory>,
        Arc::clone(&sink) as Arc<dyn KeyEventSink>,
        Arc::clone(&observer) as Arc<dyn StateObserver>,
    );
    Harness {
        factory,
        sink,
        observer,
        driver,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[test]
fn test_press_release_scenario_emits_key_down_then_key_up() {
    let h = make_harness();
    // Device reports all released, Up pressed, all released again.
    h.factory.push_script(ScriptedPort::new(
        [ALL_RELEASED, UP_PRESSED, ALL_RELEASED],
        AfterScript::BlockUntilShutdown,
    ));

    h.driver.select_port("COM7").expect("open must succeed");
    assert!(
        wait_for(Duration::from_secs(2), || h.observer.snapshots().len() >= 3),
        "observer must see all three frames"
    );
    h.driver.stop();

    // Exactly one key-down and one key-up, for the Up arrow.
    assert_eq!(
        h.sink.recorded(),
        vec![(KeyCode::ArrowUp, true), (KeyCode::ArrowUp, false)]
    );

    // Observer got one full snapshot per frame, whether or not it had edges.
    let snaps = h.observer.snapshots();
    assert_eq!(snaps.len(), 3);
    assert!(snaps[0].iter().all(|(_, s)| !s.is_pressed()));
    assert!(snaps[1].get(PadButton::Up).is_pressed());
    assert!(snaps[1].iter().filter(|(_, s)| s.is_pressed()).count() == 1);
    assert!(snaps[2].iter().all(|(_, s)| !s.is_pressed()));
}

#[test]
fn test_select_port_retires_previous_channel_before_opening_next() {
    let h = make_harness();
    h.factory.push_script(ScriptedPort::new(
        [ALL_RELEASED],
        AfterScript::BlockUntilShutdown,
    ));
    h.factory.push_script(ScriptedPort::new(
        Vec::<String>::new(),
        AfterScript::BlockUntilShutdown,
    ));

    h.driver.select_port("COM1").expect("first open must succeed");
    assert!(wait_for(Duration::from_secs(2), || {
        !h.observer.snapshots().is_empty()
    }));

    h.driver.select_port("COM2").expect("second open must succeed");

    // The first device handle was released before the second was opened,
    // so two readers never coexist.
    assert_eq!(
        h.factory.events(),
        vec!["open:COM1", "close:COM1", "open:COM2"]
    );
    assert_eq!(h.driver.current_port_name().as_deref(), Some("COM2"));

    h.driver.stop();
    assert_eq!(h.factory.close_count(), 2);
}

#[test]
fn test_stop_clears_port_name_and_is_idempotent() {
    let h = make_harness();
    h.factory.push_script(ScriptedPort::new(
        Vec::<String>::new(),
        AfterScript::BlockUntilShutdown,
    ));

    h.driver.select_port("COM3").expect("open must succeed");
    assert_eq!(h.driver.current_port_name().as_deref(), Some("COM3"));

    h.driver.stop();
    assert_eq!(h.driver.current_port_name(), None);

    // Second stop is a no-op against an idle driver.
    h.driver.stop();
    assert_eq!(h.factory.close_count(), 1);
}

#[test]
fn test_read_failure_returns_driver_to_idle_without_crashing() {
    let h = make_harness();
    h.factory.push_script(ScriptedPort::new(
        [UP_PRESSED],
        AfterScript::FailRead,
    ));

    h.driver.select_port("COM4").expect("open must succeed");

    // The reader exits on its own and releases the channel.
    assert!(wait_for(Duration::from_secs(2), || {
        h.factory.close_count() == 1
    }));
    assert!(wait_for(Duration::from_secs(2), || {
        h.driver.current_port_name().is_none()
    }));

    // The frame read before the failure was still processed.
    assert_eq!(h.sink.recorded(), vec![(KeyCode::ArrowUp, true)]);

    // Stopping an already-failed session stays a no-op.
    h.driver.stop();
    assert_eq!(h.factory.close_count(), 1);
}

#[test]
fn test_malformed_frames_are_dropped_and_the_loop_continues() {
    let h = make_harness();
    h.factory.push_script(ScriptedPort::new(
        [UP_PRESSED, "not\ra\rframe\r", UP_PRESSED, ALL_RELEASED],
        AfterScript::BlockUntilShutdown,
    ));

    h.driver.select_port("COM5").expect("open must succeed");
    assert!(
        wait_for(Duration::from_secs(2), || h.observer.snapshots().len() >= 3),
        "the three valid frames must all be processed"
    );
    h.driver.stop();

    // The malformed line produced neither a snapshot nor key events, and
    // the duplicate valid frame produced no second key-down.
    assert_eq!(h.observer.snapshots().len(), 3);
    assert_eq!(
        h.sink.recorded(),
        vec![(KeyCode::ArrowUp, true), (KeyCode::ArrowUp, false)]
    );
}

#[test]
fn test_states_survive_a_port_switch() {
    let h = make_harness();
    h.factory.push_script(ScriptedPort::new(
        [UP_PRESSED],
        AfterScript::BlockUntilShutdown,
    ));
    h.factory.push_script(ScriptedPort::new(
        Vec::<String>::new(),
        AfterScript::BlockUntilShutdown,
    ));

    h.driver.select_port("COM1").expect("first open must succeed");
    assert!(wait_for(Duration::from_secs(2), || {
        h.driver.current_states().get(PadButton::Up).is_pressed()
    }));

    // The state vector lives for the driver lifetime; switching ports does
    // not reset it.
    h.driver.select_port("COM2").expect("second open must succeed");
    assert!(h.driver.current_states().get(PadButton::Up).is_pressed());

    h.driver.stop();
}

#[test]
fn test_current_states_returns_independent_snapshots() {
    let h = make_harness();
    h.factory.push_script(ScriptedPort::new(
        [UP_PRESSED],
        AfterScript::BlockUntilShutdown,
    ));

    let before = h.driver.current_states();
    h.driver.select_port("COM6").expect("open must succeed");
    assert!(wait_for(Duration::from_secs(2), || {
        h.driver.current_states().get(PadButton::Up).is_pressed()
    }));
    h.driver.stop();

    // The earlier snapshot is a copy; later mutation cannot reach into it.
    assert!(!before.get(PadButton::Up).is_pressed());
}
