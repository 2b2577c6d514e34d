//! End-to-end door runs through the public API, sampled every 100 ms.

use garage_door_monitor::{
    door::{parse_state_label, DEFAULT_DOOR_CONFIG},
    AccelSample, AxisPosition, DoorConfig, DoorMonitor, DoorState, TransitionCause,
};

const TICK_MS: u64 = 100;

fn bench_config() -> DoorConfig {
    DoorConfig {
        accel_threshold: 0.5,
        stop_timeout_ms: 2_000,
        max_open_ms: 10_000,
        max_close_ms: 10_000,
        stall_threshold: 0.1,
        stall_timeout_ms: 3_000,
        closed_position: AxisPosition::new(9.8, 0.0),
        open_position: AxisPosition::new(0.0, 9.8),
        position_tolerance: 0.5,
    }
}

/// Feeds one reading per tick over `[from_ms, to_ms]` and returns the final
/// state.
fn hold(monitor: &mut DoorMonitor, y: f32, z: f32, from_ms: u64, to_ms: u64) -> DoorState {
    let mut state = monitor.state();
    let mut now_ms = from_ms;
    while now_ms <= to_ms {
        state = monitor.update(AccelSample::new(0.0, y, z), now_ms);
        now_ms += TICK_MS;
    }
    state
}

#[test]
fn full_open_then_interrupted_close() {
    let mut monitor = DoorMonitor::new(bench_config());
    assert_eq!(monitor.initialize(9.8, 0.0, 0), DoorState::Closed);

    let swing = [(9.0, 2.0), (7.0, 5.0), (4.0, 8.0), (1.0, 9.2), (0.1, 9.8)];
    for (idx, (y, z)) in swing.into_iter().enumerate() {
        let now_ms = (idx as u64 + 1) * TICK_MS;
        assert_eq!(
            monitor.update(AccelSample::new(0.0, y, z), now_ms),
            DoorState::Opening,
            "swing sample {idx}"
        );
    }

    assert_eq!(hold(&mut monitor, 0.1, 9.8, 600, 2_500), DoorState::Opening);
    assert_eq!(hold(&mut monitor, 0.1, 9.8, 2_600, 2_600), DoorState::Open);
    assert!(monitor.is_at_position());
    assert_eq!(monitor.state_label(), "OPEN");

    for (idx, (y, z)) in [(0.5, 8.5), (0.9, 7.0), (1.3, 5.5)].into_iter().enumerate() {
        let now_ms = 5_100 + idx as u64 * TICK_MS;
        assert_eq!(
            monitor.update(AccelSample::new(0.0, y, z), now_ms),
            DoorState::Closing
        );
    }

    assert_eq!(hold(&mut monitor, 1.3, 5.5, 5_400, 7_300), DoorState::Closing);
    assert_eq!(hold(&mut monitor, 1.3, 5.5, 7_400, 7_400), DoorState::Stopped);
    assert!(monitor.detailed_status().contains("mid-close"));

    let causes: Vec<TransitionCause> = monitor.recent_changes().map(|c| c.cause).collect();
    assert_eq!(
        causes,
        [
            TransitionCause::Initialized,
            TransitionCause::Movement,
            TransitionCause::StopTimeout,
            TransitionCause::Movement,
            TransitionCause::StopTimeout,
        ]
    );
}

#[test]
fn motor_jam_latches_until_reinitialized() {
    // A long stop timeout so the stall window expires first.
    let mut monitor = DoorMonitor::new(DoorConfig {
        stop_timeout_ms: 60_000,
        ..bench_config()
    });
    monitor.initialize(9.8, 0.0, 0);
    assert_eq!(
        monitor.update(AccelSample::new(0.0, 10.5, 0.5), 100),
        DoorState::Opening
    );

    // Tiny jitter below the stall threshold.
    let mut state = monitor.state();
    let mut now_ms = 200;
    while state == DoorState::Opening {
        let jitter = if (now_ms / TICK_MS) % 2 == 0 { 0.02 } else { 0.0 };
        state = monitor.update(AccelSample::new(0.0, 10.5 + jitter, 0.5), now_ms);
        now_ms += TICK_MS;
    }
    assert_eq!(state, DoorState::Stalled);
    assert_eq!(monitor.state_label(), "ERROR_STALLED");

    assert_eq!(
        hold(&mut monitor, 9.8, 0.0, now_ms, now_ms + 5_000),
        DoorState::Stalled
    );
    assert_eq!(monitor.initialize(9.8, 0.0, 60_000), DoorState::Closed);
}

#[test]
fn unplugged_sensor_fails_then_recovers() {
    let mut monitor = DoorMonitor::new(bench_config());
    monitor.initialize(9.8, 0.0, 0);

    let mut now_ms = 0;
    for _ in 0..5 {
        now_ms += TICK_MS;
        monitor.update(AccelSample::invalid(), now_ms);
    }
    assert_eq!(monitor.state(), DoorState::SensorFailure);
    assert!(!monitor.is_sensor_healthy());

    let recovered = monitor.step(AccelSample::new(0.0, 0.0, 0.0), now_ms + TICK_MS);
    assert_eq!(recovered.state, DoorState::Unknown);
    assert!(monitor.is_sensor_healthy());

    // Back on the bracket at the closed reference.
    assert_eq!(
        monitor.update(AccelSample::new(0.0, 9.8, 0.0), now_ms + 2 * TICK_MS),
        DoorState::Opening
    );
    let settled = hold(&mut monitor, 9.8, 0.0, now_ms + 3 * TICK_MS, now_ms + 3_000);
    assert_eq!(settled, DoorState::Closed);
}

#[test]
fn default_monitor_uses_compiled_config() {
    let monitor = DoorMonitor::default();
    assert_eq!(monitor.config(), DEFAULT_DOOR_CONFIG);
    assert_eq!(monitor.config().position_tolerance, 1.0);

    let mut monitor = monitor;
    assert_eq!(monitor.initialize(10.5, 0.5, 0), DoorState::Closed);
}

#[test]
fn labels_parse_back_to_states() {
    for state in DoorState::ALL {
        let label = garage_door_monitor::door::state_label(state);
        assert_eq!(parse_state_label(label), Some(state));
        assert_eq!(parse_state_label(&label.to_ascii_lowercase()), Some(state));
    }
    assert_eq!(parse_state_label("AJAR"), None);
}
