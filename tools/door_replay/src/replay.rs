use clap::ValueEnum;
use door_config_compiler::DoorConfigFile;
use garage_door_monitor::{
    door::state_label, AxisPosition, DoorConfig, DoorMonitor, DoorState, StateChange,
};
use serde::Serialize;

use crate::trace::TraceSample;

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum StatusMode {
    /// One status line per sample.
    Every,
    /// A status line for the first sample and each state change.
    Changes,
}

/// The status record a firmware status endpoint would publish.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusLine {
    pub ms: u64,
    pub state: &'static str,
    pub details: &'static str,
    pub accel_x: f32,
    pub accel_y: f32,
    pub accel_z: f32,
    pub is_moving: bool,
    pub is_at_position: bool,
    pub sensor_healthy: bool,
    pub time_in_state_ms: u64,
}

#[derive(Debug, Default)]
pub struct ReplayOutcome {
    pub lines: Vec<StatusLine>,
    /// State after each call, without consecutive repeats.
    pub visited: Vec<DoorState>,
    pub changes: Vec<StateChange>,
}

pub fn door_config_from_file(file: &DoorConfigFile) -> DoorConfig {
    DoorConfig {
        accel_threshold: file.motion.accel_threshold,
        stop_timeout_ms: file.motion.stop_timeout_ms,
        max_open_ms: file.timeouts.max_open_ms,
        max_close_ms: file.timeouts.max_close_ms,
        stall_threshold: file.stall.threshold,
        stall_timeout_ms: file.stall.timeout_ms,
        closed_position: AxisPosition::new(file.positions.closed.y, file.positions.closed.z),
        open_position: AxisPosition::new(file.positions.open.y, file.positions.open.z),
        position_tolerance: file.positions.tolerance,
    }
}

/// Runs the trace through a fresh monitor. The first valid sample seeds
/// `initialize`, then every sample goes through `update`.
pub fn replay(samples: &[TraceSample], config: DoorConfig, mode: StatusMode) -> ReplayOutcome {
    let mut monitor = DoorMonitor::new(config);
    let mut outcome = ReplayOutcome::default();
    let mut seeded = false;

    for replay in samples {
        let mut entered = false;
        if !seeded && replay.sample.valid {
            monitor.initialize(replay.sample.y, replay.sample.z, replay.ms);
            if let Some(change) = monitor.recent_changes().last() {
                outcome.changes.push(*change);
            }
            entered = push_visited(&mut outcome.visited, monitor.state());
            seeded = true;
        }

        let update = monitor.step(replay.sample, replay.ms);
        if let Some(change) = update.change {
            outcome.changes.push(change);
        }
        entered |= push_visited(&mut outcome.visited, update.state);

        if mode == StatusMode::Every || entered || outcome.lines.is_empty() {
            let snapshot = monitor.snapshot(replay.ms);
            outcome.lines.push(StatusLine {
                ms: replay.ms,
                state: snapshot.label,
                details: snapshot.details,
                accel_x: replay.sample.x,
                accel_y: replay.sample.y,
                accel_z: replay.sample.z,
                is_moving: snapshot.is_moving,
                is_at_position: snapshot.is_at_position,
                sensor_healthy: snapshot.sensor_healthy,
                time_in_state_ms: snapshot.time_in_state_ms,
            });
        }
    }

    outcome
}

/// Warning text when a replay ends in a fault; latched faults say how to
/// clear them.
pub fn final_state_warning(state: DoorState) -> Option<String> {
    if !state.is_fault() {
        return None;
    }
    let label = state_label(state);
    Some(if state.is_latched() {
        format!("replay ended in {label}, latched until initialize or reset")
    } else {
        format!("replay ended in {label}")
    })
}

fn push_visited(visited: &mut Vec<DoorState>, state: DoorState) -> bool {
    if visited.last() == Some(&state) {
        return false;
    }
    visited.push(state);
    true
}
