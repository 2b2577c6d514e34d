use statig::blocking::IntoStateMachineExt as _;

use super::{
    config::DoorConfig,
    machine::{DispatchContext, DoorEvent, DoorHsm},
    status::{detailed_status, state_label},
    trace::{DoorTraceSample, StateChange},
    types::{AccelSample, DoorState},
};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DoorUpdate {
    pub state: DoorState,
    /// The last state change made by this update, if any.
    pub change: Option<StateChange>,
    pub trace: DoorTraceSample,
}

/// Everything the status-reporting layer polls, captured at one instant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DoorStatusSnapshot {
    pub state: DoorState,
    pub label: &'static str,
    pub details: &'static str,
    pub is_moving: bool,
    pub is_at_position: bool,
    pub sensor_healthy: bool,
    pub time_in_state_ms: u64,
    pub last_direction: DoorState,
    pub last_y: f32,
    pub last_z: f32,
}

/// Door state inference over a caller-driven stream of samples.
///
/// Single owner, no clock: every call carries the caller's millisecond time,
/// which must not go backwards.
pub struct DoorMonitor {
    machine: statig::blocking::StateMachine<DoorHsm>,
}

impl Default for DoorMonitor {
    fn default() -> Self {
        Self::new(DoorConfig::default())
    }
}

impl DoorMonitor {
    pub fn new(config: DoorConfig) -> Self {
        Self {
            machine: DoorHsm::new(config).state_machine(),
        }
    }

    /// Seeds the last reading and all timestamps, then places the door at
    /// Closed, Open or Stopped by position. Clears any fault.
    pub fn initialize(&mut self, y: f32, z: f32, now_ms: u64) -> DoorState {
        self.dispatch(DoorEvent::Initialize { y, z, now_ms }).state
    }

    /// Back to construction defaults, keeping the current config.
    pub fn reset(&mut self) {
        let config = self.config();
        self.machine = DoorHsm::new(config).state_machine();
    }

    pub fn update(&mut self, sample: AccelSample, now_ms: u64) -> DoorState {
        self.step(sample, now_ms).state
    }

    /// [`update`](Self::update) plus the change and trace it produced.
    pub fn step(&mut self, sample: AccelSample, now_ms: u64) -> DoorUpdate {
        self.dispatch(DoorEvent::Sample { sample, now_ms })
    }

    fn dispatch(&mut self, event: DoorEvent) -> DoorUpdate {
        let mut context = DispatchContext::default();
        self.machine.handle_with_context(&event, &mut context);
        let inner = self.machine.inner();
        DoorUpdate {
            state: inner.state,
            change: context.change,
            trace: inner.last_trace,
        }
    }

    pub fn state(&self) -> DoorState {
        self.machine.inner().state
    }

    pub fn state_label(&self) -> &'static str {
        state_label(self.state())
    }

    pub fn detailed_status(&self) -> &'static str {
        let inner = self.machine.inner();
        detailed_status(inner.state, inner.last_direction)
    }

    pub fn is_moving(&self) -> bool {
        self.state().is_moving()
    }

    pub fn is_at_position(&self) -> bool {
        self.state().is_at_position()
    }

    pub fn is_sensor_healthy(&self) -> bool {
        self.machine.inner().sensor_healthy
    }

    pub fn time_in_state(&self, now_ms: u64) -> u64 {
        self.machine.inner().time_in_state(now_ms)
    }

    /// Opening, Closing, or Unknown if the door has not moved since reset.
    pub fn last_movement_direction(&self) -> DoorState {
        self.machine.inner().last_direction
    }

    pub fn config(&self) -> DoorConfig {
        self.machine.inner().config
    }

    /// Replaces the whole config. Running state is kept.
    pub fn set_config(&mut self, config: DoorConfig) {
        let _ = self.dispatch(DoorEvent::Configure(config));
    }

    pub fn last_trace(&self) -> DoorTraceSample {
        self.machine.inner().last_trace
    }

    /// Recent state changes, oldest first.
    pub fn recent_changes(&self) -> impl Iterator<Item = &StateChange> + '_ {
        self.machine.inner().history.oldest_ordered()
    }

    pub fn snapshot(&self, now_ms: u64) -> DoorStatusSnapshot {
        let inner = self.machine.inner();
        DoorStatusSnapshot {
            state: inner.state,
            label: state_label(inner.state),
            details: detailed_status(inner.state, inner.last_direction),
            is_moving: inner.state.is_moving(),
            is_at_position: inner.state.is_at_position(),
            sensor_healthy: inner.sensor_healthy,
            time_in_state_ms: inner.time_in_state(now_ms),
            last_direction: inner.last_direction,
            last_y: inner.last_y,
            last_z: inner.last_z,
        }
    }
}
