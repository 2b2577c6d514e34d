use super::*;

impl DoorHsm {
    pub(in crate::door) fn new(config: DoorConfig) -> Self {
        Self {
            config,
            state: DoorState::Unknown,
            last_direction: DoorState::Unknown,
            last_y: 0.0,
            last_z: 0.0,
            last_movement_ms: 0,
            state_changed_ms: 0,
            stall_window_ms: 0,
            sensor_healthy: true,
            invalid_streak: 0,
            last_trace: DoorTraceSample {
                sensor_healthy: true,
                ..DoorTraceSample::default()
            },
            history: HistoryBuffer::new(),
        }
    }

    pub(in crate::door) fn time_in_state(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.state_changed_ms)
    }

    pub(super) fn state_for(state: DoorState) -> State {
        match state {
            DoorState::Closed => State::closed(),
            DoorState::Open => State::open(),
            DoorState::Stopped => State::stopped(),
            DoorState::Opening => State::opening(),
            DoorState::Closing => State::closing(),
            DoorState::Unknown => State::unknown(),
            DoorState::SensorFailure => State::sensor_failure(),
            DoorState::Timeout => State::timeout(),
            DoorState::Stalled => State::stalled(),
        }
    }

    /// Moves the machine to whatever `self.state` ended up as during dispatch.
    pub(super) fn settle(&self, entered_as: DoorState) -> Outcome<State> {
        if self.state == entered_as {
            Handled
        } else {
            Transition(Self::state_for(self.state))
        }
    }

    /// Records a sample-driven state change. Edges outside
    /// [`DoorState::can_transition_to`] are dropped.
    pub(super) fn apply_change(
        &mut self,
        context: &mut DispatchContext,
        to: DoorState,
        cause: TransitionCause,
        now_ms: u64,
    ) {
        if !self.state.can_transition_to(to) {
            return;
        }

        let change = StateChange {
            from: self.state,
            to,
            at_ms: now_ms,
            cause,
        };
        self.state = to;
        self.state_changed_ms = now_ms;
        self.history.write(change);
        self.last_trace.cause = Some(cause);
        context.change = Some(change);
    }

    /// Re-seeds readings and timestamps and places the door by position.
    pub(super) fn seed(
        &mut self,
        context: &mut DispatchContext,
        y: f32,
        z: f32,
        now_ms: u64,
    ) -> DoorState {
        let target = resolve_rest_position(y, z, &self.config);
        let change = StateChange {
            from: self.state,
            to: target,
            at_ms: now_ms,
            cause: TransitionCause::Initialized,
        };

        self.last_y = y;
        self.last_z = z;
        self.last_movement_ms = now_ms;
        self.state_changed_ms = now_ms;
        self.stall_window_ms = now_ms;
        self.sensor_healthy = true;
        self.invalid_streak = 0;
        self.state = target;
        self.history.write(change);
        context.change = Some(change);

        self.last_trace = DoorTraceSample {
            now_ms,
            state: target,
            sensor_healthy: true,
            cause: Some(TransitionCause::Initialized),
            ..DoorTraceSample::default()
        };
        target
    }

    pub(super) fn store_reading(&mut self, sample: &AccelSample) {
        self.last_y = sample.y;
        self.last_z = sample.z;
    }

    pub(super) fn begin_trace(&mut self, now_ms: u64) {
        self.last_trace = DoorTraceSample {
            now_ms,
            state: self.state,
            total_change: 0.0,
            direction: DoorState::Unknown,
            invalid_streak: self.invalid_streak,
            sensor_healthy: self.sensor_healthy,
            cause: None,
        };
    }

    pub(super) fn finish_trace(&mut self) {
        self.last_trace.state = self.state;
        self.last_trace.invalid_streak = self.invalid_streak;
        self.last_trace.sensor_healthy = self.sensor_healthy;
    }
}
