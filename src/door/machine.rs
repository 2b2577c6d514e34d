use heapless::HistoryBuffer;
use statig::prelude::*;

use super::{
    classify::{
        determine_direction, has_timed_out, is_significant, movement_magnitude,
        resolve_rest_position,
    },
    config::DoorConfig,
    trace::{DoorTraceSample, StateChange, TransitionCause},
    types::{AccelSample, DoorState},
};

mod helpers;

/// Consecutive invalid samples that declare the sensor failed.
pub const SENSOR_FAILURE_STREAK: u8 = 5;
/// State changes kept for status reporting.
pub const HISTORY_LEN: usize = 8;

#[derive(Clone, Copy, Debug)]
pub(super) enum DoorEvent {
    Sample { sample: AccelSample, now_ms: u64 },
    Initialize { y: f32, z: f32, now_ms: u64 },
    Configure(DoorConfig),
}

#[derive(Default)]
pub(super) struct DispatchContext {
    pub(super) change: Option<StateChange>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum HealthVerdict {
    Healthy,
    Degraded,
    Failed,
}

/// How the state a sample arrives in reacts when the door is not moving.
#[derive(Clone, Copy, Debug)]
enum Posture {
    /// Closed, Open, Stopped: only new movement leaves them.
    Resting,
    /// Unknown: movement or the stop timeout resolves it.
    Undetermined,
    /// Opening, Closing: bounded by a run limit and stall tracking.
    Moving {
        limit_ms: u64,
        cause: TransitionCause,
    },
}

pub(super) struct DoorHsm {
    pub(super) config: DoorConfig,
    pub(super) state: DoorState,
    pub(super) last_direction: DoorState,
    pub(super) last_y: f32,
    pub(super) last_z: f32,
    pub(super) last_movement_ms: u64,
    pub(super) state_changed_ms: u64,
    pub(super) stall_window_ms: u64,
    pub(super) sensor_healthy: bool,
    pub(super) invalid_streak: u8,
    pub(super) last_trace: DoorTraceSample,
    pub(super) history: HistoryBuffer<StateChange, HISTORY_LEN>,
}

#[state_machine(initial = "State::unknown()")]
impl DoorHsm {
    #[state(superstate = "operational")]
    fn closed(&mut self, context: &mut DispatchContext, event: &DoorEvent) -> Outcome<State> {
        match event {
            DoorEvent::Sample { sample, now_ms } => {
                self.on_sample(context, *sample, *now_ms, Posture::Resting)
            }
            _ => Super,
        }
    }

    #[state(superstate = "operational")]
    fn open(&mut self, context: &mut DispatchContext, event: &DoorEvent) -> Outcome<State> {
        match event {
            DoorEvent::Sample { sample, now_ms } => {
                self.on_sample(context, *sample, *now_ms, Posture::Resting)
            }
            _ => Super,
        }
    }

    #[state(superstate = "operational")]
    fn stopped(&mut self, context: &mut DispatchContext, event: &DoorEvent) -> Outcome<State> {
        match event {
            DoorEvent::Sample { sample, now_ms } => {
                self.on_sample(context, *sample, *now_ms, Posture::Resting)
            }
            _ => Super,
        }
    }

    #[state(superstate = "operational")]
    fn unknown(&mut self, context: &mut DispatchContext, event: &DoorEvent) -> Outcome<State> {
        match event {
            DoorEvent::Sample { sample, now_ms } => {
                self.on_sample(context, *sample, *now_ms, Posture::Undetermined)
            }
            _ => Super,
        }
    }

    #[state(superstate = "operational")]
    fn opening(&mut self, context: &mut DispatchContext, event: &DoorEvent) -> Outcome<State> {
        match event {
            DoorEvent::Sample { sample, now_ms } => {
                let posture = Posture::Moving {
                    limit_ms: self.config.max_open_ms,
                    cause: TransitionCause::OpenTimeout,
                };
                self.on_sample(context, *sample, *now_ms, posture)
            }
            _ => Super,
        }
    }

    #[state(superstate = "operational")]
    fn closing(&mut self, context: &mut DispatchContext, event: &DoorEvent) -> Outcome<State> {
        match event {
            DoorEvent::Sample { sample, now_ms } => {
                let posture = Posture::Moving {
                    limit_ms: self.config.max_close_ms,
                    cause: TransitionCause::CloseTimeout,
                };
                self.on_sample(context, *sample, *now_ms, posture)
            }
            _ => Super,
        }
    }

    #[state(superstate = "supervised")]
    fn sensor_failure(
        &mut self,
        context: &mut DispatchContext,
        event: &DoorEvent,
    ) -> Outcome<State> {
        match event {
            DoorEvent::Sample { sample, now_ms } => {
                let entered_as = self.state;
                self.begin_trace(*now_ms);
                if self.track_health(sample) != HealthVerdict::Healthy {
                    self.finish_trace();
                    return Handled;
                }

                // A good read clears the fault; the same sample is then
                // classified from Unknown.
                self.apply_change(
                    context,
                    DoorState::Unknown,
                    TransitionCause::SensorRecovered,
                    *now_ms,
                );
                if let Some((next, cause)) =
                    self.evaluate(*sample, *now_ms, Posture::Undetermined)
                {
                    self.apply_change(context, next, cause, *now_ms);
                }
                self.finish_trace();
                self.settle(entered_as)
            }
            _ => Super,
        }
    }

    #[state(superstate = "latched")]
    fn timeout(&mut self, context: &mut DispatchContext, event: &DoorEvent) -> Outcome<State> {
        let _ = context;
        let _ = event;
        Super
    }

    #[state(superstate = "latched")]
    fn stalled(&mut self, context: &mut DispatchContext, event: &DoorEvent) -> Outcome<State> {
        let _ = context;
        let _ = event;
        Super
    }

    #[superstate(superstate = "supervised")]
    fn operational(&mut self, context: &mut DispatchContext, event: &DoorEvent) -> Outcome<State> {
        let _ = context;
        let _ = event;
        Super
    }

    /// Timeout and Stalled ignore the door until the owner re-seeds the
    /// monitor. Sensor health and the last reading are still tracked.
    #[superstate(superstate = "supervised")]
    fn latched(&mut self, context: &mut DispatchContext, event: &DoorEvent) -> Outcome<State> {
        let _ = context;
        match event {
            DoorEvent::Sample { sample, now_ms } => {
                self.begin_trace(*now_ms);
                let _ = self.track_health(sample);
                if sample.valid {
                    self.store_reading(sample);
                }
                self.finish_trace();
                Handled
            }
            _ => Super,
        }
    }

    #[superstate]
    fn supervised(&mut self, context: &mut DispatchContext, event: &DoorEvent) -> Outcome<State> {
        match event {
            DoorEvent::Initialize { y, z, now_ms } => {
                let target = self.seed(context, *y, *z, *now_ms);
                Transition(Self::state_for(target))
            }
            DoorEvent::Configure(config) => {
                self.config = *config;
                Handled
            }
            DoorEvent::Sample { .. } => Handled,
        }
    }
}

impl DoorHsm {
    /// The shared update pipeline for the six operational states.
    fn on_sample(
        &mut self,
        context: &mut DispatchContext,
        sample: AccelSample,
        now_ms: u64,
        posture: Posture,
    ) -> Outcome<State> {
        let entered_as = self.state;
        self.begin_trace(now_ms);

        if self.track_health(&sample) == HealthVerdict::Failed {
            self.apply_change(
                context,
                DoorState::SensorFailure,
                TransitionCause::SensorFault,
                now_ms,
            );
            self.finish_trace();
            return self.settle(entered_as);
        }

        if let Some((next, cause)) = self.evaluate(sample, now_ms, posture) {
            self.apply_change(context, next, cause, now_ms);
        }
        self.finish_trace();
        self.settle(entered_as)
    }

    fn track_health(&mut self, sample: &AccelSample) -> HealthVerdict {
        if sample.valid {
            self.invalid_streak = 0;
            self.sensor_healthy = true;
            return HealthVerdict::Healthy;
        }

        self.invalid_streak = self.invalid_streak.saturating_add(1);
        if self.invalid_streak >= SENSOR_FAILURE_STREAK {
            self.sensor_healthy = false;
            HealthVerdict::Failed
        } else {
            HealthVerdict::Degraded
        }
    }

    /// Movement evaluation and the quiet-sample checks. Returns the state the
    /// door should move to, if any; always records the sample's y/z.
    fn evaluate(
        &mut self,
        sample: AccelSample,
        now_ms: u64,
        posture: Posture,
    ) -> Option<(DoorState, TransitionCause)> {
        let config = self.config;
        let total_change =
            movement_magnitude(sample.y, self.last_y) + movement_magnitude(sample.z, self.last_z);
        self.last_trace.total_change = total_change;

        if is_significant(total_change, config.accel_threshold) {
            self.last_movement_ms = now_ms;
            self.stall_window_ms = now_ms;

            let direction = determine_direction(
                sample.y,
                self.last_y,
                sample.z,
                self.last_z,
                config.accel_threshold,
            );
            self.last_trace.direction = direction;
            self.store_reading(&sample);

            if direction == DoorState::Unknown {
                return None;
            }
            self.last_direction = direction;
            if direction == self.state {
                return None;
            }
            let cause = if self.state.is_moving() {
                TransitionCause::Reversal
            } else {
                TransitionCause::Movement
            };
            return Some((direction, cause));
        }

        if let Posture::Moving { limit_ms, cause } = posture {
            if has_timed_out(self.time_in_state(now_ms), limit_ms) {
                self.store_reading(&sample);
                return Some((DoorState::Timeout, cause));
            }

            if total_change < config.stall_threshold {
                let stalled_for = now_ms.saturating_sub(self.stall_window_ms);
                if has_timed_out(stalled_for, config.stall_timeout_ms) {
                    self.store_reading(&sample);
                    return Some((DoorState::Stalled, TransitionCause::Stall));
                }
            } else {
                // Creeping, but not enough to count as movement.
                self.stall_window_ms = now_ms;
            }
        }

        let quiet_for = now_ms.saturating_sub(self.last_movement_ms);
        let resolved = match posture {
            Posture::Resting => None,
            Posture::Undetermined | Posture::Moving { .. } => {
                has_timed_out(quiet_for, config.stop_timeout_ms).then(|| {
                    (
                        resolve_rest_position(sample.y, sample.z, &config),
                        TransitionCause::StopTimeout,
                    )
                })
            }
        };
        self.store_reading(&sample);
        resolved
    }
}
