use super::types::DoorState;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum TransitionCause {
    /// Significant movement out of a resting, unknown or faulted state.
    Movement = 1,
    /// Significant movement against the current direction of travel.
    Reversal = 2,
    StopTimeout = 3,
    OpenTimeout = 4,
    CloseTimeout = 5,
    Stall = 6,
    SensorFault = 7,
    SensorRecovered = 8,
    Initialized = 9,
}

impl TransitionCause {
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    pub const fn label(self) -> &'static str {
        match self {
            TransitionCause::Movement => "movement",
            TransitionCause::Reversal => "reversal",
            TransitionCause::StopTimeout => "stop_timeout",
            TransitionCause::OpenTimeout => "open_timeout",
            TransitionCause::CloseTimeout => "close_timeout",
            TransitionCause::Stall => "stall",
            TransitionCause::SensorFault => "sensor_fault",
            TransitionCause::SensorRecovered => "sensor_recovered",
            TransitionCause::Initialized => "initialized",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct StateChange {
    pub from: DoorState,
    pub to: DoorState,
    pub at_ms: u64,
    pub cause: TransitionCause,
}

/// What the engine saw on the most recent update.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DoorTraceSample {
    pub now_ms: u64,
    pub state: DoorState,
    /// Summed |dy| + |dz|; zero when the sample never reached classification.
    pub total_change: f32,
    /// Direction read from a significant change, Unknown otherwise.
    pub direction: DoorState,
    pub invalid_streak: u8,
    pub sensor_healthy: bool,
    pub cause: Option<TransitionCause>,
}
