/// One accelerometer observation. Only `y` and `z` feed classification; `x`
/// rides along for display.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AccelSample {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub valid: bool,
}

impl AccelSample {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            x,
            y,
            z,
            valid: true,
        }
    }

    /// A failed sensor read. The axes are zeroed the way the driver reports them.
    pub const fn invalid() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            valid: false,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
#[repr(u8)]
pub enum DoorState {
    Closed = 0,
    Open = 1,
    Stopped = 2,
    Opening = 3,
    Closing = 4,
    #[default]
    Unknown = 5,
    SensorFailure = 6,
    Timeout = 7,
    Stalled = 8,
}

impl DoorState {
    pub const ALL: [DoorState; 9] = [
        DoorState::Closed,
        DoorState::Open,
        DoorState::Stopped,
        DoorState::Opening,
        DoorState::Closing,
        DoorState::Unknown,
        DoorState::SensorFailure,
        DoorState::Timeout,
        DoorState::Stalled,
    ];

    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    pub const fn is_moving(self) -> bool {
        matches!(self, DoorState::Opening | DoorState::Closing)
    }

    pub const fn is_at_position(self) -> bool {
        matches!(self, DoorState::Closed | DoorState::Open)
    }

    pub const fn is_fault(self) -> bool {
        matches!(
            self,
            DoorState::SensorFailure | DoorState::Timeout | DoorState::Stalled
        )
    }

    /// Faults that only `reset` or `initialize` clear.
    pub const fn is_latched(self) -> bool {
        matches!(self, DoorState::Timeout | DoorState::Stalled)
    }

    /// Sample-driven transition table. Lifecycle calls (`initialize`, `reset`)
    /// re-seed the monitor from any state and are not listed here.
    pub const fn can_transition_to(self, next: DoorState) -> bool {
        use DoorState::*;
        match self {
            Closed | Open | Stopped => matches!(next, Opening | Closing | SensorFailure),
            Unknown => matches!(
                next,
                Opening | Closing | Closed | Open | Stopped | SensorFailure
            ),
            Opening => matches!(
                next,
                Closing | Closed | Open | Stopped | Timeout | Stalled | SensorFailure
            ),
            Closing => matches!(
                next,
                Opening | Closed | Open | Stopped | Timeout | Stalled | SensorFailure
            ),
            SensorFailure => matches!(next, Unknown),
            Timeout | Stalled => false,
        }
    }
}
