pub mod classify;
pub mod config;
pub mod engine;
mod machine;
pub mod status;
pub mod trace;
pub mod types;

pub use config::{AxisPosition, DoorConfig, DEFAULT_DOOR_CONFIG};
pub use engine::{DoorMonitor, DoorStatusSnapshot, DoorUpdate};
pub use machine::{HISTORY_LEN, SENSOR_FAILURE_STREAK};
pub use status::{detailed_status, parse_state_label, state_label};
pub use trace::{DoorTraceSample, StateChange, TransitionCause};
pub use types::{AccelSample, DoorState};
