/// Expected gravity split across the y and z axes at a reference position.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AxisPosition {
    pub y: f32,
    pub z: f32,
}

impl AxisPosition {
    pub const fn new(y: f32, z: f32) -> Self {
        Self { y, z }
    }
}

/// Monitor tunables. Values are trusted as given: negative thresholds or
/// timeouts are a caller error. The shipped defaults are validated when
/// `config/door.toml` is compiled.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DoorConfig {
    /// Summed y+z change that counts as motion (m/s^2).
    pub accel_threshold: f32,
    /// Quiet period after which a moving or unknown door is resolved.
    pub stop_timeout_ms: u64,
    pub max_open_ms: u64,
    pub max_close_ms: u64,
    /// Change below this while opening/closing counts toward a stall.
    pub stall_threshold: f32,
    pub stall_timeout_ms: u64,
    pub closed_position: AxisPosition,
    pub open_position: AxisPosition,
    /// Per-axis deviation still considered "at" a reference position.
    pub position_tolerance: f32,
}

include!(concat!(env!("OUT_DIR"), "/door_config.rs"));

impl Default for DoorConfig {
    fn default() -> Self {
        DEFAULT_DOOR_CONFIG
    }
}
