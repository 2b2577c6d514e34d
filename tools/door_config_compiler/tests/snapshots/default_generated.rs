// @generated by door_config_compiler from config/door.toml. Do not edit.
pub const DEFAULT_DOOR_CONFIG: DoorConfig = DoorConfig {
    accel_threshold: 0.5,
    stop_timeout_ms: 2000,
    max_open_ms: 30000,
    max_close_ms: 30000,
    stall_threshold: 0.1,
    stall_timeout_ms: 5000,
    closed_position: AxisPosition { y: 9.8, z: 0.0 },
    open_position: AxisPosition { y: 0.0, z: 9.8 },
    position_tolerance: 1.0,
};
