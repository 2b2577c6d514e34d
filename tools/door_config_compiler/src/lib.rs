//! Compiles `config/door.toml` into the Rust source of `DEFAULT_DOOR_CONFIG`.
//!
//! The firmware crate runs this from its build script; the replay tool reuses
//! the parser and validator to load alternative configs at runtime.

use std::{fmt, fs, path::Path};

use serde::Deserialize;

#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct MotionSection {
    pub accel_threshold: f32,
    pub stop_timeout_ms: u64,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TimeoutSection {
    pub max_open_ms: u64,
    pub max_close_ms: u64,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct StallSection {
    pub threshold: f32,
    pub timeout_ms: u64,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PositionRef {
    pub y: f32,
    pub z: f32,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PositionSection {
    pub tolerance: f32,
    pub closed: PositionRef,
    pub open: PositionRef,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DoorConfigFile {
    pub motion: MotionSection,
    pub timeouts: TimeoutSection,
    pub stall: StallSection,
    pub positions: PositionSection,
}

#[derive(Debug)]
pub enum ConfigCompilerError {
    Io(String),
    Parse(String),
    Validation(String),
}

impl fmt::Display for ConfigCompilerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "io error: {msg}"),
            Self::Parse(msg) => write!(f, "parse error: {msg}"),
            Self::Validation(msg) => write!(f, "validation error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigCompilerError {}

pub fn parse_config_str(raw: &str) -> Result<DoorConfigFile, ConfigCompilerError> {
    toml::from_str(raw).map_err(|e| ConfigCompilerError::Parse(e.to_string()))
}

pub fn parse_config_file(path: &Path) -> Result<DoorConfigFile, ConfigCompilerError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| ConfigCompilerError::Io(format!("{}: {e}", path.display())))?;
    parse_config_str(&raw)
}

fn require_non_negative(value: f32, field: &str) -> Result<(), ConfigCompilerError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigCompilerError::Validation(format!(
            "{field} must be a finite non-negative number"
        )))
    }
}

fn require_finite(position: PositionRef, field: &str) -> Result<(), ConfigCompilerError> {
    if position.y.is_finite() && position.z.is_finite() {
        Ok(())
    } else {
        Err(ConfigCompilerError::Validation(format!(
            "{field} coordinates must be finite"
        )))
    }
}

pub fn validate_config(config: &DoorConfigFile) -> Result<(), ConfigCompilerError> {
    require_non_negative(config.motion.accel_threshold, "motion.accel_threshold")?;
    require_non_negative(config.stall.threshold, "stall.threshold")?;
    require_non_negative(config.positions.tolerance, "positions.tolerance")?;
    require_finite(config.positions.closed, "positions.closed")?;
    require_finite(config.positions.open, "positions.open")?;

    if config.motion.stop_timeout_ms == 0 {
        return Err(ConfigCompilerError::Validation(
            "motion.stop_timeout_ms must be > 0".into(),
        ));
    }
    if config.positions.tolerance == 0.0 {
        return Err(ConfigCompilerError::Validation(
            "positions.tolerance must be > 0".into(),
        ));
    }
    if config.stall.threshold > config.motion.accel_threshold {
        return Err(ConfigCompilerError::Validation(
            "stall.threshold must be <= motion.accel_threshold".into(),
        ));
    }

    // A point can sit within tolerance of both references when they are closer
    // than two tolerances apart on each axis.
    let reach = config.positions.tolerance * 2.0;
    let closed = config.positions.closed;
    let open = config.positions.open;
    if (closed.y - open.y).abs() <= reach && (closed.z - open.z).abs() <= reach {
        return Err(ConfigCompilerError::Validation(
            "positions.closed and positions.open overlap within positions.tolerance".into(),
        ));
    }

    Ok(())
}

fn render_position(position: PositionRef) -> String {
    format!("AxisPosition {{ y: {:?}, z: {:?} }}", position.y, position.z)
}

pub fn render_generated_config(config: &DoorConfigFile) -> String {
    let mut out = String::new();
    out.push_str("// @generated by door_config_compiler from config/door.toml. Do not edit.\n");
    out.push_str("pub const DEFAULT_DOOR_CONFIG: DoorConfig = DoorConfig {\n");
    out.push_str(&format!(
        "    accel_threshold: {:?},\n",
        config.motion.accel_threshold
    ));
    out.push_str(&format!(
        "    stop_timeout_ms: {},\n",
        config.motion.stop_timeout_ms
    ));
    out.push_str(&format!(
        "    max_open_ms: {},\n",
        config.timeouts.max_open_ms
    ));
    out.push_str(&format!(
        "    max_close_ms: {},\n",
        config.timeouts.max_close_ms
    ));
    out.push_str(&format!(
        "    stall_threshold: {:?},\n",
        config.stall.threshold
    ));
    out.push_str(&format!(
        "    stall_timeout_ms: {},\n",
        config.stall.timeout_ms
    ));
    out.push_str(&format!(
        "    closed_position: {},\n",
        render_position(config.positions.closed)
    ));
    out.push_str(&format!(
        "    open_position: {},\n",
        render_position(config.positions.open)
    ));
    out.push_str(&format!(
        "    position_tolerance: {:?},\n",
        config.positions.tolerance
    ));
    out.push_str("};\n");
    out
}

pub fn generate_from_path(path: &Path) -> Result<String, ConfigCompilerError> {
    let config = parse_config_file(path)?;
    validate_config(&config)?;
    Ok(render_generated_config(&config))
}
