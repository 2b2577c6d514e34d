//! Stateless threshold rules the engine is built from.

use super::{config::DoorConfig, types::DoorState};


fn abs_diff(a: f32, b: f32) -> f32 {
    if a >= b {
        a - b
    } else {
        b - a
    }
}

/// Absolute change on one axis between consecutive samples.
pub fn movement_magnitude(current: f32, previous: f32) -> f32 {
    abs_diff(current, previous)
}

pub fn is_significant(change: f32, threshold: f32) -> bool {
    change > threshold
}

/// Strict: an elapsed time equal to the timeout has not timed out yet.
pub fn has_timed_out(elapsed_ms: u64, timeout_ms: u64) -> bool {
    elapsed_ms > timeout_ms
}

fn within(value: f32, reference: f32, tolerance: f32) -> bool {
    abs_diff(value, reference) <= tolerance
}

pub fn matches_closed_position(y: f32, z: f32, ref_y: f32, ref_z: f32, tolerance: f32) -> bool {
    within(y, ref_y, tolerance) && within(z, ref_z, tolerance)
}

pub fn matches_open_position(y: f32, z: f32, ref_y: f32, ref_z: f32, tolerance: f32) -> bool {
    within(y, ref_y, tolerance) && within(z, ref_z, tolerance)
}

/// Opening when either axis rose past `threshold`, Closing when either fell
/// past it, Unknown otherwise. Rising cues win when both are present.
pub fn determine_direction(
    current_y: f32,
    previous_y: f32,
    current_z: f32,
    previous_z: f32,
    threshold: f32,
) -> DoorState {
    let dy = current_y - previous_y;
    let dz = current_z - previous_z;

    if dy > threshold || dz > threshold {
        DoorState::Opening
    } else if dy < -threshold || dz < -threshold {
        DoorState::Closing
    } else {
        DoorState::Unknown
    }
}

/// Where a door that has come to rest is. Closed is checked before open, so a
/// point inside both tolerance boxes (references closer than two tolerances)
/// resolves as Closed.
pub fn resolve_rest_position(y: f32, z: f32, config: &DoorConfig) -> DoorState {
    let closed = config.closed_position;
    let open = config.open_position;
    let tolerance = config.position_tolerance;

    if matches_closed_position(y, z, closed.y, closed.z, tolerance) {
        DoorState::Closed
    } else if matches_open_position(y, z, open.y, open.z, tolerance) {
        DoorState::Open
    } else {
        DoorState::Stopped
    }
}
