use super::types::DoorState;

pub const fn state_label(state: DoorState) -> &'static str {
    match state {
        DoorState::Closed => "CLOSED",
        DoorState::Open => "OPEN",
        DoorState::Opening => "OPENING",
        DoorState::Closing => "CLOSING",
        DoorState::Stopped => "STOPPED",
        DoorState::SensorFailure => "ERROR_SENSOR_FAILURE",
        DoorState::Timeout => "ERROR_TIMEOUT",
        DoorState::Stalled => "ERROR_STALLED",
        DoorState::Unknown => "UNKNOWN",
    }
}

/// Parses a tag produced by [`state_label`], ignoring ASCII case.
pub fn parse_state_label(label: &str) -> Option<DoorState> {
    DoorState::ALL
        .into_iter()
        .find(|state| state_label(*state).eq_ignore_ascii_case(label.trim()))
}

/// Human-readable sentence for a state. Stopped and the latched faults use
/// the last direction of travel to say which way the door was going.
pub const fn detailed_status(state: DoorState, last_direction: DoorState) -> &'static str {
    match (state, last_direction) {
        (DoorState::Closed, _) => "Door is CLOSED (at the closed reference position)",
        (DoorState::Open, _) => "Door is OPEN (at the open reference position)",
        (DoorState::Opening, _) => "Door is OPENING (moving toward open position)",
        (DoorState::Closing, _) => "Door is CLOSING (moving toward closed position)",
        (DoorState::Stopped, DoorState::Opening) => {
            "Door STOPPED mid-open (was opening, not at full open)"
        }
        (DoorState::Stopped, DoorState::Closing) => {
            "Door STOPPED mid-close (was closing, not at full closed)"
        }
        (DoorState::Stopped, _) => "Door STOPPED (intermediate position)",
        (DoorState::SensorFailure, _) => "ERROR: Sensor failure detected",
        (DoorState::Timeout, DoorState::Opening) => "ERROR: Door took too long to open (timeout)",
        (DoorState::Timeout, _) => "ERROR: Door took too long to close (timeout)",
        (DoorState::Stalled, DoorState::Opening) => "ERROR: Door stalled while opening",
        (DoorState::Stalled, _) => "ERROR: Door stalled while closing",
        (DoorState::Unknown, _) => "Status UNKNOWN",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_state_has_a_distinct_label() {
        for (idx, state) in DoorState::ALL.iter().enumerate() {
            for other in &DoorState::ALL[idx + 1..] {
                assert_ne!(state_label(*state), state_label(*other));
            }
        }
    }

    #[test]
    fn labels_parse_back_to_states() {
        for state in DoorState::ALL {
            assert_eq!(parse_state_label(state_label(state)), Some(state));
        }
        assert_eq!(parse_state_label(" opening "), Some(DoorState::Opening));
        assert_eq!(parse_state_label("ajar"), None);
    }

    #[test]
    fn stopped_text_follows_last_direction() {
        assert!(detailed_status(DoorState::Stopped, DoorState::Opening).contains("mid-open"));
        assert!(detailed_status(DoorState::Stopped, DoorState::Closing).contains("mid-close"));
        assert!(detailed_status(DoorState::Stopped, DoorState::Unknown).contains("intermediate"));
    }

    #[test]
    fn latched_fault_text_follows_last_direction() {
        assert!(detailed_status(DoorState::Timeout, DoorState::Opening).contains("to open"));
        assert!(detailed_status(DoorState::Timeout, DoorState::Closing).contains("to close"));
        assert!(detailed_status(DoorState::Stalled, DoorState::Opening).contains("while opening"));
        assert!(detailed_status(DoorState::Stalled, DoorState::Closing).contains("while closing"));
    }

    #[test]
    fn settled_text_ignores_direction() {
        assert_eq!(
            detailed_status(DoorState::Closed, DoorState::Opening),
            detailed_status(DoorState::Closed, DoorState::Unknown)
        );
        assert_eq!(
            detailed_status(DoorState::SensorFailure, DoorState::Closing),
            "ERROR: Sensor failure detected"
        );
    }
}
