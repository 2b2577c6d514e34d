//! Garage door state inference from a two-axis accelerometer stream.
//!
//! The monitor never reads a clock or touches hardware: the firmware loop
//! feeds it samples with a millisecond timestamp and polls the result.

#![cfg_attr(not(test), no_std)]

pub mod door;

pub use door::{
    AccelSample, AxisPosition, DoorConfig, DoorMonitor, DoorState, DoorStatusSnapshot,
    DoorTraceSample, DoorUpdate, StateChange, TransitionCause,
};
