//! Error types.
//!
//! `Error` is what callers see: misconfiguration and invalid values. Everything
//! that can go wrong while computing a stale TTL is a `ComputationError`, which
//! the scheduler absorbs by falling back to the up-to-date TTL.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("no schedule provided and no default schedule configured")]
    NoScheduleProvided,

    #[error("schedule defines no switch-over points")]
    EmptySchedule,

    #[error("invalid switch-over point: day={day} hour={hour} minute={minute}")]
    InvalidSwitchOverPoint { day: u32, hour: u32, minute: u32 },

    #[error("cannot parse switch-over point '{0}' (expected e.g. \"Mon 09:00\")")]
    UnparsableSwitchOverPoint(String),

    #[error("invalid expiration spread: min={min} max={max} (need 0 <= min <= max)")]
    InvalidSpreadRange { min: i64, max: i64 },
}

/// The clock could not produce the current date-time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unable to read current date-time: {0}")]
pub struct ClockReadError(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComputationError {
    #[error(transparent)]
    ClockRead(#[from] ClockReadError),

    #[error("schedule has no up-to-date switch-over point")]
    NoUpcomingSwitchOver,

    #[error("schedule defines no switch-over points")]
    EmptySchedule,

    #[error("local time {0} cannot be resolved in the clock's time zone")]
    UnresolvableLocalTime(String),

    #[error("ttl overflows: {seconds}s until switch-over plus {deviation}s spread")]
    TtlOverflow { seconds: i64, deviation: i64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_error_converts_into_computation_error() {
        let err: ComputationError = ClockReadError("ntp down".to_string()).into();
        assert_eq!(err.to_string(), "unable to read current date-time: ntp down");
    }

    #[test]
    fn invalid_point_message_names_fields() {
        let err = Error::InvalidSwitchOverPoint { day: 8, hour: 0, minute: 0 };
        assert!(err.to_string().contains("day=8"));
    }
}
