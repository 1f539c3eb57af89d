//! Clock abstraction: where "now" comes from.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::error::ClockReadError;

/// Supplies the current time-zone-aware date-time.
///
/// The time zone of the returned value is the zone schedules are evaluated in.
pub trait Clock {
    fn current_date_time(&self) -> Result<DateTime<Tz>, ClockReadError>;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn current_date_time(&self) -> Result<DateTime<Tz>, ClockReadError> {
        (**self).current_date_time()
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn current_date_time(&self) -> Result<DateTime<Tz>, ClockReadError> {
        (**self).current_date_time()
    }
}

/// Wall clock in a fixed IANA time zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemClock {
    tz: Tz,
}

impl SystemClock {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    pub fn utc() -> Self {
        Self::new(Tz::UTC)
    }

    pub fn time_zone(&self) -> Tz {
        self.tz
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::utc()
    }
}

impl Clock for SystemClock {
    fn current_date_time(&self) -> Result<DateTime<Tz>, ClockReadError> {
        Ok(Utc::now().with_timezone(&self.tz))
    }
}

/// Always returns the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    now: DateTime<Tz>,
}

impl FixedClock {
    pub fn new(now: DateTime<Tz>) -> Self {
        Self { now }
    }
}

impl Clock for FixedClock {
    fn current_date_time(&self) -> Result<DateTime<Tz>, ClockReadError> {
        Ok(self.now)
    }
}
