//! Scheduler: turns a weekly schedule into a cache TTL.
//!
//! Up to date → the caller's TTL unchanged. Stale → seconds until the next
//! up-to-date switch-over, plus an optional random spread. Failures while
//! computing the stale TTL never reach the caller; the up-to-date TTL is used
//! instead. Only missing or empty schedules are reported as errors.

use chrono::{DateTime, Datelike, Duration, LocalResult, NaiveDateTime, NaiveTime, TimeZone};
use chrono_tz::Tz;
use tracing::{debug, warn};

use crate::clock::Clock;
use crate::error::{ComputationError, Error};
use crate::point::SwitchOverPoint;
use crate::schedule::{DesiredState, Schedule};
use crate::spread::ExpirationSpread;

/// Copy-on-write TTL calculator.
///
/// `set_schedule` and `set_expiration_spread` return a reconfigured copy, so a
/// base scheduler can be shared and specialised per call site.
#[derive(Debug, Clone)]
pub struct Scheduler<C: Clock> {
    clock: C,
    schedule: Option<Schedule>,
    expiration_spread: Option<ExpirationSpread>,
}

impl<C: Clock> Scheduler<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            schedule: None,
            expiration_spread: None,
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn schedule(&self) -> Option<&Schedule> {
        self.schedule.as_ref()
    }

    pub fn expiration_spread(&self) -> Option<&ExpirationSpread> {
        self.expiration_spread.as_ref()
    }

    pub fn set_schedule(&self, schedule: Schedule) -> Self
    where
        C: Clone,
    {
        Self {
            schedule: Some(schedule),
            ..self.clone()
        }
    }

    pub fn set_expiration_spread(&self, expiration_spread: ExpirationSpread) -> Self
    where
        C: Clone,
    {
        Self {
            expiration_spread: Some(expiration_spread),
            ..self.clone()
        }
    }

    /// TTL in seconds for content cached now.
    ///
    /// `schedule` and `expiration_spread` override the configured defaults for
    /// this call only.
    pub fn calculate_time_to_live(
        &self,
        up_to_date_ttl: i64,
        schedule: Option<&Schedule>,
        expiration_spread: Option<&ExpirationSpread>,
    ) -> Result<i64, Error> {
        let schedule = schedule
            .or(self.schedule.as_ref())
            .ok_or(Error::NoScheduleProvided)?;

        if schedule.is_clear() {
            return Err(Error::EmptySchedule);
        }

        let spread = expiration_spread.or(self.expiration_spread.as_ref());

        match self.scheduled_time_to_live(up_to_date_ttl, schedule, spread) {
            Ok(ttl) => Ok(ttl),
            Err(err) => {
                warn!(error = %err, up_to_date_ttl, "cannot compute scheduled ttl, falling back");
                Ok(up_to_date_ttl)
            }
        }
    }

    fn scheduled_time_to_live(
        &self,
        up_to_date_ttl: i64,
        schedule: &Schedule,
        spread: Option<&ExpirationSpread>,
    ) -> Result<i64, ComputationError> {
        let now = self.clock.current_date_time()?;

        if schedule.desired_state(&now)? == DesiredState::UpToDate {
            debug!(%now, up_to_date_ttl, "content up to date");
            return Ok(up_to_date_ttl);
        }

        let switch_over = schedule.find_next_up_to_date_switch_over_point(&now)?;
        let seconds = seconds_until(switch_over, &now)?;
        let deviation = spread.map_or(0, ExpirationSpread::determine_deviation);

        debug!(%now, %switch_over, seconds, deviation, "content stale");
        seconds
            .checked_add(deviation)
            .ok_or(ComputationError::TtlOverflow { seconds, deviation })
    }
}

/// Whole seconds from `now` until the next occurrence of `point` in `now`'s time zone.
///
/// Always positive: an occurrence at or before `now` (same weekday, time passed)
/// is taken from next week. Local times skipped by a DST jump move forward one
/// hour; a repeated local time uses the earliest occurrence still after `now`.
pub fn seconds_until(point: SwitchOverPoint, now: &DateTime<Tz>) -> Result<i64, ComputationError> {
    let tz = now.timezone();
    let local_now = now.naive_local();
    let days_ahead = (i64::from(point.weekday().num_days_from_monday())
        - i64::from(now.weekday().num_days_from_monday()))
    .rem_euclid(7);

    let time = NaiveTime::from_hms_opt(point.hour(), point.minute(), 0)
        .ok_or_else(|| ComputationError::UnresolvableLocalTime(point.to_string()))?;

    for weeks in 0..2 {
        let local = (local_now.date() + Duration::days(days_ahead + 7 * weeks)).and_time(time);
        if let Some(target) = resolve_local(&tz, local)?.into_iter().find(|t| t > now) {
            return Ok((target - *now).num_seconds());
        }
    }

    Err(ComputationError::UnresolvableLocalTime(format!("{point} after {now}")))
}

/// Instants for a local time, earliest first.
fn resolve_local(tz: &Tz, local: NaiveDateTime) -> Result<Vec<DateTime<Tz>>, ComputationError> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => Ok(vec![dt]),
        LocalResult::Ambiguous(earlier, later) => Ok(vec![earlier, later]),
        LocalResult::None => tz
            .from_local_datetime(&(local + Duration::hours(1)))
            .earliest()
            .map(|dt| vec![dt])
            .ok_or_else(|| ComputationError::UnresolvableLocalTime(format!("{local} {tz}"))),
    }
}
