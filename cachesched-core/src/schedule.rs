//! Weekly freshness schedule.
//!
//! A schedule is a sorted list of switch-over points, each starting a period
//! with a desired state. The period runs until the next point and wraps around
//! the end of the week, so a schedule with a single point applies its state to
//! the whole week.

use chrono::{DateTime, Datelike, TimeZone, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::ComputationError;
use crate::point::{SwitchOverPoint, minute_of_week};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DesiredState {
    UpToDate,
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub start: SwitchOverPoint,
    pub state: DesiredState,
}

/// Builder-style weekly schedule.
///
/// Builders consume and return the schedule; clone a base schedule to derive
/// variants without touching it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<ScheduleEntry>", into = "Vec<ScheduleEntry>")]
pub struct Schedule {
    entries: Vec<ScheduleEntry>,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `state` from `start` until the next switch-over point.
    /// A point already present at the same position has its state replaced.
    pub fn with_state_from(mut self, start: SwitchOverPoint, state: DesiredState) -> Self {
        let entry = ScheduleEntry { start, state };
        match self.entries.binary_search_by(|e| e.start.cmp(&start)) {
            Ok(idx) => self.entries[idx] = entry,
            Err(idx) => self.entries.insert(idx, entry),
        }
        self
    }

    pub fn up_to_date_from(self, start: SwitchOverPoint) -> Self {
        self.with_state_from(start, DesiredState::UpToDate)
    }

    pub fn stale_from(self, start: SwitchOverPoint) -> Self {
        self.with_state_from(start, DesiredState::Stale)
    }

    /// Up to date from `start` (inclusive) until `end` (exclusive), stale from `end`.
    pub fn with_up_to_date_window(self, start: SwitchOverPoint, end: SwitchOverPoint) -> Self {
        self.up_to_date_from(start).stale_from(end)
    }

    /// Stale from `start` (inclusive) until `end` (exclusive), up to date from `end`.
    pub fn with_stale_window(self, start: SwitchOverPoint, end: SwitchOverPoint) -> Self {
        self.stale_from(start).up_to_date_from(end)
    }

    pub fn is_clear(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in weekly order, starting Monday 00:00.
    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.entries
    }

    pub fn desired_state<Z: TimeZone>(&self, at: &DateTime<Z>) -> Result<DesiredState, ComputationError> {
        let position = week_position(at);

        // Last entry starting at or before `position`; before the first entry
        // of the week the last one is still in effect.
        let governing = self
            .entries
            .iter()
            .rev()
            .find(|e| e.start.minute_of_week() <= position)
            .or_else(|| self.entries.last())
            .ok_or(ComputationError::EmptySchedule)?;

        Ok(governing.state)
    }

    /// Nearest up-to-date switch-over point strictly after `after`'s position in the week.
    pub fn find_next_up_to_date_switch_over_point<Z: TimeZone>(
        &self,
        after: &DateTime<Z>,
    ) -> Result<SwitchOverPoint, ComputationError> {
        let position = week_position(after);
        let mut up_to_date = self
            .entries
            .iter()
            .filter(|e| e.state == DesiredState::UpToDate)
            .map(|e| e.start);

        let first = up_to_date.clone().next().ok_or(ComputationError::NoUpcomingSwitchOver)?;

        Ok(up_to_date
            .find(|p| p.minute_of_week() > position)
            .unwrap_or(first))
    }
}

impl From<Vec<ScheduleEntry>> for Schedule {
    fn from(entries: Vec<ScheduleEntry>) -> Self {
        entries
            .into_iter()
            .fold(Schedule::new(), |schedule, e| schedule.with_state_from(e.start, e.state))
    }
}

impl From<Schedule> for Vec<ScheduleEntry> {
    fn from(schedule: Schedule) -> Self {
        schedule.entries
    }
}

/// Minutes since Monday 00:00 in `at`'s own time zone; seconds are ignored.
pub(crate) fn week_position<Z: TimeZone>(at: &DateTime<Z>) -> u32 {
    minute_of_week(at.weekday(), at.hour(), at.minute())
}
