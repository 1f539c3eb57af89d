//! Weekly switch-over points.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::Weekday;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::Error;

pub const MINUTES_PER_DAY: u32 = 24 * 60;
pub const MINUTES_PER_WEEK: u32 = 7 * MINUTES_PER_DAY;

static POINT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([A-Za-z]+|\d+)\s+(\d{1,2}):(\d{2})\s*$").expect("valid switch-over regex")
});

/// A recurring instant in the week: ISO day (Monday=1 .. Sunday=7), hour and minute.
///
/// Ordering follows the position in the week, starting Monday 00:00.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SwitchOverPoint {
    day: Weekday,
    hour: u32,
    minute: u32,
}

impl SwitchOverPoint {
    pub fn new(day: u32, hour: u32, minute: u32) -> Result<Self, Error> {
        let invalid = Error::InvalidSwitchOverPoint { day, hour, minute };
        let weekday = weekday_from_iso(day).ok_or(invalid.clone())?;
        if hour > 23 || minute > 59 {
            return Err(invalid);
        }
        Ok(Self { day: weekday, hour, minute })
    }

    pub fn on(day: Weekday, hour: u32, minute: u32) -> Result<Self, Error> {
        Self::new(day.number_from_monday(), hour, minute)
    }

    /// ISO-8601 day number, Monday=1 .. Sunday=7.
    pub fn day_of_week(&self) -> u32 {
        self.day.number_from_monday()
    }

    pub fn weekday(&self) -> Weekday {
        self.day
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn minute(&self) -> u32 {
        self.minute
    }

    /// Minutes since Monday 00:00, in `0..MINUTES_PER_WEEK`.
    pub fn minute_of_week(&self) -> u32 {
        minute_of_week(self.day, self.hour, self.minute)
    }
}

pub(crate) fn minute_of_week(day: Weekday, hour: u32, minute: u32) -> u32 {
    day.num_days_from_monday() * MINUTES_PER_DAY + hour * 60 + minute
}

fn weekday_from_iso(day: u32) -> Option<Weekday> {
    match day {
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        7 => Some(Weekday::Sun),
        _ => None,
    }
}

fn weekday_from_name(name: &str) -> Option<Weekday> {
    let lower = name.to_ascii_lowercase();
    let full = [
        ("monday", Weekday::Mon),
        ("tuesday", Weekday::Tue),
        ("wednesday", Weekday::Wed),
        ("thursday", Weekday::Thu),
        ("friday", Weekday::Fri),
        ("saturday", Weekday::Sat),
        ("sunday", Weekday::Sun),
    ];
    full.iter()
        .find(|(n, _)| lower == *n || (lower.len() == 3 && n.starts_with(lower.as_str())))
        .map(|(_, d)| *d)
}

impl PartialOrd for SwitchOverPoint {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SwitchOverPoint {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.minute_of_week().cmp(&other.minute_of_week())
    }
}

impl fmt::Display for SwitchOverPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:02}:{:02}", self.day, self.hour, self.minute)
    }
}

/// Parses `"Mon 09:00"`, `"monday 9:00"` or `"1 09:00"`.
impl FromStr for SwitchOverPoint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unparsable = || Error::UnparsableSwitchOverPoint(s.to_string());
        let caps = POINT_RE.captures(s).ok_or_else(unparsable)?;

        let day_token = &caps[1];
        let day = if day_token.chars().all(|c| c.is_ascii_digit()) {
            day_token.parse::<u32>().map_err(|_| unparsable())?
        } else {
            weekday_from_name(day_token).ok_or_else(unparsable)?.number_from_monday()
        };
        let hour = caps[2].parse::<u32>().map_err(|_| unparsable())?;
        let minute = caps[3].parse::<u32>().map_err(|_| unparsable())?;

        Self::new(day, hour, minute)
    }
}

impl TryFrom<String> for SwitchOverPoint {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SwitchOverPoint> for String {
    fn from(point: SwitchOverPoint) -> Self {
        point.to_string()
    }
}
