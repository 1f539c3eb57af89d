//! Parsing of the `--at` override.

use anyhow::{Result, anyhow};
use chrono::{DateTime, NaiveDateTime, TimeZone};
use chrono_tz::Tz;

/// Accepts RFC 3339 (`2026-02-21T10:00:00+01:00`) or a local `YYYY-MM-DD HH:MM`
/// in `tz`. The result is always expressed in `tz`.
pub fn parse_at(input: &str, tz: Tz) -> Result<DateTime<Tz>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&tz));
    }

    let ndt = NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M")
        .map_err(|e| anyhow!("invalid date-time '{input}': {e}"))?;

    tz.from_local_datetime(&ndt)
        .single()
        .ok_or_else(|| anyhow!("ambiguous or invalid local time (DST?): {input} {tz}"))
}
