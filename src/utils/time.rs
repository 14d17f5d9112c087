//! Time utilities: local → UTC conversion with a fixed offset and the
//! timestamp format expected by the downstream loader.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};

/// `2025-01-07 22:30:00+00`
pub const UTC_STAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S+00";

/// Combine a date with an optional clock time; midnight when absent.
pub fn combine(date: NaiveDate, time: Option<NaiveTime>) -> NaiveDateTime {
    date.and_time(time.unwrap_or(NaiveTime::MIN))
}

/// Shift a local wall-clock instant by a fixed offset (no DST handling).
pub fn local_to_utc(local: NaiveDateTime, offset_hours: i64) -> DateTime<Utc> {
    (local - Duration::hours(offset_hours)).and_utc()
}

pub fn format_utc(ts: &DateTime<Utc>) -> String {
    ts.format(UTC_STAMP_FORMAT).to_string()
}

pub fn format_optional_utc(ts: &Option<DateTime<Utc>>) -> String {
    ts.as_ref().map(format_utc).unwrap_or_default()
}
