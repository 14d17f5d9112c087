//! Date normalizer.
//!
//! Roster cells arrive either as native date/time values or as text in one
//! of a fixed set of patterns. Anything else is "no date": the row is
//! skipped, never guessed.

use crate::source::Cell;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use std::sync::OnceLock;

/// Accepted textual date patterns, tried in order.
pub const DATE_PATTERNS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y"];

/// Accepted textual date-time patterns (the time part is dropped).
pub const DATETIME_PATTERNS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Accepted textual clock times.
pub const TIME_PATTERNS: [&str; 3] = ["%H:%M:%S", "%H:%M", "%I:%M %p"];

/// Registration dates of the customer master list, e.g. `6th Sep 24`.
const REGISTRATION_PATTERNS: [&str; 4] = ["%d %b %y", "%d %b %Y", "%d %B %y", "%d %B %Y"];

/// chrono happily reads "25" as the year 25 with `%Y`; nothing in a roster
/// predates this.
const MIN_YEAR: i32 = 1900;

fn ordinal_re() -> &'static Regex {
    static ORDINAL_RE: OnceLock<Regex> = OnceLock::new();
    ORDINAL_RE.get_or_init(|| {
        Regex::new(r"(?i)\b(\d{1,2})(st|nd|rd|th)\b").expect("valid ordinal regex")
    })
}

fn short_stamp_re() -> &'static Regex {
    static SHORT_STAMP_RE: OnceLock<Regex> = OnceLock::new();
    SHORT_STAMP_RE
        .get_or_init(|| Regex::new(r"^(\d{2}-\d{2}-\d{2})(\s|$)").expect("valid stamp regex"))
}

fn plausible(d: NaiveDate) -> Option<NaiveDate> {
    use chrono::Datelike;
    (d.year() >= MIN_YEAR).then_some(d)
}

/// Canonical date of a roster cell.
pub fn normalize_date(cell: &Cell) -> Option<NaiveDate> {
    match cell {
        Cell::Date(d) => Some(*d),
        Cell::DateTime(dt) => Some(dt.date()),
        Cell::Text(s) => parse_date_str(s),
        _ => None,
    }
}

/// Parse a textual date in one of the accepted patterns.
pub fn parse_date_str(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    DATE_PATTERNS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATETIME_PATTERNS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
        })
        .and_then(plausible)
}

/// Clock time of a start/finish cell.
pub fn normalize_time(cell: &Cell) -> Option<NaiveTime> {
    match cell {
        Cell::Time(t) => Some(*t),
        Cell::DateTime(dt) => Some(dt.time()),
        Cell::Text(s) => {
            let s = s.trim();
            TIME_PATTERNS
                .iter()
                .find_map(|fmt| NaiveTime::parse_from_str(s, fmt).ok())
        }
        _ => None,
    }
}

/// Registration date of the customer master list.
///
/// Besides the roster patterns this accepts `6th Sep 24`, `21 March 2025`
/// and the short `YY-MM-DD hh:mm:ss+00` stamps of the curated table.
pub fn parse_registration_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Some(caps) = short_stamp_re().captures(s) {
        return NaiveDate::parse_from_str(&caps[1], "%y-%m-%d").ok();
    }

    if let Some(d) = parse_date_str(s) {
        return Some(d);
    }

    // ISO stamp with a zone suffix: keep the date part only
    if s.len() > 10
        && let Some(d) = s.get(..10).and_then(parse_date_str)
    {
        return Some(d);
    }

    let cleaned = ordinal_re().replace_all(s, "$1");
    let cleaned = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");

    REGISTRATION_PATTERNS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(&cleaned, fmt).ok())
        .and_then(plausible)
}
