use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::Serialize;

/// Team identifiers are plain integers in the roster (column M).
pub type TeamId = i64;

/// Role of a staff label on a row.
///
/// Core members carry a team id on the row, additional staff do not and are
/// attributed to whatever job their row's (date, customer) key resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Role {
    CoreMember,
    AdditionalStaff,
}

/// One row's worth of team-composition evidence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub team_id: TeamId,
    pub raw_label: String,
    pub role: Role,
}

impl Observation {
    pub fn core(date: NaiveDate, team_id: TeamId, raw_label: &str) -> Self {
        Self {
            date,
            team_id,
            raw_label: raw_label.trim().to_string(),
            role: Role::CoreMember,
        }
    }
}

/// Lunch-break cell: "Yes" / "No" / anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum LunchBreak {
    Taken,
    NotTaken,
    #[default]
    Unspecified,
}

impl LunchBreak {
    pub fn from_text(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "yes" | "y" => LunchBreak::Taken,
            "no" | "n" => LunchBreak::NotTaken,
            _ => LunchBreak::Unspecified,
        }
    }
}

/// A staff label found on a job row, with its role classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffMark {
    pub label: String,
    pub role: Role,
    /// Parsed team id; `None` for additional staff or for a core member whose
    /// team cell is not a plain integer.
    pub team_id: Option<TeamId>,
}

/// One job-sheet row after validation.
#[derive(Debug, Clone, PartialEq)]
pub struct Attendance {
    pub date: NaiveDate,
    pub customer: String,
    pub start: Option<NaiveTime>,
    pub finish: Option<NaiveTime>,
    pub lunch: LunchBreak,
    pub price: Option<Decimal>,
    pub staff: Option<StaffMark>,
}
