use super::observation::TeamId;
use crate::utils::date::{format_dmy, serde_dmy};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a period comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PeriodOrigin {
    /// Built from roster observations (possibly truncated, split or extended).
    Observed,
    /// Authoritative correction supplied by the operator.
    Override,
}

/// Closed date range during which a team id kept one team label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Period {
    pub team_id: TeamId,
    pub label: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub origin: PeriodOrigin,
}

impl Period {
    pub fn observed(team_id: TeamId, label: &str, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            team_id,
            label: label.to_string(),
            start,
            end,
            origin: PeriodOrigin::Observed,
        }
    }

    pub fn is_inverted(&self) -> bool {
        self.end < self.start
    }

    pub fn overlaps(&self, other: &Period) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "'{}' [{} - {}]",
            self.label,
            format_dmy(&self.start),
            format_dmy(&self.end)
        )
    }
}

/// One individual's membership of a team id over a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MembershipInterval {
    pub team_id: TeamId,
    pub name: String,
    pub original_team: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Authoritative replacement period, as written in the corrections file.
///
/// ```yaml
/// - team_id: 1
///   name: "Orla Shelly & Tia"
///   start_date: 05/12/2024
///   end_date: 10/12/2024
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Correction {
    pub team_id: TeamId,
    pub name: String,
    #[serde(with = "serde_dmy")]
    pub start_date: NaiveDate,
    #[serde(with = "serde_dmy")]
    pub end_date: NaiveDate,
}

impl Correction {
    pub fn to_period(&self) -> Period {
        Period {
            team_id: self.team_id,
            label: self.name.trim().to_string(),
            start: self.start_date,
            end: self.end_date,
            origin: PeriodOrigin::Override,
        }
    }
}
