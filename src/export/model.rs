// src/export/model.rs

use crate::models::customer::Customer;
use crate::models::job::{Job, TimeEntry};
use crate::models::period::{MembershipInterval, Period, PeriodOrigin};
use crate::utils::date::format_dmy;
use crate::utils::time::{format_optional_utc, format_utc};
use serde::Serialize;

/// A flat record that can be written as one CSV line or one sheet row.
pub(crate) trait ExportRow: Serialize {
    const HEADERS: &'static [&'static str];

    /// Columns written as text even when they look numeric (phones, names).
    const TEXT_COLUMNS: &'static [&'static str] = &[];

    fn cells(&self) -> Vec<String>;
}

fn opt<T: ToString>(v: &Option<T>) -> String {
    v.as_ref().map(ToString::to_string).unwrap_or_default()
}

// ---------------------------
// Team tracker
// ---------------------------

#[derive(Serialize, Clone, Debug)]
pub struct MembershipRow {
    pub team_id: i64,
    pub name: String,
    pub original_team: String,
    pub start_date: String,
    pub end_date: String,
}

impl From<&MembershipInterval> for MembershipRow {
    fn from(m: &MembershipInterval) -> Self {
        Self {
            team_id: m.team_id,
            name: m.name.clone(),
            original_team: m.original_team.clone(),
            start_date: format_dmy(&m.start),
            end_date: format_dmy(&m.end),
        }
    }
}

impl ExportRow for MembershipRow {
    const HEADERS: &'static [&'static str] =
        &["team_id", "name", "original_team", "start_date", "end_date"];
    const TEXT_COLUMNS: &'static [&'static str] = &["name", "original_team"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.team_id.to_string(),
            self.name.clone(),
            self.original_team.clone(),
            self.start_date.clone(),
            self.end_date.clone(),
        ]
    }
}

#[derive(Serialize, Clone, Debug)]
pub struct PeriodRow {
    pub team_id: i64,
    pub name: String,
    pub start_date: String,
    pub end_date: String,
    pub origin: String,
}

impl From<&Period> for PeriodRow {
    fn from(p: &Period) -> Self {
        Self {
            team_id: p.team_id,
            name: p.label.clone(),
            start_date: format_dmy(&p.start),
            end_date: format_dmy(&p.end),
            origin: match p.origin {
                PeriodOrigin::Observed => "observed",
                PeriodOrigin::Override => "override",
            }
            .to_string(),
        }
    }
}

impl ExportRow for PeriodRow {
    const HEADERS: &'static [&'static str] = &["team_id", "name", "start_date", "end_date", "origin"];
    const TEXT_COLUMNS: &'static [&'static str] = &["name"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.team_id.to_string(),
            self.name.clone(),
            self.start_date.clone(),
            self.end_date.clone(),
            self.origin.clone(),
        ]
    }
}

// ---------------------------
// Job export
// ---------------------------

#[derive(Serialize, Clone, Debug)]
pub struct JobRow {
    pub id: i64,
    pub customer_id: i64,
    pub customer_name: String,
    pub team_id: i64,
    pub status: String,
    pub created_at: String,
    pub price: String,
    pub team_members_at_creation: String,
    pub additional_staff: String,
}

impl From<&Job> for JobRow {
    fn from(j: &Job) -> Self {
        Self {
            id: j.id,
            customer_id: j.customer_id,
            customer_name: j.customer_name.clone(),
            team_id: j.team_id,
            status: j.status.as_str().to_string(),
            created_at: format_utc(&j.created_at),
            price: j.price.to_string(),
            team_members_at_creation: j.team_members_at_creation.join(", "),
            additional_staff: j.additional_staff.join(", "),
        }
    }
}

impl ExportRow for JobRow {
    const HEADERS: &'static [&'static str] = &[
        "id",
        "customer_id",
        "customer_name",
        "team_id",
        "status",
        "created_at",
        "price",
        "team_members_at_creation",
        "additional_staff",
    ];
    const TEXT_COLUMNS: &'static [&'static str] = &[
        "customer_name",
        "created_at",
        "team_members_at_creation",
        "additional_staff",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.customer_id.to_string(),
            self.customer_name.clone(),
            self.team_id.to_string(),
            self.status.clone(),
            self.created_at.clone(),
            self.price.clone(),
            self.team_members_at_creation.clone(),
            self.additional_staff.clone(),
        ]
    }
}

/// Downstream time-entry layout; the last three columns are filled by the
/// target system.
#[derive(Serialize, Clone, Debug)]
pub struct TimeEntryRow {
    pub id: i64,
    pub user_id: Option<i64>,
    pub staff: String,
    pub job_id: i64,
    pub clock_in_time: String,
    pub clock_out_time: String,
    pub lunch_break: String,
    pub geofence_override: String,
    pub auto_lunch_deducted: String,
}

impl From<&TimeEntry> for TimeEntryRow {
    fn from(e: &TimeEntry) -> Self {
        Self {
            id: e.id,
            user_id: e.user_id,
            staff: e.staff.clone(),
            job_id: e.job_id,
            clock_in_time: format_utc(&e.clock_in_time),
            clock_out_time: format_optional_utc(&e.clock_out_time),
            lunch_break: String::new(),
            geofence_override: String::new(),
            auto_lunch_deducted: String::new(),
        }
    }
}

impl ExportRow for TimeEntryRow {
    const HEADERS: &'static [&'static str] = &[
        "id",
        "user_id",
        "staff",
        "job_id",
        "clock_in_time",
        "clock_out_time",
        "lunch_break",
        "geofence_override",
        "auto_lunch_deducted",
    ];
    const TEXT_COLUMNS: &'static [&'static str] = &["staff", "clock_in_time", "clock_out_time"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            opt(&self.user_id),
            self.staff.clone(),
            self.job_id.to_string(),
            self.clock_in_time.clone(),
            self.clock_out_time.clone(),
            self.lunch_break.clone(),
            self.geofence_override.clone(),
            self.auto_lunch_deducted.clone(),
        ]
    }
}

/// Downstream customer layout. Geocoding and the friends/family fields are
/// not known here and stay empty.
#[derive(Serialize, Clone, Debug)]
pub struct CustomerRow {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub latitude: String,
    pub longitude: String,
    pub phone: String,
    pub email: String,
    pub price: String,
    pub clean_frequency: String,
    pub notes: String,
    pub target_time_minutes: String,
    pub average_wage_ratio: String,
    pub is_friends_family: bool,
    pub friends_family_minutes: String,
    pub active: bool,
    pub created_at: String,
}

impl From<&Customer> for CustomerRow {
    fn from(c: &Customer) -> Self {
        Self {
            id: c.id,
            name: c.name.clone(),
            address: c.address.clone(),
            latitude: String::new(),
            longitude: String::new(),
            phone: c.phone.clone(),
            email: String::new(),
            price: c.price.to_string(),
            clean_frequency: c.clean_frequency.as_str().to_string(),
            notes: String::new(),
            target_time_minutes: String::new(),
            average_wage_ratio: String::new(),
            is_friends_family: false,
            friends_family_minutes: String::new(),
            active: c.active,
            created_at: format_utc(&c.created_at),
        }
    }
}

impl ExportRow for CustomerRow {
    const HEADERS: &'static [&'static str] = &[
        "id",
        "name",
        "address",
        "latitude",
        "longitude",
        "phone",
        "email",
        "price",
        "clean_frequency",
        "notes",
        "target_time_minutes",
        "average_wage_ratio",
        "is_friends_family",
        "friends_family_minutes",
        "active",
        "created_at",
    ];
    const TEXT_COLUMNS: &'static [&'static str] =
        &["name", "address", "phone", "email", "notes", "created_at"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.address.clone(),
            self.latitude.clone(),
            self.longitude.clone(),
            self.phone.clone(),
            self.email.clone(),
            self.price.clone(),
            self.clean_frequency.clone(),
            self.notes.clone(),
            self.target_time_minutes.clone(),
            self.average_wage_ratio.clone(),
            self.is_friends_family.to_string(),
            self.friends_family_minutes.clone(),
            self.active.to_string(),
            self.created_at.clone(),
        ]
    }
}

/// Convert a slice of domain values into export rows.
pub(crate) fn rows_of<'a, S, R>(items: &'a [S]) -> Vec<R>
where
    R: From<&'a S>,
{
    items.iter().map(R::from).collect()
}
