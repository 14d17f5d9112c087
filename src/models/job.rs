use super::observation::TeamId;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// Customer id used when a name is missing from the reference table.
pub const UNKNOWN_CUSTOMER_ID: i64 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum JobStatus {
    Scheduled,
    InProgress,
    Completed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Scheduled => "scheduled",
            JobStatus::InProgress => "in_progress",
            JobStatus::Completed => "completed",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "scheduled" => Some(JobStatus::Scheduled),
            "in_progress" | "in-progress" => Some(JobStatus::InProgress),
            "completed" => Some(JobStatus::Completed),
            _ => None,
        }
    }
}

/// One billable visit: a (date, customer) pair on one sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Job {
    pub id: i64,
    pub customer_id: i64,
    pub customer_name: String,
    pub team_id: TeamId,
    pub status: JobStatus,
    pub created_at: DateTime<Utc>,
    pub price: Decimal,
    /// Individual names as they were on the sheet, never rewritten afterwards.
    pub team_members_at_creation: Vec<String>,
    pub additional_staff: Vec<String>,
}

/// One staff member's attendance on one job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeEntry {
    pub id: i64,
    pub user_id: Option<i64>,
    pub staff: String,
    pub job_id: i64,
    pub clock_in_time: DateTime<Utc>,
    pub clock_out_time: Option<DateTime<Utc>>,
}
