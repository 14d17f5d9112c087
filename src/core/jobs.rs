//! Job/time-entry builder.
//!
//! Rows of one sheet are grouped by `(date, customer)`; each group becomes a
//! job and every individual named on the group's rows gets a time entry
//! sharing the job's clock times. Ids assigned here are provisional, the
//! reassignment pass replaces them.

use crate::core::calculator::members::split_members;
use crate::models::job::{Job, JobStatus, TimeEntry, UNKNOWN_CUSTOMER_ID};
use crate::models::observation::{Attendance, LunchBreak, Role, TeamId};
use crate::models::run_summary::SheetReport;
use crate::source::reference::ReferenceData;
use crate::utils::time::{combine, local_to_utc};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, warn};

/// Fixed knobs of the builder.
#[derive(Debug, Clone)]
pub struct JobPolicy {
    /// Local time = UTC + this many hours. DST is not honoured.
    pub utc_offset_hours: i64,
    pub lunch_break_minutes: i64,
    pub status: JobStatus,
}

impl Default for JobPolicy {
    fn default() -> Self {
        Self {
            utc_offset_hours: 10,
            lunch_break_minutes: 30,
            status: JobStatus::Completed,
        }
    }
}

/// Rows sharing one (date, customer) key. The first row fixes the visit's
/// times, lunch flag and price.
#[derive(Debug)]
struct Group {
    date: NaiveDate,
    customer: String,
    start: Option<NaiveTime>,
    finish: Option<NaiveTime>,
    lunch: LunchBreak,
    price: Option<Decimal>,
    core_labels: Vec<String>,
    additional_labels: Vec<String>,
    team_id: Option<TeamId>,
}

impl Group {
    fn open(row: &Attendance) -> Self {
        Self {
            date: row.date,
            customer: row.customer.clone(),
            start: row.start,
            finish: row.finish,
            lunch: row.lunch,
            price: row.price,
            core_labels: Vec::new(),
            additional_labels: Vec::new(),
            team_id: None,
        }
    }

    fn attach(&mut self, row: &Attendance) {
        let Some(mark) = &row.staff else {
            return;
        };

        match mark.role {
            Role::CoreMember => {
                push_unique(&mut self.core_labels, &mark.label);
                if mark.team_id.is_some() {
                    self.team_id = mark.team_id;
                }
            }
            Role::AdditionalStaff => push_unique(&mut self.additional_labels, &mark.label),
        }
    }
}

fn push_unique(v: &mut Vec<String>, s: &str) {
    if !v.iter().any(|x| x == s) {
        v.push(s.to_string());
    }
}

fn names_of(labels: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for label in labels {
        for name in split_members(label) {
            if !out.contains(&name) {
                out.push(name);
            }
        }
    }
    out
}

/// Output of the builder, before reassignment.
#[derive(Debug, Default, Clone)]
pub struct JobBatch {
    pub jobs: Vec<Job>,
    pub time_entries: Vec<TimeEntry>,
    pub unresolved_staff: BTreeSet<String>,
    pub unresolved_customers: BTreeSet<String>,
}

pub struct JobBuilder<'a> {
    policy: &'a JobPolicy,
    refs: &'a ReferenceData,
    batch: JobBatch,
}

impl<'a> JobBuilder<'a> {
    pub fn new(policy: &'a JobPolicy, refs: &'a ReferenceData) -> Self {
        Self {
            policy,
            refs,
            batch: JobBatch::default(),
        }
    }

    /// Group one sheet's rows and emit its jobs. Grouping never crosses
    /// sheets.
    pub fn add_sheet(&mut self, rows: &[Attendance], report: &mut SheetReport) {
        let mut groups: Vec<Group> = Vec::new();
        let mut index: HashMap<(NaiveDate, String), usize> = HashMap::new();

        for row in rows {
            let key = (row.date, row.customer.trim().to_string());
            let slot = *index.entry(key).or_insert_with(|| {
                groups.push(Group::open(row));
                groups.len() - 1
            });
            groups[slot].attach(row);
        }

        for group in groups {
            if !self.emit(group, report) {
                report.dropped_groups += 1;
            }
        }
    }

    fn clock_out(
        &self,
        group: &Group,
        clock_in: DateTime<Utc>,
        report: &mut SheetReport,
    ) -> Option<DateTime<Utc>> {
        let lunch = match group.lunch {
            LunchBreak::Taken => Duration::minutes(self.policy.lunch_break_minutes),
            LunchBreak::NotTaken => Duration::zero(),
            LunchBreak::Unspecified => return None,
        };
        let Some(finish) = group.finish else {
            debug!(
                customer = %group.customer,
                date = %group.date,
                "no finish time, clock-out left empty"
            );
            report.missing_finish += 1;
            return None;
        };

        let out = local_to_utc(group.date.and_time(finish), self.policy.utc_offset_hours) - lunch;

        if out < clock_in {
            warn!(
                customer = %group.customer,
                date = %group.date,
                "finish before start, clock-out left empty"
            );
            return None;
        }
        Some(out)
    }

    /// Returns `false` when the group is dropped.
    fn emit(&mut self, group: Group, report: &mut SheetReport) -> bool {
        let members = names_of(&group.core_labels);
        let additional: Vec<String> = names_of(&group.additional_labels)
            .into_iter()
            .filter(|n| !members.contains(n))
            .collect();

        if members.is_empty() && additional.is_empty() {
            debug!(customer = %group.customer, date = %group.date, "group without staff dropped");
            return false;
        }
        let Some(team_id) = group.team_id else {
            debug!(customer = %group.customer, date = %group.date, "group without team id dropped");
            return false;
        };

        let clock_in = local_to_utc(combine(group.date, group.start), self.policy.utc_offset_hours);
        let clock_out = self.clock_out(&group, clock_in, report);

        let customer_id = match self.refs.customers.resolve(&group.customer) {
            Some(id) => id,
            None => {
                if self.batch.unresolved_customers.insert(group.customer.clone()) {
                    warn!(customer = %group.customer, "customer not in reference table");
                }
                UNKNOWN_CUSTOMER_ID
            }
        };

        let job_id = self.batch.jobs.len() as i64 + 1;

        for name in members.iter().chain(additional.iter()) {
            let user_id = self.refs.staff.resolve(name);
            if user_id.is_none() && self.batch.unresolved_staff.insert(name.clone()) {
                warn!(staff = %name, "staff member not in directory");
            }

            self.batch.time_entries.push(TimeEntry {
                id: self.batch.time_entries.len() as i64 + 1,
                user_id,
                staff: name.clone(),
                job_id,
                clock_in_time: clock_in,
                clock_out_time: clock_out,
            });
        }

        self.batch.jobs.push(Job {
            id: job_id,
            customer_id,
            customer_name: group.customer,
            team_id,
            status: self.policy.status,
            created_at: clock_in,
            price: group.price.unwrap_or(Decimal::ZERO),
            team_members_at_creation: members,
            additional_staff: additional,
        });

        true
    }

    pub fn finish(self) -> JobBatch {
        self.batch
    }
}
