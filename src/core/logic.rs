use crate::core::calculator::{consolidate, members, resolve};
use crate::core::customers::{CustomerPolicy, assemble_customers};
use crate::core::extract::{ColumnLayout, SkipReason, extract_attendance, extract_observation};
use crate::core::jobs::{JobBuilder, JobPolicy};
use crate::core::reassign;
use crate::errors::AppResult;
use crate::models::customer::Customer;
use crate::models::job::{Job, TimeEntry};
use crate::models::observation::{Attendance, Observation, TeamId};
use crate::models::period::{MembershipInterval, Period};
use crate::models::run_summary::{RunReport, SheetReport};
use crate::source::{Sheet, SourceRow};
use crate::source::reference::ReferenceData;
use resolve::{CorrectionSet, GapPolicy};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Everything the two pipelines need besides the rows themselves.
#[derive(Debug, Clone, Default)]
pub struct PipelineSettings {
    pub columns: ColumnLayout,
    pub excluded_sheets: Vec<String>,
    pub gaps: GapPolicy,
    pub jobs: JobPolicy,
    pub customers: CustomerPolicy,
}

impl PipelineSettings {
    pub fn is_excluded(&self, sheet: &str) -> bool {
        self.excluded_sheets
            .iter()
            .any(|s| s.trim().eq_ignore_ascii_case(sheet.trim()))
    }
}

/// Result of the team-tracking pipeline.
#[derive(Debug, Default)]
pub struct TeamTimeline {
    pub periods: BTreeMap<TeamId, Vec<Period>>,
    pub memberships: Vec<MembershipInterval>,
    pub report: RunReport,
}

impl TeamTimeline {
    pub fn all_periods(&self) -> impl Iterator<Item = &Period> {
        self.periods.values().flatten()
    }
}

/// Result of the job pipeline, ids already reassigned.
#[derive(Debug, Default)]
pub struct JobExportSet {
    pub jobs: Vec<Job>,
    pub time_entries: Vec<TimeEntry>,
    pub customers: Vec<Customer>,
    pub report: RunReport,
}

pub struct Core;

impl Core {
    /// Run `extract` over every row of every non-excluded sheet, counting
    /// skips per sheet.
    fn scan<T, F>(
        sheets: &[Sheet],
        settings: &PipelineSettings,
        report: &mut RunReport,
        mut extract: F,
    ) -> Vec<(SheetReport, Vec<T>)>
    where
        F: FnMut(&SourceRow) -> Result<T, SkipReason>,
    {
        let mut out = Vec::with_capacity(sheets.len());

        for sheet in sheets {
            if settings.is_excluded(&sheet.name) {
                debug!(sheet = %sheet.name, "sheet excluded");
                report.excluded_sheets.push(sheet.name.clone());
                continue;
            }

            let mut sheet_report = SheetReport::new(&sheet.name);
            let mut accepted = Vec::new();

            for row in sheet.rows.iter().filter(|r| !r.is_blank()) {
                sheet_report.rows += 1;
                match extract(row) {
                    Ok(v) => {
                        sheet_report.accepted += 1;
                        accepted.push(v);
                    }
                    Err(reason) => {
                        debug!(sheet = %sheet.name, row = row.number, %reason, "row skipped");
                        sheet_report.skip(reason.kind());
                    }
                }
            }

            info!(
                sheet = %sheet.name,
                rows = sheet_report.rows,
                accepted = sheet_report.accepted,
                skipped = sheet_report.skipped_total(),
                "sheet scanned"
            );
            out.push((sheet_report, accepted));
        }

        out
    }

    /// Observations → consolidated periods → resolved partition →
    /// per-individual membership intervals.
    pub fn track_teams(
        sheets: &[Sheet],
        settings: &PipelineSettings,
        corrections: &CorrectionSet,
    ) -> AppResult<TeamTimeline> {
        let mut report = RunReport::default();
        let mut observations: Vec<Observation> = Vec::new();

        let columns = &settings.columns;
        for (sheet_report, obs) in Self::scan(sheets, settings, &mut report, |row| {
            extract_observation(row, columns)
        }) {
            report.sheets.push(sheet_report);
            observations.extend(obs);
        }

        let consolidated = consolidate::consolidate_all(&observations);
        let periods = resolve::resolve_all(&consolidated, corrections, &settings.gaps)?;
        let memberships = members::expand_all(&periods);

        report.observations = observations.len();
        report.periods = periods.values().map(Vec::len).sum();
        report.membership_intervals = memberships.len();

        info!(
            teams = periods.len(),
            periods = report.periods,
            memberships = report.membership_intervals,
            "team timeline resolved"
        );

        Ok(TeamTimeline {
            periods,
            memberships,
            report,
        })
    }

    /// Attendance rows → jobs and time entries → customers → dense ids.
    pub fn build_jobs(
        sheets: &[Sheet],
        settings: &PipelineSettings,
        refs: &ReferenceData,
    ) -> AppResult<JobExportSet> {
        let mut report = RunReport::default();
        let mut builder = JobBuilder::new(&settings.jobs, refs);

        let columns = &settings.columns;
        let scanned: Vec<(SheetReport, Vec<Attendance>)> =
            Self::scan(sheets, settings, &mut report, |row| {
                extract_attendance(row, columns)
            });

        for (mut sheet_report, rows) in scanned {
            builder.add_sheet(&rows, &mut sheet_report);
            report.sheets.push(sheet_report);
        }

        let batch = builder.finish();
        let mut jobs = batch.jobs;
        let mut time_entries = batch.time_entries;
        let mut customers = assemble_customers(&jobs, &refs.details, &settings.customers);

        reassign::reassign_jobs(&mut jobs, &mut time_entries)?;
        reassign::reassign_time_entries(&mut time_entries);
        reassign::reassign_customers(&mut customers, &mut jobs)?;
        reassign::check_integrity(&jobs, &time_entries, &customers)?;

        report.jobs = jobs.len();
        report.time_entries = time_entries.len();
        report.customers = customers.len();
        report.unresolved_customers = batch.unresolved_customers;
        report.unresolved_staff = batch.unresolved_staff;

        info!(
            jobs = report.jobs,
            time_entries = report.time_entries,
            customers = report.customers,
            "job export assembled"
        );

        Ok(JobExportSet {
            jobs,
            time_entries,
            customers,
            report,
        })
    }
}
