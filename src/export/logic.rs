// src/export/logic.rs

use crate::core::logic::{JobExportSet, TeamTimeline};
use crate::errors::{AppError, AppResult};
use crate::export::ExportFormat;
use crate::export::fs_utils::{ensure_writable, prepare_dir};
use crate::export::json_csv::{export_csv, export_json};
use crate::export::model::{CustomerRow, JobRow, MembershipRow, PeriodRow, TimeEntryRow, rows_of};
use crate::export::xlsx::{add_sheet, save};
use rust_xlsxwriter::Workbook;
use serde::Serialize;
use std::path::Path;

pub const JOBS_SHEET: &str = "jobs";
pub const TIME_ENTRIES_SHEET: &str = "time_entries";
pub const CUSTOMERS_SHEET: &str = "customers";

/// The job export as one JSON document.
#[derive(Serialize)]
struct JobDocument {
    jobs: Vec<JobRow>,
    time_entries: Vec<TimeEntryRow>,
    customers: Vec<CustomerRow>,
}

/// High-level writers for the two pipelines.
pub struct ExportLogic;

impl ExportLogic {
    /// Membership intervals to one file.
    pub fn export_memberships(
        timeline: &TeamTimeline,
        format: &ExportFormat,
        path: &Path,
        force: bool,
    ) -> AppResult<()> {
        ensure_writable(path, force)?;
        let rows: Vec<MembershipRow> = rows_of(&timeline.memberships);

        match format {
            ExportFormat::Csv => export_csv(&rows, path),
            ExportFormat::Json => export_json(&rows, path),
            ExportFormat::Xlsx => {
                let mut workbook = Workbook::new();
                add_sheet(&mut workbook, "memberships", &rows)?;
                save(&mut workbook, path, "XLSX")
            }
        }
    }

    /// Resolved periods (one row per period) to one file.
    pub fn export_periods(
        timeline: &TeamTimeline,
        format: &ExportFormat,
        path: &Path,
        force: bool,
    ) -> AppResult<()> {
        ensure_writable(path, force)?;
        let rows: Vec<PeriodRow> = timeline.all_periods().map(PeriodRow::from).collect();

        match format {
            ExportFormat::Csv => export_csv(&rows, path),
            ExportFormat::Json => export_json(&rows, path),
            ExportFormat::Xlsx => {
                let mut workbook = Workbook::new();
                add_sheet(&mut workbook, "periods", &rows)?;
                save(&mut workbook, path, "XLSX")
            }
        }
    }

    /// Jobs, time entries and customers.
    ///
    /// - `xlsx` → one workbook, one sheet each
    /// - `csv` → `path` is a directory receiving three files
    /// - `json` → one document with three arrays
    pub fn export_job_set(
        set: &JobExportSet,
        format: &ExportFormat,
        path: &Path,
        force: bool,
    ) -> AppResult<()> {
        let jobs: Vec<JobRow> = rows_of(&set.jobs);
        let entries: Vec<TimeEntryRow> = rows_of(&set.time_entries);
        let customers: Vec<CustomerRow> = rows_of(&set.customers);

        match format {
            ExportFormat::Xlsx => {
                ensure_writable(path, force)?;
                let mut workbook = Workbook::new();
                add_sheet(&mut workbook, JOBS_SHEET, &jobs)?;
                add_sheet(&mut workbook, TIME_ENTRIES_SHEET, &entries)?;
                add_sheet(&mut workbook, CUSTOMERS_SHEET, &customers)?;
                save(&mut workbook, path, "XLSX")
            }
            ExportFormat::Csv => {
                let files = [
                    format!("{JOBS_SHEET}.csv"),
                    format!("{TIME_ENTRIES_SHEET}.csv"),
                    format!("{CUSTOMERS_SHEET}.csv"),
                ];
                let names: Vec<&str> = files.iter().map(String::as_str).collect();
                prepare_dir(path, &names, force)?;

                export_csv(&jobs, &path.join(&files[0]))?;
                export_csv(&entries, &path.join(&files[1]))?;
                export_csv(&customers, &path.join(&files[2]))
            }
            ExportFormat::Json => {
                if path.is_dir() {
                    return Err(AppError::Export(format!(
                        "'{}' is a directory, a file is needed for JSON",
                        path.display()
                    )));
                }
                ensure_writable(path, force)?;
                export_json(
                    &JobDocument {
                        jobs,
                        time_entries: entries,
                        customers,
                    },
                    path,
                )
            }
        }
    }
}
