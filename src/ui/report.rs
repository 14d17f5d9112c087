//! Printing of run reports.

use crate::models::run_summary::RunReport;
use crate::ui::messages::{detail, header, success, warning};
use crate::utils::colors::{colorize_output_count, colorize_warn_count};
use crate::utils::table::{Column, Table};
use std::collections::{BTreeMap, BTreeSet};

/// Which totals make sense for the pipeline that produced the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Teams,
    Jobs,
}

fn sheet_table(report: &RunReport) -> Table {
    let mut table = Table::new(vec![
        Column::new("sheet"),
        Column::new("rows"),
        Column::new("accepted"),
        Column::new("skipped"),
        Column::new("dropped"),
    ]);

    for s in &report.sheets {
        table.add_row(vec![
            s.name.clone(),
            s.rows.to_string(),
            s.accepted.to_string(),
            s.skipped_total().to_string(),
            s.dropped_groups.to_string(),
        ]);
    }

    table
}

fn names_block(title: &str, names: &BTreeSet<String>) {
    if names.is_empty() {
        return;
    }
    warning(format!("{title} ({})", names.len()));
    for n in names {
        println!("     - {n}");
    }
}

pub fn print_report(report: &RunReport, kind: ReportKind) {
    header("Sheets");
    print!("{}", sheet_table(report).render());

    if !report.excluded_sheets.is_empty() {
        detail("excluded", report.excluded_sheets.join(", "));
    }

    let mut reasons: BTreeMap<&str, usize> = BTreeMap::new();
    for s in &report.sheets {
        for (k, v) in &s.skipped {
            *reasons.entry(*k).or_insert(0) += *v;
        }
    }

    header("Totals");
    detail("rows", report.rows());
    detail("skipped", colorize_warn_count(report.skipped()));
    for (reason, n) in &reasons {
        detail(format!("  {reason}"), n);
    }

    match kind {
        ReportKind::Teams => {
            detail("observations", report.observations);
            detail("periods", colorize_output_count(report.periods));
            detail("memberships", colorize_output_count(report.membership_intervals));
        }
        ReportKind::Jobs => {
            let dropped: usize = report.sheets.iter().map(|s| s.dropped_groups).sum();
            detail("dropped groups", colorize_warn_count(dropped));
            let missing_finish: usize = report.sheets.iter().map(|s| s.missing_finish).sum();
            detail("no finish time", colorize_warn_count(missing_finish));
            detail("jobs", colorize_output_count(report.jobs));
            detail("time entries", colorize_output_count(report.time_entries));
            detail("customers", colorize_output_count(report.customers));

            names_block("Customers missing from the reference table", &report.unresolved_customers);
            names_block("Staff missing from the directory", &report.unresolved_staff);

            if report.unresolved_customers.is_empty() && report.unresolved_staff.is_empty() {
                success("Every customer and staff name resolved.");
            }
        }
    }
}
