//! Counters and name lists collected while the pipelines run.
//! The core fills them in, the CLI prints them.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Per-sheet counters.
#[derive(Debug, Default, Clone, Serialize)]
pub struct SheetReport {
    pub name: String,
    pub rows: usize,
    pub accepted: usize,
    /// Skipped rows by reason kind (see `SkipReason::kind`).
    pub skipped: BTreeMap<&'static str, usize>,
    /// (date, customer) groups dropped by the job builder.
    pub dropped_groups: usize,
    /// Jobs with a lunch flag but no finish time; their clock-out is empty.
    pub missing_finish: usize,
}

impl SheetReport {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn skip(&mut self, kind: &'static str) {
        *self.skipped.entry(kind).or_insert(0) += 1;
    }

    pub fn skipped_total(&self) -> usize {
        self.skipped.values().sum()
    }
}

/// Totals of one run, for either pipeline.
#[derive(Debug, Default, Clone, Serialize)]
pub struct RunReport {
    pub sheets: Vec<SheetReport>,
    pub excluded_sheets: Vec<String>,
    pub observations: usize,
    pub periods: usize,
    pub membership_intervals: usize,
    pub jobs: usize,
    pub time_entries: usize,
    pub customers: usize,
    pub unresolved_customers: BTreeSet<String>,
    pub unresolved_staff: BTreeSet<String>,
}

impl RunReport {
    pub fn rows(&self) -> usize {
        self.sheets.iter().map(|s| s.rows).sum()
    }

    pub fn skipped(&self) -> usize {
        self.sheets.iter().map(|s| s.skipped_total()).sum()
    }
}
