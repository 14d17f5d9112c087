// src/export/mod.rs

mod fs_utils;
mod json_csv;
pub mod logic;
mod model;
mod xlsx;

pub use logic::ExportLogic;
pub use model::{CustomerRow, JobRow, MembershipRow, PeriodRow, TimeEntryRow};

use crate::ui::messages::success;
use clap::ValueEnum;
use std::path::Path;

/// Shared completion message.
pub(crate) fn notify_export_success(label: &str, path: &Path) {
    success(format!("{label} export completed: {}", path.display()));
}

#[derive(Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
    #[default]
    Xlsx,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Xlsx => "xlsx",
        }
    }

    /// Guess the format from a file extension; directories mean CSV.
    pub fn from_path(path: &Path) -> Option<Self> {
        if path.is_dir() {
            return Some(ExportFormat::Csv);
        }
        match path.extension()?.to_string_lossy().to_lowercase().as_str() {
            "csv" => Some(ExportFormat::Csv),
            "json" => Some(ExportFormat::Json),
            "xlsx" => Some(ExportFormat::Xlsx),
            _ => None,
        }
    }
}
