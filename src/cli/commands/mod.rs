pub mod config;
pub mod db;
pub mod init;
pub mod jobs;
pub mod load;
pub mod log;
pub mod teams;

use crate::errors::AppResult;
use crate::export::ExportFormat;
use crate::source::{Sheet, load_sheets};
use crate::ui::messages::info;
use std::path::Path;

/// Explicit `--format`, else the output extension, else xlsx.
pub(crate) fn resolve_format(explicit: &Option<ExportFormat>, out: &Path) -> ExportFormat {
    explicit
        .clone()
        .or_else(|| ExportFormat::from_path(out))
        .unwrap_or_default()
}

pub(crate) fn read_source(path: &Path) -> AppResult<Vec<Sheet>> {
    info(format!("Reading {}", path.display()));
    let sheets = load_sheets(path)?;
    info(format!("{} sheet(s) found", sheets.len()));
    Ok(sheets)
}
