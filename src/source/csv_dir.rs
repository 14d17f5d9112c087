//! CSV sheets: one file per sheet, named after the file stem.

use super::{Cell, Sheet, SourceRow};
use crate::errors::{AppError, AppResult};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Read every `*.csv` file of `dir` as a sheet, in file-name order.
pub fn read_dir(dir: &Path) -> AppResult<Vec<Sheet>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_csv = path
            .extension()
            .map(|e| e.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);
        if path.is_file() && is_csv {
            paths.push(path);
        }
    }

    if paths.is_empty() {
        return Err(AppError::Source(format!(
            "no CSV sheets found in {}",
            dir.display()
        )));
    }

    paths.sort();
    paths.iter().map(|p| read_csv_sheet(p)).collect()
}

/// Read one CSV file. The first line is the header and is not returned.
pub fn read_csv_sheet(path: &Path) -> AppResult<Sheet> {
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let number = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(rows.len() + 2);
        let cells = record.iter().map(Cell::text_of).collect();
        rows.push(SourceRow::new(number, cells));
    }

    debug!(sheet = %name, rows = rows.len(), "csv sheet loaded");
    Ok(Sheet { name, rows })
}
