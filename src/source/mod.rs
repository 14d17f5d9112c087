//! Source adapters: turn workbooks, CSV folders and reference tables into
//! plain typed rows. No business rule lives here.

pub mod csv_dir;
pub mod reference;
pub mod workbook;

use crate::errors::{AppError, AppResult};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::path::Path;

/// A single spreadsheet cell, already typed by the reader.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Time(NaiveTime),
}

static EMPTY: Cell = Cell::Empty;

impl Cell {
    pub fn text_of(s: &str) -> Self {
        if s.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(s.to_string())
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Trimmed textual rendering of the cell, `None` when blank.
    pub fn text(&self) -> Option<String> {
        let s = match self {
            Cell::Empty => return None,
            Cell::Text(s) => s.trim().to_string(),
            Cell::Int(i) => i.to_string(),
            Cell::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
            Cell::Float(f) => f.to_string(),
            Cell::Bool(b) => b.to_string(),
            Cell::Date(d) => d.format("%Y-%m-%d").to_string(),
            Cell::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
            Cell::Time(t) => t.format("%H:%M:%S").to_string(),
        };

        if s.is_empty() { None } else { Some(s) }
    }
}

/// One data row of a sheet (header row excluded).
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRow {
    /// 1-based row number in the sheet, for diagnostics.
    pub number: usize,
    pub cells: Vec<Cell>,
}

impl SourceRow {
    pub fn new(number: usize, cells: Vec<Cell>) -> Self {
        Self { number, cells }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(Cell::is_blank)
    }

    /// Positional access; out-of-range columns read as empty.
    pub fn cell(&self, idx: usize) -> &Cell {
        self.cells.get(idx).unwrap_or(&EMPTY)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<SourceRow>,
}

/// Load every sheet found at `path`.
///
/// - directory → one sheet per `*.csv` file (see [`csv_dir`])
/// - `.csv` → a single sheet
/// - `.xlsx` / `.xlsm` / `.xls` / `.xlsb` / `.ods` → workbook sheets (see [`workbook`])
pub fn load_sheets(path: &Path) -> AppResult<Vec<Sheet>> {
    if path.is_dir() {
        return csv_dir::read_dir(path);
    }

    if !path.exists() {
        return Err(AppError::Source(format!(
            "source not found: {}",
            path.display()
        )));
    }

    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "csv" => Ok(vec![csv_dir::read_csv_sheet(path)?]),
        "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => workbook::read_workbook(path),
        other => Err(AppError::Source(format!(
            "unsupported source type '{other}': {}",
            path.display()
        ))),
    }
}
