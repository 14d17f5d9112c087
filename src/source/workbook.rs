//! Workbook reader (xlsx/xlsm/xls/ods) backed by calamine.

use super::{Cell, Sheet, SourceRow};
use crate::errors::AppResult;
use calamine::{Data, ExcelDateTime, Reader, open_workbook_auto};
use chrono::NaiveTime;
use std::path::Path;
use tracing::debug;

/// Read every sheet of the workbook, skipping the header row (sheet row 1).
///
/// calamine ranges start at the first used cell, so rows and columns are
/// re-anchored to their absolute position: column M stays index 12 even when
/// column A is empty on the whole sheet.
pub fn read_workbook(path: &Path) -> AppResult<Vec<Sheet>> {
    let mut workbook = open_workbook_auto(path)?;
    let mut sheets = Vec::new();

    for name in workbook.sheet_names() {
        let range = workbook.worksheet_range(&name)?;
        let (first_row, first_col) = range.start().unwrap_or((0, 0));

        let mut rows = Vec::new();
        for (i, data_row) in range.rows().enumerate() {
            let abs_row = first_row as usize + i;
            if abs_row == 0 {
                continue;
            }

            let mut cells = vec![Cell::Empty; first_col as usize];
            cells.extend(data_row.iter().map(cell_from_data));
            rows.push(SourceRow::new(abs_row + 1, cells));
        }

        debug!(sheet = %name, rows = rows.len(), "workbook sheet loaded");
        sheets.push(Sheet { name, rows });
    }

    Ok(sheets)
}

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::text_of(s),
        Data::Int(i) => Cell::Int(*i),
        Data::Float(f) => Cell::Float(*f),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => excel_datetime(dt),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::text_of(s),
        _ => Cell::Empty,
    }
}

/// Excel stores times as a fraction of a day and dates as whole serials.
fn excel_datetime(dt: &ExcelDateTime) -> Cell {
    let serial = dt.as_f64();

    if (0.0..1.0).contains(&serial) {
        let secs = (serial * 86_400.0).round() as u32 % 86_400;
        return NaiveTime::from_num_seconds_from_midnight_opt(secs, 0)
            .map(Cell::Time)
            .unwrap_or(Cell::Float(serial));
    }

    match dt.as_datetime() {
        Some(ndt) if ndt.time() == NaiveTime::MIN => Cell::Date(ndt.date()),
        Some(ndt) => Cell::DateTime(ndt),
        None => Cell::Float(serial),
    }
}
