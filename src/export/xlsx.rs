// src/export/xlsx.rs

use crate::errors::{AppError, AppResult};
use crate::export::model::ExportRow;
use crate::export::notify_export_success;
use crate::ui::messages::info;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, FormatPattern, Workbook, Worksheet};
use std::path::Path;
use unicode_width::UnicodeWidthStr;

const BAND_1: Color = Color::RGB(0xEAF3FB);
const BAND_2: Color = Color::RGB(0xFFFFFF);

/// One styled sheet per call: bold header, frozen first row, banded rows,
/// columns sized on their widest value.
pub(crate) fn add_sheet<R: ExportRow>(workbook: &mut Workbook, name: &str, rows: &[R]) -> AppResult<()> {
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(name)?;

    // ---------------------------
    // Header
    // ---------------------------
    let header_format = Format::new()
        .set_bold()
        .set_font_color(Color::RGB(0xFFFFFF))
        .set_background_color(Color::RGB(0x2F75B5))
        .set_pattern(FormatPattern::Solid)
        .set_border(FormatBorder::Thin);

    for (col, header) in R::HEADERS.iter().enumerate() {
        worksheet.write_with_format(0, col as u16, *header, &header_format)?;
    }
    worksheet.set_freeze_panes(1, 0)?;

    let text_cols: Vec<bool> = R::HEADERS
        .iter()
        .map(|h| R::TEXT_COLUMNS.contains(h))
        .collect();

    let mut col_widths: Vec<usize> = R::HEADERS
        .iter()
        .map(|h| UnicodeWidthStr::width(*h))
        .collect();

    // ---------------------------
    // Rows
    // ---------------------------
    for (row_index, item) in rows.iter().enumerate() {
        let row = (row_index + 1) as u32;
        let band = if row_index % 2 == 0 { BAND_1 } else { BAND_2 };

        for (col, value) in item.cells().iter().enumerate() {
            let as_text = text_cols.get(col).copied().unwrap_or(true);
            write_cell(worksheet, row, col as u16, value, as_text, band)?;

            if let Some(w) = col_widths.get_mut(col) {
                *w = (*w).max(UnicodeWidthStr::width(value.as_str()));
            }
        }
    }

    for (c, w) in col_widths.iter().enumerate() {
        worksheet.set_column_width(c as u16, (*w).min(60) as f64 + 2.0)?;
    }

    Ok(())
}

/// Numbers go in as numbers unless the column is marked as text; empty
/// values stay blank cells.
fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    s: &str,
    as_text: bool,
    bg: Color,
) -> AppResult<()> {
    let fmt = Format::new()
        .set_background_color(bg)
        .set_pattern(FormatPattern::Solid)
        .set_border(FormatBorder::Thin);

    if s.is_empty() {
        worksheet.write_blank(row, col, &fmt)?;
        return Ok(());
    }

    if !as_text && let Ok(num) = s.parse::<f64>() {
        worksheet.write_with_format(row, col, num, &fmt.set_align(FormatAlign::Right))?;
        return Ok(());
    }

    worksheet.write_with_format(row, col, s, &fmt)?;
    Ok(())
}

pub(crate) fn save(workbook: &mut Workbook, path: &Path, label: &str) -> AppResult<()> {
    info(format!("Exporting to XLSX: {}", path.display()));
    workbook.save(path).map_err(AppError::from)?;
    notify_export_success(label, path);
    Ok(())
}
