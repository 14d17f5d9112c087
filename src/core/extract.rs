//! Row observation extractor.
//!
//! Every source row goes through exactly one validation function per
//! pipeline and comes out either as a typed value or as a [`SkipReason`].

use crate::core::calculator::members::{canonical_label, split_members};
use crate::core::dates::{normalize_date, normalize_time};
use crate::models::observation::{Attendance, LunchBreak, Observation, Role, StaffMark, TeamId};
use crate::source::{Cell, SourceRow};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Positional layout of a wages sheet (0-based column indexes).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnLayout {
    pub date: usize,
    pub team: usize,
    pub customer: usize,
    pub start: usize,
    pub finish: usize,
    pub lunch: usize,
    pub price: usize,
    pub team_id: usize,
    /// Rows shorter than this are skipped outright.
    pub min_columns: usize,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            date: 0,
            team: 1,
            customer: 2,
            start: 3,
            finish: 4,
            lunch: 5,
            price: 7,
            team_id: 12,
            min_columns: 13,
        }
    }
}

/// Why a row produced nothing. Never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("row has {found} columns, {required} required")]
    TooFewColumns { found: usize, required: usize },

    #[error("missing date")]
    MissingDate,

    #[error("unparsable date '{0}'")]
    UnparsableDate(String),

    #[error("missing team label")]
    MissingTeamLabel,

    #[error("missing team id")]
    MissingTeamId,

    #[error("team id is a formula: {0}")]
    FormulaTeamId(String),

    #[error("team id is not an integer: '{0}'")]
    NonIntegerTeamId(String),

    #[error("missing customer")]
    MissingCustomer,

    #[error("missing start time")]
    MissingStartTime,
}

impl SkipReason {
    /// Stable key used by the run report.
    pub fn kind(&self) -> &'static str {
        match self {
            SkipReason::TooFewColumns { .. } => "too_few_columns",
            SkipReason::MissingDate => "missing_date",
            SkipReason::UnparsableDate(_) => "unparsable_date",
            SkipReason::MissingTeamLabel => "missing_team_label",
            SkipReason::MissingTeamId => "missing_team_id",
            SkipReason::FormulaTeamId(_) => "formula_team_id",
            SkipReason::NonIntegerTeamId(_) => "non_integer_team_id",
            SkipReason::MissingCustomer => "missing_customer",
            SkipReason::MissingStartTime => "missing_start_time",
        }
    }
}

fn check_width(row: &SourceRow, layout: &ColumnLayout) -> Result<(), SkipReason> {
    if row.len() < layout.min_columns {
        return Err(SkipReason::TooFewColumns {
            found: row.len(),
            required: layout.min_columns,
        });
    }
    Ok(())
}

/// Team id of a cell: a plain integer, never a formula.
pub fn parse_team_id(cell: &Cell) -> Result<TeamId, SkipReason> {
    match cell {
        c if c.is_blank() => Err(SkipReason::MissingTeamId),
        Cell::Int(i) => Ok(*i),
        Cell::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => Ok(*f as TeamId),
        Cell::Text(s) => {
            let s = s.trim();
            if s.starts_with('=') {
                return Err(SkipReason::FormulaTeamId(s.to_string()));
            }
            s.parse::<TeamId>()
                .map_err(|_| SkipReason::NonIntegerTeamId(s.to_string()))
        }
        other => Err(SkipReason::NonIntegerTeamId(
            other.text().unwrap_or_default(),
        )),
    }
}

/// Monetary amount written as text: `120`, `120.50`, `$1,200`.
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .trim()
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | ' '))
        .collect();

    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(&cleaned).ok().map(|d| d.round_dp(2))
}

pub fn parse_price(cell: &Cell) -> Option<Decimal> {
    match cell {
        Cell::Int(i) => Some(Decimal::from(*i)),
        Cell::Float(f) => Decimal::try_from(*f).ok().map(|d| d.round_dp(2)),
        Cell::Text(s) => parse_amount(s),
        _ => None,
    }
}

fn parse_lunch(cell: &Cell) -> LunchBreak {
    match cell {
        Cell::Bool(true) => LunchBreak::Taken,
        Cell::Bool(false) => LunchBreak::NotTaken,
        Cell::Text(s) => LunchBreak::from_text(s),
        _ => LunchBreak::Unspecified,
    }
}

/// Team-tracking variant: date, team label and an integer team id are all
/// required; the row always describes the core team of that id.
pub fn extract_observation(
    row: &SourceRow,
    layout: &ColumnLayout,
) -> Result<Observation, SkipReason> {
    check_width(row, layout)?;

    let date_cell = row.cell(layout.date);
    let label_cell = row.cell(layout.team);

    if date_cell.is_blank() {
        return Err(SkipReason::MissingDate);
    }
    if label_cell.is_blank() {
        return Err(SkipReason::MissingTeamLabel);
    }

    let team_id = parse_team_id(row.cell(layout.team_id))?;

    let date = normalize_date(date_cell)
        .ok_or_else(|| SkipReason::UnparsableDate(date_cell.text().unwrap_or_default()))?;

    // "A  &  B" and "A & B" are the same team
    let label = label_cell
        .text()
        .map(|l| canonical_label(&split_members(&l)))
        .filter(|l| !l.is_empty())
        .ok_or(SkipReason::MissingTeamLabel)?;

    Ok(Observation::core(date, team_id, &label))
}

/// Job variant: one row of a (date, customer) visit, with the staff label
/// classified as core member (team id cell filled) or additional staff.
pub fn extract_attendance(
    row: &SourceRow,
    layout: &ColumnLayout,
) -> Result<Attendance, SkipReason> {
    check_width(row, layout)?;

    let customer = row
        .cell(layout.customer)
        .text()
        .ok_or(SkipReason::MissingCustomer)?;

    let date_cell = row.cell(layout.date);
    if date_cell.is_blank() {
        return Err(SkipReason::MissingDate);
    }

    let start_cell = row.cell(layout.start);
    if start_cell.is_blank() {
        return Err(SkipReason::MissingStartTime);
    }

    let date = normalize_date(date_cell)
        .ok_or_else(|| SkipReason::UnparsableDate(date_cell.text().unwrap_or_default()))?;

    let team_cell = row.cell(layout.team_id);
    let staff = row.cell(layout.team).text().map(|label| {
        if team_cell.is_blank() {
            StaffMark {
                label,
                role: Role::AdditionalStaff,
                team_id: None,
            }
        } else {
            StaffMark {
                label,
                role: Role::CoreMember,
                team_id: parse_team_id(team_cell).ok(),
            }
        }
    });

    Ok(Attendance {
        date,
        customer,
        start: normalize_time(start_cell),
        finish: normalize_time(row.cell(layout.finish)),
        lunch: parse_lunch(row.cell(layout.lunch)),
        price: parse_price(row.cell(layout.price)),
        staff,
    })
}
