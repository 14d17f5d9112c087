//! Unified application error type.
//! All modules (source, core, export, db, cli) return AppError to keep the error
//! handling consistent and easy to manage.
//!
//! Row-level problems are *not* errors: they are described by
//! [`crate::core::extract::SkipReason`] and only counted in the run report.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    // ---------------------------
    // Source adapters
    // ---------------------------
    #[error("Workbook error: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Source error: {0}")]
    Source(String),

    // ---------------------------
    // Data inconsistencies (fatal)
    // ---------------------------
    #[error("Inconsistent periods for team {team_id}: {earlier} conflicts with {later}")]
    PeriodInconsistency {
        team_id: i64,
        earlier: String,
        later: String,
    },

    #[error("Overlapping corrections for team {team_id}: {first} and {second}")]
    OverlappingCorrections {
        team_id: i64,
        first: String,
        second: String,
    },

    #[error("Dangling {entity} reference: {key}")]
    DanglingReference { entity: &'static str, key: String },

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Export error: {0}")]
    Export(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("XLSX error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

pub type AppResult<T> = Result<T, AppError>;
