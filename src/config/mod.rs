use crate::core::calculator::resolve::{CorrectionSet, GapPolicy, OffWindow};
use crate::core::customers::CustomerPolicy;
use crate::core::extract::ColumnLayout;
use crate::core::jobs::JobPolicy;
use crate::core::logic::PipelineSettings;
use crate::errors::{AppError, AppResult};
use crate::models::job::JobStatus;
use crate::source::reference::{
    CustomerReference, CustomerTables, DetailTable, ReferenceData, StaffDirectory,
};
use crate::utils::date::{serde_dmy, serde_dmy_opt};
use crate::utils::path::expand_tilde;
use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable that points at an alternative config file.
pub const CONFIG_ENV: &str = "RTEAMLINE_CONFIG";

/// Paths of the three customer detail tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomerDetailFiles {
    pub all: Option<String>,
    pub combined: Option<String>,
    pub regular: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: String,
    /// Sheet names never read (summary tabs, templates).
    pub excluded_sheets: Vec<String>,
    pub columns: ColumnLayout,
    pub utc_offset_hours: i64,
    pub lunch_break_minutes: i64,
    pub job_status: String,
    pub off_weekdays: Vec<Weekday>,
    pub off_windows: Vec<OffWindow>,
    pub corrections_file: Option<String>,
    pub staff_directory: Option<String>,
    pub customer_reference: Option<String>,
    pub customer_details: CustomerDetailFiles,
    #[serde(with = "serde_dmy_opt")]
    pub new_customer_cutoff: Option<NaiveDate>,
    pub customer_created_hour_utc: u32,
    #[serde(with = "serde_dmy")]
    pub default_customer_created: NaiveDate,
}

impl Default for Config {
    fn default() -> Self {
        let jobs = JobPolicy::default();
        let customers = CustomerPolicy::default();

        Self {
            database: Self::database_file().to_string_lossy().to_string(),
            excluded_sheets: Vec::new(),
            columns: ColumnLayout::default(),
            utc_offset_hours: jobs.utc_offset_hours,
            lunch_break_minutes: jobs.lunch_break_minutes,
            job_status: jobs.status.as_str().to_string(),
            off_weekdays: Vec::new(),
            off_windows: Vec::new(),
            corrections_file: None,
            staff_directory: None,
            customer_reference: None,
            customer_details: CustomerDetailFiles::default(),
            new_customer_cutoff: None,
            customer_created_hour_utc: customers.created_hour_utc,
            default_customer_created: customers.default_created,
        }
    }
}

fn optional_path(p: &Option<String>) -> Option<PathBuf> {
    p.as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(expand_tilde)
}

impl Config {
    /// Standard configuration directory
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".rteamline")
    }

    /// Config file: `$RTEAMLINE_CONFIG` when set, the standard location
    /// otherwise.
    pub fn config_file() -> PathBuf {
        match env::var(CONFIG_ENV) {
            Ok(p) if !p.trim().is_empty() => expand_tilde(p.trim()),
            _ => Self::config_dir().join("rteamline.conf"),
        }
    }

    pub fn database_file() -> PathBuf {
        Self::config_dir().join("rteamline.sqlite")
    }

    /// Load the configuration; defaults when the file does not exist.
    pub fn load(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let cfg: Config = serde_yaml::from_str(&content)?;
        debug!(path = %path.display(), "config loaded");
        Ok(cfg)
    }

    pub fn database_path(&self) -> PathBuf {
        expand_tilde(&self.database)
    }

    /// Validate and turn the raw values into engine settings.
    pub fn to_settings(&self) -> AppResult<PipelineSettings> {
        let status = JobStatus::from_code(&self.job_status).ok_or_else(|| {
            AppError::Config(format!("unknown job_status '{}'", self.job_status))
        })?;

        if self.customer_created_hour_utc > 23 {
            return Err(AppError::Config(format!(
                "customer_created_hour_utc must be 0-23, got {}",
                self.customer_created_hour_utc
            )));
        }

        if self.lunch_break_minutes < 0 {
            return Err(AppError::Config(
                "lunch_break_minutes cannot be negative".to_string(),
            ));
        }

        if let Some(w) = self.off_windows.iter().find(|w| w.end < w.start) {
            return Err(AppError::Config(format!(
                "off window ends before it starts: {} - {}",
                w.start, w.end
            )));
        }

        Ok(PipelineSettings {
            columns: self.columns.clone(),
            excluded_sheets: self.excluded_sheets.clone(),
            gaps: GapPolicy {
                off_weekdays: self.off_weekdays.clone(),
                off_windows: self.off_windows.clone(),
            },
            jobs: JobPolicy {
                utc_offset_hours: self.utc_offset_hours,
                lunch_break_minutes: self.lunch_break_minutes,
                status,
            },
            customers: CustomerPolicy {
                new_customer_cutoff: self.new_customer_cutoff,
                created_hour_utc: self.customer_created_hour_utc,
                default_created: self.default_customer_created,
            },
        })
    }

    /// Corrections from `override_path`, else from `corrections_file`;
    /// none configured means no corrections.
    pub fn load_corrections(&self, override_path: Option<&Path>) -> AppResult<CorrectionSet> {
        let path = match override_path {
            Some(p) => p.to_path_buf(),
            None => match optional_path(&self.corrections_file) {
                Some(p) => p,
                None => return Ok(CorrectionSet::default()),
            },
        };

        if !path.exists() {
            return Err(AppError::Config(format!(
                "corrections file not found: {}",
                path.display()
            )));
        }

        let content = fs::read_to_string(&path)?;
        if content.trim().is_empty() {
            return Ok(CorrectionSet::default());
        }

        let set: CorrectionSet = serde_yaml::from_str(&content)?;
        debug!(path = %path.display(), corrections = set.len(), "corrections loaded");
        Ok(set)
    }

    /// Reference tables of the job pipeline. Tables not configured stay
    /// empty: lookups then miss and the misses are reported.
    pub fn load_references(&self) -> AppResult<ReferenceData> {
        let staff = match optional_path(&self.staff_directory) {
            Some(p) => StaffDirectory::load(&p)?,
            None => {
                warn!("no staff directory configured, user ids stay empty");
                StaffDirectory::default()
            }
        };

        let customers = match optional_path(&self.customer_reference) {
            Some(p) => CustomerReference::load(&p)?,
            None => {
                warn!("no customer reference configured");
                CustomerReference::default()
            }
        };

        let table = |p: &Option<String>| -> AppResult<DetailTable> {
            match optional_path(p) {
                Some(path) => DetailTable::load(&path),
                None => Ok(DetailTable::default()),
            }
        };

        Ok(ReferenceData {
            staff,
            customers,
            details: CustomerTables {
                all: table(&self.customer_details.all)?,
                combined: table(&self.customer_details.combined)?,
                regular: table(&self.customer_details.regular)?,
            },
        })
    }

    /// Write the default configuration (unless one is already there) and
    /// return the effective config.
    pub fn init_all(path: &Path, db_override: Option<&str>) -> AppResult<Self> {
        if let Some(dir) = path.parent()
            && !dir.as_os_str().is_empty()
        {
            fs::create_dir_all(dir)?;
        }

        let mut cfg = Self::load(path)?;
        let existed = path.exists();

        if let Some(db) = db_override {
            cfg.database = db.to_string();
        }

        if !existed || db_override.is_some() {
            fs::write(path, serde_yaml::to_string(&cfg)?)?;
        }

        Ok(cfg)
    }
}
