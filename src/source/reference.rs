//! Reference tables loaded once before processing: staff directory,
//! customer reference ids and the customer detail tables.
//!
//! All lookups are case-insensitive on trimmed names.

use crate::errors::AppResult;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

fn fold(name: &str) -> String {
    name.trim().to_lowercase()
}

fn read_records<T: DeserializeOwned>(path: &Path) -> AppResult<Vec<T>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)?;

    let mut out = Vec::new();
    for rec in reader.deserialize::<T>() {
        out.push(rec?);
    }
    Ok(out)
}

// ---------------------------
// Staff directory
// ---------------------------

#[derive(Debug, Deserialize)]
struct StaffRecord {
    id: i64,
    first_name: String,
    #[serde(default)]
    last_name: String,
}

/// Full name (case-folded) → user id.
#[derive(Debug, Default, Clone)]
pub struct StaffDirectory {
    by_name: HashMap<String, i64>,
}

impl StaffDirectory {
    pub fn load(path: &Path) -> AppResult<Self> {
        let records: Vec<StaffRecord> = read_records(path)?;
        let dir = Self::from_entries(records.into_iter().map(|r| {
            let full = format!("{} {}", r.first_name.trim(), r.last_name.trim());
            (full, r.id)
        }));
        info!(path = %path.display(), users = dir.len(), "staff directory loaded");
        Ok(dir)
    }

    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, i64)>,
        S: AsRef<str>,
    {
        Self {
            by_name: entries
                .into_iter()
                .map(|(name, id)| (fold(name.as_ref()), id))
                .collect(),
        }
    }

    pub fn resolve(&self, name: &str) -> Option<i64> {
        self.by_name.get(&fold(name)).copied()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

// ---------------------------
// Customer reference ids
// ---------------------------

#[derive(Debug, Deserialize)]
struct CustomerRefRecord {
    id: i64,
    name: String,
}

/// Customer name (case-folded) → numeric id of the legacy system.
#[derive(Debug, Default, Clone)]
pub struct CustomerReference {
    by_name: HashMap<String, i64>,
}

impl CustomerReference {
    pub fn load(path: &Path) -> AppResult<Self> {
        let records: Vec<CustomerRefRecord> = read_records(path)?;
        let reference = Self::from_entries(records.into_iter().map(|r| (r.name, r.id)));
        info!(path = %path.display(), customers = reference.len(), "customer reference loaded");
        Ok(reference)
    }

    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, i64)>,
        S: AsRef<str>,
    {
        Self {
            by_name: entries
                .into_iter()
                .map(|(name, id)| (fold(name.as_ref()), id))
                .collect(),
        }
    }

    pub fn resolve(&self, name: &str) -> Option<i64> {
        self.by_name.get(&fold(name)).copied()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

// ---------------------------
// Customer detail tables
// ---------------------------

/// One row of any customer detail table. Columns a table does not have
/// stay empty; values are kept raw and interpreted by the customer builder.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
pub struct CustomerDetail {
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub active: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub frequency: String,
}

impl CustomerDetail {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }
}

/// A detail table with the exact-then-substring name match.
#[derive(Debug, Default, Clone)]
pub struct DetailTable {
    pub rows: Vec<CustomerDetail>,
}

impl DetailTable {
    pub fn load(path: &Path) -> AppResult<Self> {
        let rows: Vec<CustomerDetail> = read_records(path)?;
        info!(path = %path.display(), rows = rows.len(), "customer detail table loaded");
        Ok(Self { rows })
    }

    pub fn new(rows: Vec<CustomerDetail>) -> Self {
        Self { rows }
    }

    /// Exact case-insensitive match first, then the first row whose name
    /// contains the searched name.
    pub fn find(&self, name: &str) -> Option<&CustomerDetail> {
        let key = fold(name);
        if key.is_empty() {
            return None;
        }

        self.rows
            .iter()
            .find(|r| fold(&r.name) == key)
            .or_else(|| self.rows.iter().find(|r| fold(&r.name).contains(&key)))
    }
}

/// The three auxiliary customer tables.
#[derive(Debug, Default, Clone)]
pub struct CustomerTables {
    /// Master list ("all"): address, phone, registration date.
    pub all: DetailTable,
    /// Curated list ("combined"): address, phone, price, active flag, created_at.
    pub combined: DetailTable,
    /// Regular customers: cleaning frequency.
    pub regular: DetailTable,
}

/// Everything the job pipeline looks up by name.
#[derive(Debug, Default, Clone)]
pub struct ReferenceData {
    pub staff: StaffDirectory,
    pub customers: CustomerReference,
    pub details: CustomerTables,
}
