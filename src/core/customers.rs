//! Customer assembly from job names and the auxiliary customer tables.

use crate::core::dates::parse_registration_date;
use crate::core::extract::parse_amount;
use crate::models::customer::{CleanFrequency, Customer};
use crate::models::job::Job;
use crate::source::reference::{CustomerDetail, CustomerTables};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct CustomerPolicy {
    /// Active curated customers registered on/after this date are exported
    /// even without jobs.
    pub new_customer_cutoff: Option<NaiveDate>,
    /// UTC hour at which registration dates are stamped.
    pub created_hour_utc: u32,
    pub default_created: NaiveDate,
}

impl Default for CustomerPolicy {
    fn default() -> Self {
        Self {
            new_customer_cutoff: None,
            created_hour_utc: 4,
            default_created: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or_default(),
        }
    }
}

/// `412 345 678.0` → `0412 345 678`.
pub fn normalize_phone(raw: &str) -> String {
    let phone = raw.trim();
    let phone = phone.strip_suffix(".0").unwrap_or(phone);

    if phone.is_empty() || phone.starts_with('0') || phone.starts_with('+') {
        phone.to_string()
    } else {
        format!("0{phone}")
    }
}

fn parse_active(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "yes" | "y" | "1" | "active" => Some(true),
        "false" | "no" | "n" | "0" | "inactive" => Some(false),
        _ => None,
    }
}

fn stamp(date: NaiveDate, policy: &CustomerPolicy) -> DateTime<Utc> {
    let time = NaiveTime::from_hms_opt(policy.created_hour_utc.min(23), 0, 0).unwrap_or_default();
    date.and_time(time).and_utc()
}

fn non_empty(s: &str) -> Option<&str> {
    let s = s.trim();
    (!s.is_empty()).then_some(s)
}

/// Curated table first, master list second.
fn pick<F>(combined: Option<&CustomerDetail>, all: Option<&CustomerDetail>, field: F) -> String
where
    F: Fn(&CustomerDetail) -> &str,
{
    combined
        .and_then(|c| non_empty(field(c)))
        .or_else(|| all.and_then(|a| non_empty(field(a))))
        .unwrap_or_default()
        .to_string()
}

/// Attributes of one customer name, looked up in every table.
fn build(
    name: &str,
    tables: &CustomerTables,
    first_price: Option<Decimal>,
    policy: &CustomerPolicy,
) -> Customer {
    let all = tables.all.find(name);
    let combined = tables.combined.find(name);
    let regular = tables.regular.find(name);

    let price = combined
        .and_then(|c| parse_amount(&c.price))
        .or(first_price)
        .unwrap_or(Decimal::ZERO);

    let created = all
        .and_then(|a| parse_registration_date(&a.created_at))
        .or_else(|| combined.and_then(|c| parse_registration_date(&c.created_at)))
        .unwrap_or(policy.default_created);

    Customer {
        id: 0,
        name: name.to_string(),
        address: pick(combined, all, |d| d.address.as_str()),
        phone: normalize_phone(&pick(combined, all, |d| d.phone.as_str())),
        price,
        clean_frequency: regular
            .map(|r| CleanFrequency::from_source(&r.frequency))
            .unwrap_or_default(),
        active: combined.and_then(|c| parse_active(&c.active)).unwrap_or(false),
        created_at: stamp(created, policy),
    }
}

/// Every customer the export needs: all job customers plus the active
/// curated customers registered since the cutoff, in name order. Ids are
/// left at 0.
pub fn assemble_customers(
    jobs: &[Job],
    tables: &CustomerTables,
    policy: &CustomerPolicy,
) -> Vec<Customer> {
    let mut names: Vec<String> = Vec::new();
    let mut first_price: HashMap<String, Decimal> = HashMap::new();

    for job in jobs {
        if !names.contains(&job.customer_name) {
            names.push(job.customer_name.clone());
        }
        first_price
            .entry(job.customer_name.clone())
            .or_insert(job.price);
    }

    if let Some(cutoff) = policy.new_customer_cutoff {
        for row in &tables.combined.rows {
            let Some(name) = non_empty(&row.name) else {
                continue;
            };
            if names.iter().any(|n| n.eq_ignore_ascii_case(name)) {
                continue;
            }

            let active = parse_active(&row.active).unwrap_or(false);
            let recent = parse_registration_date(&row.created_at).is_some_and(|d| d >= cutoff);

            if active && recent {
                debug!(customer = %name, "new customer without jobs added");
                names.push(name.to_string());
            }
        }
    }

    // name order is the tie-break of the id reassignment
    names.sort();

    names
        .iter()
        .map(|name| build(name, tables, first_price.get(name).copied(), policy))
        .collect()
}
