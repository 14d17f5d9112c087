use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// Cleaning frequency, with the spellings the downstream schema accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum CleanFrequency {
    Weekly,
    Fortnightly,
    TriWeekly,
    Monthly,
    #[default]
    OneOff,
}

impl CleanFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            CleanFrequency::Weekly => "weekly",
            CleanFrequency::Fortnightly => "fortnightly",
            CleanFrequency::TriWeekly => "tri-weekly",
            CleanFrequency::Monthly => "monthly",
            CleanFrequency::OneOff => "one-off",
        }
    }

    /// Map the free-text frequency of the regular customers table.
    /// `6weekly` is deliberately folded into one-off; unknown values too.
    pub fn from_source(raw: &str) -> Self {
        let key: String = raw
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-')
            .collect();

        match key.as_str() {
            "weekly" => CleanFrequency::Weekly,
            "fortnightly" => CleanFrequency::Fortnightly,
            "3weekly" | "triweekly" => CleanFrequency::TriWeekly,
            "monthly" => CleanFrequency::Monthly,
            _ => CleanFrequency::OneOff,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub price: Decimal,
    pub clean_frequency: CleanFrequency,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}
