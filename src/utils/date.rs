use chrono::NaiveDate;

/// Date format of every roster-facing output (team tracker, corrections file).
pub const DMY_FORMAT: &str = "%d/%m/%Y";

pub fn format_dmy(d: &NaiveDate) -> String {
    d.format(DMY_FORMAT).to_string()
}

pub fn parse_dmy(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DMY_FORMAT).ok()
}

/// Every calendar day from `start` to `end`, both included.
pub fn days_between(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut out = Vec::new();
    let mut d = start;

    while d <= end {
        out.push(d);
        match d.succ_opt() {
            Some(next) => d = next,
            None => break,
        }
    }

    out
}

/// Serde adapter for `DD/MM/YYYY` dates (corrections file, config windows).
pub mod serde_dmy {
    use super::{DMY_FORMAT, parse_dmy};
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(d: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&d.format(DMY_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(d)?;
        parse_dmy(&raw)
            .ok_or_else(|| de::Error::custom(format!("invalid date '{raw}', expected DD/MM/YYYY")))
    }
}

/// Same as [`serde_dmy`] for optional fields.
pub mod serde_dmy_opt {
    use super::{DMY_FORMAT, parse_dmy};
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(d: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error> {
        match d {
            Some(d) => s.serialize_some(&d.format(DMY_FORMAT).to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        match raw {
            None => Ok(None),
            Some(s) if s.trim().is_empty() => Ok(None),
            Some(s) => parse_dmy(&s)
                .map(Some)
                .ok_or_else(|| de::Error::custom(format!("invalid date '{s}', expected DD/MM/YYYY"))),
        }
    }
}
