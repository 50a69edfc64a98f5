//! Core shared types and identifiers

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::errors::{SharedError, SharedResult};

/// Date format used for `found_date`, `contacted_date` and result file names
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Stable identifier of a firm on the directory site
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FirmId(String);

impl FirmId {
    /// Build an id from a raw token. Only ASCII alphanumerics are accepted.
    pub fn new(raw: &str) -> SharedResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(SharedError::InvalidFirmId { input: raw.to_string() });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FirmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for one orchestrator run, stamped on its log lines
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(Uuid);

impl RunId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The short form is enough to tell runs apart in a daily log
        let full = self.0.simple().to_string();
        write!(f, "{}", &full[..8])
    }
}

/// Reference to a detail page found on a listing page
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Candidate {
    pub id: FirmId,
    pub url: String,
}

impl Candidate {
    pub fn new(id: FirmId, url: impl Into<String>) -> Self {
        Self { id, url: url.into() }
    }
}

/// A fully extracted business without a website
///
/// Field order and names are the on-disk format of `<date>_firms.json`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirmRecord {
    pub id: FirmId,
    pub url: String,
    pub name: String,
    pub address: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub description: Option<String>,
    pub category: String,
    #[serde(with = "date_format")]
    pub found_date: NaiveDate,
}

/// One accepted firm in the dedup ledger
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: FirmId,
    /// `None` for ids imported from the legacy id-only ledger format
    #[serde(default, with = "optional_date_format")]
    pub contacted_date: Option<NaiveDate>,
}

impl LedgerEntry {
    pub fn new(id: FirmId, contacted_date: NaiveDate) -> Self {
        Self { id, contacted_date: Some(contacted_date) }
    }

    pub fn legacy(id: FirmId) -> Self {
        Self { id, contacted_date: None }
    }
}

/// Records produced by one run, stamped with the run date
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunResult {
    pub run_date: NaiveDate,
    pub records: Vec<FirmRecord>,
}

impl RunResult {
    pub fn new(run_date: NaiveDate) -> Self {
        Self { run_date, records: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn push(&mut self, record: FirmRecord) {
        self.records.push(record);
    }

    pub fn ids(&self) -> Vec<FirmId> {
        self.records.iter().map(|r| r.id.clone()).collect()
    }

    /// File name of the dated result file, e.g. `2024-03-01_firms.json`
    pub fn file_name(&self) -> String {
        result_file_name(self.run_date)
    }
}

pub fn result_file_name(date: NaiveDate) -> String {
    format!("{}_firms.json", date.format(DATE_FORMAT))
}

mod date_format {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::DATE_FORMAT;

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format(DATE_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(&raw, DATE_FORMAT).map_err(serde::de::Error::custom)
    }
}

mod optional_date_format {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::DATE_FORMAT;

    pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => serializer.serialize_str(&d.format(DATE_FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDate>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        raw.map(|s| NaiveDate::parse_from_str(&s, DATE_FORMAT).map_err(serde::de::Error::custom))
            .transpose()
    }
}
