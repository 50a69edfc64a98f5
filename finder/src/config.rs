//! Run-time configuration
//!
//! A [`FinderConfig`] is built once at startup (defaults, then an optional
//! JSON file, then CLI overrides) and handed to the orchestrator by value.
//! Nothing mutates it afterwards.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use shared::SharedError;

use crate::core::{LabelMap, PacingPolicy, RetryPolicy};
use crate::error::{FinderError, FinderResult};

/// Keywords for coaching, therapy and counselling professions
pub const DEFAULT_KEYWORDS: &[&str] = &[
    "Coach",
    "Coaching",
    "Therapeut",
    "Therapie",
    "Psychotherapeut",
    "Lebensberatung",
    "Mentaltraining",
    "Persönlichkeitsentwicklung",
    "Beratung",
    "Berater",
    "Trainer",
    "Training",
    "Supervision",
    "Psychologe",
    "Psychologie",
    "Gesundheitscoach",
    "Businesscoach",
];

pub const LEDGER_FILE_NAME: &str = "contacted.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinderConfig {
    pub keywords: Vec<String>,
    /// Maximum records accepted per run
    pub target_count: usize,
    pub max_passes: u32,
    pub max_pages_per_query: u32,
    pub max_consecutive_failures: u32,
    pub data_dir: PathBuf,
    pub site: SiteConfig,
    pub http: HttpConfig,
    pub schedule: ScheduleConfig,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            keywords: DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            target_count: 12,
            max_passes: 2,
            max_pages_per_query: 5,
            max_consecutive_failures: 10,
            data_dir: PathBuf::from("data"),
            site: SiteConfig::default(),
            http: HttpConfig::default(),
            schedule: ScheduleConfig::default(),
        }
    }
}

/// Where and how to query the directory site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub base_url: String,
    pub search_url: String,
    pub keyword_param: String,
    pub page_param: String,
    pub selectors: SelectorConfig,
    pub labels: LabelMap,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.firmenabc.at".to_string(),
            search_url: "https://www.firmenabc.at/suche/ergebnisse".to_string(),
            keyword_param: "tx_indexedsearch_pi2[search][word]".to_string(),
            page_param: "page".to_string(),
            selectors: SelectorConfig::default(),
            labels: LabelMap::default(),
        }
    }
}

impl SiteConfig {
    pub fn base(&self) -> FinderResult<Url> {
        parse_url("site.base_url", &self.base_url)
    }

    /// Listing url for one keyword and page
    pub fn listing_url(&self, keyword: &str, page: u32) -> FinderResult<Url> {
        let mut url = parse_url("site.search_url", &self.search_url)?;
        url.query_pairs_mut()
            .append_pair(&self.keyword_param, keyword)
            .append_pair(&self.page_param, &page.to_string());
        Ok(url)
    }
}

/// CSS selectors for listing and detail pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    pub listing_link: String,
    pub end_of_results: String,
    /// When set, a listing page without a match ends pagination
    pub next_page: Option<String>,
    pub contact_block: String,
    pub address: String,
    pub email_link: String,
    pub name: String,
    pub description: String,
    pub category: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            listing_link: "a.company-name".to_string(),
            end_of_results: ".no-results".to_string(),
            next_page: None,
            contact_block: ".contact-info".to_string(),
            address: ".address".to_string(),
            email_link: r#"a[href^="mailto:"]"#.to_string(),
            name: "h1.company-name".to_string(),
            description: ".company-description".to_string(),
            category: ".company-category".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub user_agent: String,
    pub accept_language: String,
    pub request_timeout_secs: u64,
    /// Minimum spacing between two requests
    pub pacing_ms: u64,
    /// Random extra delay added on top of the pacing
    pub pacing_jitter_ms: u64,
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36".to_string(),
            accept_language: "de-DE,de;q=0.9,en-US;q=0.8,en;q=0.7".to_string(),
            request_timeout_secs: 20,
            pacing_ms: 1000,
            pacing_jitter_ms: 0,
            max_attempts: 4,
            base_delay_ms: 500,
            max_delay_ms: 8000,
        }
    }
}

impl HttpConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            base_delay: Duration::from_millis(self.base_delay_ms),
            max_delay: Duration::from_millis(self.max_delay_ms),
        }
    }

    pub fn pacing_policy(&self) -> PacingPolicy {
        PacingPolicy {
            min_interval: Duration::from_millis(self.pacing_ms),
            jitter: Duration::from_millis(self.pacing_jitter_ms),
        }
    }
}

/// Daemon schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Local trigger time, `HH:MM`
    pub at: String,
    /// Run once immediately when the daemon starts
    pub run_on_start: bool,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self { at: "08:00".to_string(), run_on_start: true }
    }
}

impl ScheduleConfig {
    pub fn trigger_time(&self) -> FinderResult<NaiveTime> {
        NaiveTime::parse_from_str(self.at.trim(), "%H:%M").map_err(|_| invalid("schedule.at", &self.at))
    }
}

impl FinderConfig {
    /// Load from a JSON file; missing keys fall back to defaults
    pub fn from_file(path: &Path) -> FinderResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| FinderError::config(format!("cannot read {}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn ledger_path(&self) -> PathBuf {
        self.data_dir.join(LEDGER_FILE_NAME)
    }

    /// Reject values the pipeline cannot work with
    pub fn validate(&self) -> FinderResult<()> {
        self.site.base()?;
        parse_url("site.search_url", &self.site.search_url)?;
        self.schedule.trigger_time()?;

        if self.http.max_attempts == 0 {
            return Err(invalid("http.max_attempts", "0"));
        }
        if self.max_pages_per_query == 0 {
            return Err(invalid("max_pages_per_query", "0"));
        }
        if self.site.keyword_param.trim().is_empty() {
            return Err(invalid("site.keyword_param", ""));
        }
        if self.site.labels.is_empty() {
            return Err(invalid("site.labels", "{}"));
        }

        let selectors = &self.site.selectors;
        for (field, value) in [
            ("selectors.listing_link", &selectors.listing_link),
            ("selectors.contact_block", &selectors.contact_block),
            ("selectors.name", &selectors.name),
        ] {
            if value.trim().is_empty() {
                return Err(invalid(field, value));
            }
        }
        if self.keywords.iter().any(|k| k.trim().is_empty()) {
            return Err(invalid("keywords", "<blank keyword>"));
        }
        Ok(())
    }
}

fn invalid(field: &str, value: &str) -> FinderError {
    SharedError::InvalidConfig { field: field.to_string(), value: value.to_string() }.into()
}

fn parse_url(field: &str, value: &str) -> FinderResult<Url> {
    Url::parse(value).map_err(|_| invalid(field, value))
}
