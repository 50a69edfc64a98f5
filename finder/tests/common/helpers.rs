//! Test helpers and builder patterns for orchestrator tests
//!
//! `FakeSite` serves canned pages and records every fetched url,
//! `InMemoryFileSystem` keeps the ledger and result files in memory, and
//! `OrchestratorBuilder` wires them with a manual clock.

use async_trait::async_trait;
use chrono::{DateTime, Local, NaiveDate};
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use finder::services::{HtmlPageParser, ManualClock};
use finder::traits::{FileSystem, PageFetcher};
use finder::{FinderConfig, FinderError, FinderResult, Orchestrator};
use shared::{FirmId, FirmRecord, LedgerEntry};

use super::fixtures::TestFixtures;

#[derive(Default)]
struct SiteState {
    pages: HashMap<String, String>,
    /// Remaining transient failures per url
    flaky: HashMap<String, u32>,
    fetched: Vec<String>,
}

/// Canned directory site; unknown urls answer 404
#[derive(Clone, Default)]
pub struct FakeSite {
    state: Arc<Mutex<SiteState>>,
}

impl FakeSite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.state.lock().unwrap().pages.insert(url.into(), body.into());
        self
    }

    pub fn listing(self, keyword: &str, page: u32, ids: &[&str]) -> Self {
        let body = if ids.is_empty() {
            TestFixtures::empty_listing()
        } else {
            TestFixtures::listing_page(ids)
        };
        self.page(TestFixtures::listing_url(keyword, page), body)
    }

    pub fn firm(self, id: &str) -> Self {
        self.page(TestFixtures::firm_url(id), TestFixtures::detail_without_website(id))
    }

    pub fn firm_with_website(self, id: &str) -> Self {
        self.page(TestFixtures::firm_url(id), TestFixtures::detail_with_website(id))
    }

    /// Fail the next `times` requests for `url` with a transient error
    pub fn flaky(self, url: impl Into<String>, times: u32) -> Self {
        self.state.lock().unwrap().flaky.insert(url.into(), times);
        self
    }

    pub fn fetched(&self) -> Vec<String> {
        self.state.lock().unwrap().fetched.clone()
    }

    pub fn fetch_count(&self, url: &str) -> usize {
        self.fetched().iter().filter(|u| *u == url).count()
    }
}

#[async_trait]
impl PageFetcher for FakeSite {
    async fn fetch(&self, url: &str, _timeout: Duration) -> FinderResult<String> {
        let mut state = self.state.lock().unwrap();
        state.fetched.push(url.to_string());

        if let Some(remaining) = state.flaky.get_mut(url) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(FinderError::TransientNetwork { url: url.to_string(), message: "HTTP 503".into() });
            }
        }

        state
            .pages
            .get(url)
            .cloned()
            .ok_or_else(|| FinderError::HttpStatus { url: url.to_string(), status: 404 })
    }
}

#[derive(Default)]
struct StoredFiles {
    ledger: Vec<LedgerEntry>,
    results: BTreeMap<NaiveDate, Vec<FirmRecord>>,
    ledger_writes: usize,
}

/// File system kept in memory; clones share the same files
#[derive(Clone, Default)]
pub struct InMemoryFileSystem {
    files: Arc<Mutex<StoredFiles>>,
}

impl InMemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ledger(self, entries: Vec<LedgerEntry>) -> Self {
        self.files.lock().unwrap().ledger = entries;
        self
    }

    pub fn with_result(self, date: NaiveDate, records: Vec<FirmRecord>) -> Self {
        self.files.lock().unwrap().results.insert(date, records);
        self
    }

    pub fn ledger_ids(&self) -> Vec<String> {
        self.files.lock().unwrap().ledger.iter().map(|e| e.id.to_string()).collect()
    }

    pub fn ledger(&self) -> Vec<LedgerEntry> {
        self.files.lock().unwrap().ledger.clone()
    }

    pub fn result_ids(&self, date: NaiveDate) -> Option<Vec<String>> {
        self.files
            .lock()
            .unwrap()
            .results
            .get(&date)
            .map(|records| records.iter().map(|r| r.id.to_string()).collect())
    }

    pub fn ledger_writes(&self) -> usize {
        self.files.lock().unwrap().ledger_writes
    }
}

#[async_trait]
impl FileSystem for InMemoryFileSystem {
    async fn load_ledger(&self) -> FinderResult<Vec<LedgerEntry>> {
        Ok(self.ledger())
    }

    async fn persist_ledger(&self, entries: &[LedgerEntry]) -> FinderResult<()> {
        let mut files = self.files.lock().unwrap();
        files.ledger = entries.to_vec();
        files.ledger_writes += 1;
        Ok(())
    }

    async fn load_run_result(&self, date: NaiveDate) -> FinderResult<Vec<FirmRecord>> {
        Ok(self.files.lock().unwrap().results.get(&date).cloned().unwrap_or_default())
    }

    async fn write_run_result(&self, date: NaiveDate, records: &[FirmRecord]) -> FinderResult<PathBuf> {
        self.files.lock().unwrap().results.insert(date, records.to_vec());
        Ok(PathBuf::from(shared::result_file_name(date)))
    }
}

/// Builder for orchestrators running against a fake site
pub struct OrchestratorBuilder {
    config: FinderConfig,
    site: FakeSite,
    clock: ManualClock,
}

impl OrchestratorBuilder {
    /// Single keyword, fast retries and no pacing
    pub fn new() -> Self {
        let mut config = FinderConfig::default();
        config.keywords = vec!["Coach".to_string()];
        config.http.pacing_ms = 0;
        config.http.max_attempts = 3;
        config.http.base_delay_ms = 100;
        config.http.max_delay_ms = 1000;

        Self { config, site: FakeSite::new(), clock: ManualClock::new(TestFixtures::start_time()) }
    }

    pub fn with_keywords(mut self, keywords: &[&str]) -> Self {
        self.config.keywords = keywords.iter().map(|k| k.to_string()).collect();
        self
    }

    pub fn with_target(mut self, target: usize) -> Self {
        self.config.target_count = target;
        self
    }

    pub fn with_config<F>(mut self, setup: F) -> Self
    where
        F: FnOnce(&mut FinderConfig),
    {
        setup(&mut self.config);
        self
    }

    pub fn with_site(mut self, site: FakeSite) -> Self {
        self.site = site;
        self
    }

    /// Restart the manual clock at `start`
    pub fn with_start_time(mut self, start: DateTime<Local>) -> Self {
        self.clock = ManualClock::new(start);
        self
    }

    pub fn clock(&self) -> ManualClock {
        self.clock.clone()
    }

    pub fn build(self) -> TestOrchestrator {
        self.build_with_file_system(InMemoryFileSystem::new())
    }

    pub fn build_with_file_system<S: FileSystem>(self, file_system: S) -> Orchestrator<FakeSite, HtmlPageParser, S, ManualClock> {
        let parser = HtmlPageParser::new(&self.config.site).unwrap();
        Orchestrator::new(self.config, self.site, parser, file_system, self.clock)
    }
}

impl Default for OrchestratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Orchestrator over the fake site and in-memory files
pub type TestOrchestrator = Orchestrator<FakeSite, HtmlPageParser, InMemoryFileSystem, ManualClock>;

/// Helper functions for common test operations
pub struct TestHelpers;

impl TestHelpers {
    /// The scenario site: C1 lists a website, C2 and C3 do not
    pub fn coach_site() -> FakeSite {
        FakeSite::new()
            .listing("Coach", 1, &["C1", "C2"])
            .listing("Coach", 2, &["C3"])
            .listing("Coach", 3, &[])
            .firm_with_website("C1")
            .firm("C2")
            .firm("C3")
    }

    pub fn ids(records: &[FirmRecord]) -> Vec<String> {
        records.iter().map(|r| r.id.to_string()).collect()
    }

    pub fn firm_id(raw: &str) -> FirmId {
        FirmId::new(raw).unwrap()
    }
}
