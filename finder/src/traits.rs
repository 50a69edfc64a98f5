//! Trait definitions with mockall annotations for testing
//!
//! The orchestrator depends only on these seams: a raw page fetch, HTML
//! parsing of listing/detail pages, persistence of the ledger and result
//! files, and a clock. Real implementations live in `services`.

use async_trait::async_trait;
use chrono::{DateTime, Local, NaiveDate};
use std::path::PathBuf;
use std::time::Duration;

use shared::{Candidate, FirmRecord, LedgerEntry};

use crate::core::FieldSet;
use crate::error::FinderResult;

/// One parsed listing page
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListingPage {
    pub candidates: Vec<Candidate>,
    /// False when the page marks the end of the results
    pub has_more: bool,
}

/// Raw HTTP fetch capability
///
/// Implementations map failures onto `FinderError::TransientNetwork` (worth
/// retrying) or `FinderError::HttpStatus` (permanent).
#[mockall::automock]
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch `url` and return the response body
    async fn fetch(&self, url: &str, timeout: Duration) -> FinderResult<String>;
}

/// HTML query capability for the directory's page layouts
#[mockall::automock]
pub trait PageParser: Send + Sync {
    /// Parse a search result page into candidates and a continuation flag
    fn parse_listing(&self, body: &str, page_url: &str) -> FinderResult<ListingPage>;

    /// Parse a detail page's labeled fields
    ///
    /// Returns `FinderError::ParseStructure` when the contact block is missing.
    fn parse_detail(&self, body: &str, page_url: &str) -> FinderResult<FieldSet>;
}

/// File system abstraction for dependency injection
///
/// Manages the dedup ledger and the dated result files in the data directory.
#[mockall::automock]
#[async_trait]
pub trait FileSystem: Send + Sync {
    /// Load all ledger entries; a missing ledger is empty
    async fn load_ledger(&self) -> FinderResult<Vec<LedgerEntry>>;

    /// Durably replace the ledger with `entries`
    async fn persist_ledger(&self, entries: &[LedgerEntry]) -> FinderResult<()>;

    /// Records already written for `date`, if any
    async fn load_run_result(&self, date: NaiveDate) -> FinderResult<Vec<FirmRecord>>;

    /// Durably replace the result file for `date`, returning its path
    async fn write_run_result(&self, date: NaiveDate, records: &[FirmRecord]) -> FinderResult<PathBuf>;
}

/// Injectable clock so pacing, backoff and scheduling can be tested without waiting
#[mockall::automock]
#[async_trait]
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;

    async fn sleep(&self, duration: Duration);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_trait_instantiation() {
        let mut fetcher = MockPageFetcher::new();
        fetcher
            .expect_fetch()
            .returning(|url, _| Ok(format!("<html>{url}</html>")));
        let _parser = MockPageParser::new();
        let _file_system = MockFileSystem::new();
        let _clock = MockClock::new();

        let body = fetcher.fetch("https://example.test", Duration::from_secs(1)).await.unwrap();
        assert_eq!(body, "<html>https://example.test</html>");
    }
}
