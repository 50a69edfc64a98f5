//! Finder-specific error types

use shared::SharedError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FinderError {
    #[error("Transient network failure for {url}: {message}")]
    TransientNetwork { url: String, message: String },

    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Page structure not recognized at {url}: {what}")]
    ParseStructure { url: String, what: String },

    #[error("Ledger persistence failed at {path}: {message}")]
    LedgerIo { path: String, message: String },

    #[error("Result file write failed at {path}: {message}")]
    ResultIo { path: String, message: String },

    #[error("Configuration error: {field}")]
    Configuration { field: String },

    #[error("Shared component error: {0}")]
    Shared(#[from] SharedError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FinderError {
    pub fn config(field: impl Into<String>) -> Self {
        Self::Configuration { field: field.into() }
    }

    pub fn parse_structure(url: impl Into<String>, what: impl Into<String>) -> Self {
        Self::ParseStructure { url: url.into(), what: what.into() }
    }

    /// Worth retrying at the fetch site
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::TransientNetwork { .. })
    }

    /// Aborts the run instead of skipping the current page or candidate
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::LedgerIo { .. } | Self::ResultIo { .. })
    }
}

pub type FinderResult<T> = Result<T, FinderError>;
