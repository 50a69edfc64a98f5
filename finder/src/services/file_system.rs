//! Real file system service implementation
//!
//! Keeps the dedup ledger (`contacted.json`) and the dated result files
//! (`<date>_firms.json`) in the data directory. Every write goes to a sibling
//! temp file first and is renamed into place, so a crash never leaves a
//! half-written ledger behind.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use shared::{result_file_name, FirmId, FirmRecord, LedgerEntry};

use crate::config::LEDGER_FILE_NAME;
use crate::error::{FinderError, FinderResult};
use crate::traits::FileSystem;

/// On-disk ledger shapes accepted when loading
#[derive(Deserialize)]
#[serde(untagged)]
enum LedgerFile {
    Entries(Vec<LedgerEntry>),
    Ids(Vec<String>),
    Legacy { contacted_ids: Vec<String> },
}

/// Real file system implementation
pub struct RealFileSystem {
    /// Base directory for all data
    base_dir: PathBuf,
}

impl RealFileSystem {
    /// Create new file system service (uses ./data)
    pub fn new() -> Self {
        Self { base_dir: PathBuf::from("data") }
    }

    /// Create with custom base directory
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn ledger_path(&self) -> PathBuf {
        self.base_dir.join(LEDGER_FILE_NAME)
    }

    pub fn result_path(&self, date: NaiveDate) -> PathBuf {
        self.base_dir.join(result_file_name(date))
    }
}

impl Default for RealFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FileSystem for RealFileSystem {
    async fn load_ledger(&self) -> FinderResult<Vec<LedgerEntry>> {
        let path = self.ledger_path();
        let ledger_err = |message: String| FinderError::LedgerIo { path: path.display().to_string(), message };

        let Some(content) = read_if_exists(&path).await.map_err(|e| ledger_err(e.to_string()))? else {
            return Ok(Vec::new());
        };
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let parsed: LedgerFile =
            serde_json::from_str(&content).map_err(|e| ledger_err(format!("malformed ledger: {e}")))?;

        let entries = match parsed {
            LedgerFile::Entries(entries) => entries,
            LedgerFile::Ids(ids) | LedgerFile::Legacy { contacted_ids: ids } => ids
                .iter()
                .map(|raw| FirmId::new(raw).map(LedgerEntry::legacy))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| ledger_err(e.to_string()))?,
        };

        tracing::debug!("📒 Loaded {} ledger entries from {}", entries.len(), path.display());
        Ok(entries)
    }

    async fn persist_ledger(&self, entries: &[LedgerEntry]) -> FinderResult<()> {
        let path = self.ledger_path();
        let content = serde_json::to_vec_pretty(entries)?;

        write_atomic(&path, &content).await.map_err(|e| FinderError::LedgerIo {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        tracing::debug!("💾 Persisted {} ledger entries to {}", entries.len(), path.display());
        Ok(())
    }

    async fn load_run_result(&self, date: NaiveDate) -> FinderResult<Vec<FirmRecord>> {
        let path = self.result_path(date);
        let result_err = |message: String| FinderError::ResultIo { path: path.display().to_string(), message };

        let Some(content) = read_if_exists(&path).await.map_err(|e| result_err(e.to_string()))? else {
            return Ok(Vec::new());
        };
        serde_json::from_str(&content).map_err(|e| result_err(format!("malformed result file: {e}")))
    }

    async fn write_run_result(&self, date: NaiveDate, records: &[FirmRecord]) -> FinderResult<PathBuf> {
        let path = self.result_path(date);
        let content = serde_json::to_vec_pretty(records)?;

        write_atomic(&path, &content).await.map_err(|e| FinderError::ResultIo {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        tracing::debug!("📝 Wrote {} records to {}", records.len(), path.display());
        Ok(path)
    }
}

async fn read_if_exists(path: &Path) -> std::io::Result<Option<String>> {
    match fs::read_to_string(path).await {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

/// Write to `<path>.tmp`, fsync, then rename over `path`
async fn write_atomic(path: &Path, content: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    let mut file = fs::File::create(&tmp_path).await?;
    file.write_all(content).await?;
    file.sync_all().await?;
    drop(file);

    fs::rename(&tmp_path, path).await
}
