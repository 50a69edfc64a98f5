//! Tests for RealFileSystem
//!
//! Ledger loading across the accepted on-disk formats, atomic persistence and
//! the dated result files. Every test works in its own temp directory.

use chrono::NaiveDate;
use tempfile::TempDir;
use tokio::fs;

use shared::{FirmId, LedgerEntry};

use super::common::{test_date, test_record};
use crate::error::FinderError;
use crate::services::file_system::RealFileSystem;
use crate::traits::FileSystem;

fn setup_file_system() -> (TempDir, RealFileSystem) {
    let dir = TempDir::new().unwrap();
    let file_system = RealFileSystem::with_base_dir(dir.path().to_path_buf());
    (dir, file_system)
}

fn id(raw: &str) -> FirmId {
    FirmId::new(raw).unwrap()
}

#[tokio::test]
async fn test_missing_ledger_is_empty() {
    let (_dir, file_system) = setup_file_system();
    assert!(file_system.load_ledger().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_ledger_persist_then_load() {
    let (dir, file_system) = setup_file_system();
    let entries = vec![LedgerEntry::new(id("A1"), test_date()), LedgerEntry::legacy(id("B2"))];

    file_system.persist_ledger(&entries).await.unwrap();

    assert_eq!(file_system.load_ledger().await.unwrap(), entries);
    let raw = fs::read_to_string(dir.path().join("contacted.json")).await.unwrap();
    assert!(raw.contains(r#""contacted_date": "2024-03-01""#));
    assert!(!dir.path().join("contacted.json.tmp").exists(), "temp file must be renamed away");
}

#[tokio::test]
async fn test_loads_bare_id_array() {
    let (dir, file_system) = setup_file_system();
    fs::write(dir.path().join("contacted.json"), r#"["A1", "B2"]"#).await.unwrap();

    let entries = file_system.load_ledger().await.unwrap();
    assert_eq!(entries, vec![LedgerEntry::legacy(id("A1")), LedgerEntry::legacy(id("B2"))]);
}

#[tokio::test]
async fn test_loads_legacy_object_format() {
    let (dir, file_system) = setup_file_system();
    fs::write(dir.path().join("contacted.json"), r#"{"contacted_ids": ["Xy9"]}"#)
        .await
        .unwrap();

    let entries = file_system.load_ledger().await.unwrap();
    assert_eq!(entries, vec![LedgerEntry::legacy(id("Xy9"))]);
}

#[tokio::test]
async fn test_malformed_ledger_is_fatal() {
    let (dir, file_system) = setup_file_system();
    fs::write(dir.path().join("contacted.json"), "{not json").await.unwrap();

    let result = file_system.load_ledger().await;
    assert!(matches!(result, Err(FinderError::LedgerIo { .. })));
    assert!(result.unwrap_err().is_fatal());
}

#[tokio::test]
async fn test_ledger_with_invalid_id_is_fatal() {
    let (dir, file_system) = setup_file_system();
    fs::write(dir.path().join("contacted.json"), r#"["A1", "not/an id"]"#).await.unwrap();

    assert!(matches!(file_system.load_ledger().await, Err(FinderError::LedgerIo { .. })));
}

#[tokio::test]
async fn test_persist_creates_data_dir() {
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("nested").join("data");
    let file_system = RealFileSystem::with_base_dir(nested.clone());

    file_system.persist_ledger(&[LedgerEntry::new(id("A1"), test_date())]).await.unwrap();

    assert!(nested.join("contacted.json").exists());
}

#[tokio::test]
async fn test_result_file_write_and_reload() {
    let (dir, file_system) = setup_file_system();
    let records = vec![test_record("C2"), test_record("C3")];

    let path = file_system.write_run_result(test_date(), &records).await.unwrap();

    assert_eq!(path, dir.path().join("2024-03-01_firms.json"));
    assert_eq!(file_system.load_run_result(test_date()).await.unwrap(), records);

    let other_day = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();
    assert!(file_system.load_run_result(other_day).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_result_file_format() {
    let (dir, file_system) = setup_file_system();
    file_system.write_run_result(test_date(), &[test_record("C2")]).await.unwrap();

    let raw = fs::read_to_string(dir.path().join("2024-03-01_firms.json")).await.unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let record = &value[0];

    assert_eq!(record["id"], "C2");
    assert_eq!(record["found_date"], "2024-03-01");
    assert_eq!(record["email"], serde_json::Value::Null);
    assert_eq!(record.as_object().unwrap().len(), 9);
}

#[tokio::test]
async fn test_rewrite_replaces_result_file() {
    let (_dir, file_system) = setup_file_system();
    file_system.write_run_result(test_date(), &[test_record("C2")]).await.unwrap();
    file_system
        .write_run_result(test_date(), &[test_record("C2"), test_record("C3")])
        .await
        .unwrap();

    assert_eq!(file_system.load_run_result(test_date()).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_unwritable_data_dir_is_ledger_error() {
    let dir = TempDir::new().unwrap();
    // A regular file where the data directory should be
    let blocker = dir.path().join("data");
    fs::write(&blocker, "x").await.unwrap();
    let file_system = RealFileSystem::with_base_dir(blocker);

    let result = file_system.persist_ledger(&[LedgerEntry::new(id("A1"), test_date())]).await;
    assert!(matches!(result, Err(FinderError::LedgerIo { .. })));
}
