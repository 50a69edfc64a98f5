//! In-memory dedup ledger
//!
//! Exact set of accepted firm ids. Persistence is the file system service's
//! job; this type only decides membership and produces the entries to write.

use chrono::NaiveDate;
use std::collections::BTreeMap;

use shared::{FirmId, LedgerEntry};

#[derive(Debug, Clone, Default)]
pub struct Ledger {
    entries: BTreeMap<FirmId, Option<NaiveDate>>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from persisted entries. Later duplicates keep the earliest date.
    pub fn from_entries(entries: impl IntoIterator<Item = LedgerEntry>) -> Self {
        let mut ledger = Self::new();
        for entry in entries {
            ledger
                .entries
                .entry(entry.id)
                .and_modify(|existing| {
                    if let Some(new) = entry.contacted_date {
                        if existing.map_or(true, |old| new < old) {
                            *existing = Some(new);
                        }
                    }
                })
                .or_insert(entry.contacted_date);
        }
        ledger
    }

    pub fn contains(&self, id: &FirmId) -> bool {
        self.entries.contains_key(id)
    }

    /// Add an accepted id. Returns false if it was already present.
    pub fn record(&mut self, id: FirmId, contacted_date: NaiveDate) -> bool {
        if self.entries.contains_key(&id) {
            return false;
        }
        self.entries.insert(id, Some(contacted_date));
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted by id, ready to persist
    pub fn entries(&self) -> Vec<LedgerEntry> {
        self.entries
            .iter()
            .map(|(id, date)| LedgerEntry { id: id.clone(), contacted_date: *date })
            .collect()
    }
}
