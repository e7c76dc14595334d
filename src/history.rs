//! Bounded comparison history.
//!
//! Keeps the last [`MAX_HISTORY_ENTRIES`] comparisons, newest first. When
//! opened with a path the store is mirrored to a JSON file after every
//! change (default: `~/.config/dvr-clock-check/history.json`, macOS:
//! `~/Library/Application Support/dvr-clock-check/history.json`).

use crate::difference::DifferenceResult;
use crate::reference::ReferenceTime;
use crate::timestamp::TimestampRecord;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

pub const MAX_HISTORY_ENTRIES: usize = 10;

const HISTORY_FILE: &str = "history.json";

/// One completed comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Capture time of the image the comparison was made from.
    pub timestamp: DateTime<Local>,
    pub record: TimestampRecord,
    pub reference: ReferenceTime,
    pub difference: DifferenceResult,
    pub ocr_text: String,
}

#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to serialize history: {0}")]
    Json(#[from] serde_json::Error),
}

/// Head-insert, tail-evict log of comparisons.
#[derive(Debug, Default)]
pub struct HistoryStore {
    entries: VecDeque<HistoryEntry>,
    path: Option<PathBuf>,
}

impl HistoryStore {
    /// A store that is never written to disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Open a file-backed store. A missing or unreadable file yields an
    /// empty store.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut entries: VecDeque<HistoryEntry> = match std::fs::read_to_string(&path) {
            Ok(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
                log::warn!("[HISTORY] Ignoring unreadable {}: {}", path.display(), e);
                VecDeque::new()
            }),
            Err(_) => VecDeque::new(),
        };
        entries.truncate(MAX_HISTORY_ENTRIES);
        log::info!("[HISTORY] Loaded {} entries from {}", entries.len(), path.display());
        Self {
            entries,
            path: Some(path),
        }
    }

    /// Platform config location for the history file.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|c| c.join("dvr-clock-check").join(HISTORY_FILE))
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Insert at the head, evicting the oldest entry beyond the bound.
    ///
    /// The entry is kept in memory even if persisting fails.
    pub fn append(&mut self, entry: HistoryEntry) -> Result<(), HistoryError> {
        self.entries.push_front(entry);
        self.entries.truncate(MAX_HISTORY_ENTRIES);
        self.save()
    }

    pub fn clear(&mut self) -> Result<(), HistoryError> {
        self.entries.clear();
        log::info!("[HISTORY] Cleared");
        self.save()
    }

    /// All entries, newest first.
    pub fn list(&self) -> Vec<HistoryEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.front()
    }

    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn save(&self) -> Result<(), HistoryError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let io_err = |source| HistoryError::Io {
            path: path.clone(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(path, json).map_err(io_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::difference::difference;

    fn entry(second: u32) -> HistoryEntry {
        let record = TimestampRecord::time(10, 0, second);
        let reference = ReferenceTime {
            hour: 10,
            minute: 0,
            second: 0,
            date: None,
            source: "test".to_string(),
        };
        HistoryEntry {
            timestamp: Local::now(),
            difference: difference(&record, &reference),
            record,
            reference,
            ocr_text: format!("10:00:{:02}", second),
        }
    }

    #[test]
    fn keeps_ten_newest_first() {
        let mut store = HistoryStore::in_memory();
        for s in 0..13 {
            store.append(entry(s)).unwrap();
        }
        assert_eq!(store.len(), MAX_HISTORY_ENTRIES);
        let seconds: Vec<u32> = store.list().iter().map(|e| e.record.second).collect();
        assert_eq!(seconds, vec![12, 11, 10, 9, 8, 7, 6, 5, 4, 3]);
        assert_eq!(store.latest().unwrap().record.second, 12);
    }

    #[test]
    fn clear_empties_store() {
        let mut store = HistoryStore::in_memory();
        store.append(entry(1)).unwrap();
        store.clear().unwrap();
        assert!(store.is_empty());
        assert!(store.list().is_empty());
    }

    #[test]
    fn file_backed_store_survives_reopen() {
        let path = std::env::temp_dir()
            .join("dvr-clock-check-test-reopen")
            .join(HISTORY_FILE);
        let _ = std::fs::remove_file(&path);

        let mut store = HistoryStore::open(&path);
        assert!(store.is_empty());
        store.append(entry(5)).unwrap();
        store.append(entry(6)).unwrap();

        let reopened = HistoryStore::open(&path);
        assert_eq!(reopened.len(), 2);
        assert_eq!(reopened.get(0).unwrap().record.second, 6);
        assert_eq!(reopened.get(1).unwrap().ocr_text, "10:00:05");

        // Cleanup
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn corrupt_file_opens_empty() {
        let dir = std::env::temp_dir().join("dvr-clock-check-test-corrupt");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(HISTORY_FILE);
        std::fs::write(&path, "{not json").unwrap();

        let store = HistoryStore::open(&path);
        assert!(store.is_empty());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
