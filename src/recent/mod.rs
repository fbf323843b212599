use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

/// Fixed storage key shared by every page.
pub const RECENT_SEARCHES_KEY: &str = "raya_recent_searches";
/// History size on the home page.
pub const HOME_CAP: usize = 3;
/// History size on the property and agent search pages.
pub const SEARCH_PAGE_CAP: usize = 5;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to write storage file: {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode storage contents: {source}")]
    Encode {
        #[source]
        source: serde_json::Error,
    },
}

/// String key/value storage with browser local-storage semantics.
pub trait KeyValueStorage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// A JSON object on disk standing in for the browser's local storage.
/// Every call re-reads the file; there is no locking.
#[derive(Clone, Debug)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> BTreeMap<String, String> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                warn!(path = %self.path.display(), error = %e, "storage file is not a JSON object, ignoring");
                BTreeMap::new()
            }),
            Err(_) => BTreeMap::new(),
        }
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let contents = serde_json::to_string_pretty(entries)
            .map_err(|source| StorageError::Encode { source })?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| StorageError::Write {
                path: parent.display().to_string(),
                source,
            })?;
        }
        std::fs::write(&self.path, contents).map_err(|source| StorageError::Write {
            path: self.path.display().to_string(),
            source,
        })
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.read_all().remove(key)
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        let mut entries = self.read_all();
        entries.insert(key.to_string(), value);
        self.write_all(&entries)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.read_all();
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}

/// Bounded most-recent-first search history, deduplicated case-insensitively.
#[derive(Clone, Debug)]
pub struct RecentSearches<S: KeyValueStorage> {
    storage: S,
    cap: usize,
}

impl<S: KeyValueStorage> RecentSearches<S> {
    pub fn new(storage: S, cap: usize) -> Self {
        Self {
            storage,
            cap: cap.max(1),
        }
    }

    /// Stored terms, or nothing when the key is missing or not a JSON array.
    pub fn list(&self) -> Vec<String> {
        let Some(raw) = self.storage.get(RECENT_SEARCHES_KEY) else {
            return Vec::new();
        };
        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(list) => list,
            Err(e) => {
                debug!(error = %e, "recent searches unreadable, treating as empty");
                Vec::new()
            }
        }
    }

    /// Moves `term` to the front, dropping any case-insensitive duplicate and
    /// anything past the cap. Blank terms are ignored.
    pub fn record(&mut self, term: &str) -> Vec<String> {
        let term = term.trim();
        if term.is_empty() {
            return self.list();
        }
        let folded = term.to_lowercase();
        let mut searches: Vec<String> = self
            .list()
            .into_iter()
            .filter(|s| s.to_lowercase() != folded)
            .collect();
        searches.insert(0, term.to_string());
        searches.truncate(self.cap);
        self.persist(&searches);
        searches
    }

    pub fn clear(&mut self) {
        if let Err(e) = self.storage.remove(RECENT_SEARCHES_KEY) {
            warn!(error = %e, "failed to clear recent searches");
        }
    }

    fn persist(&mut self, searches: &[String]) {
        let encoded = match serde_json::to_string(searches) {
            Ok(encoded) => encoded,
            Err(e) => {
                warn!(error = %e, "failed to encode recent searches");
                return;
            }
        };
        if let Err(e) = self.storage.set(RECENT_SEARCHES_KEY, encoded) {
            warn!(error = %e, "failed to persist recent searches");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_insensitive_duplicates_move_to_front() {
        let mut recent = RecentSearches::new(MemoryStorage::new(), 5);
        recent.record("Miami");
        recent.record("miami");
        let list = recent.record("Austin");
        assert_eq!(list, vec!["Austin", "miami"]);
        assert_eq!(recent.list(), list);
    }

    #[test]
    fn cap_drops_oldest() {
        let mut recent = RecentSearches::new(MemoryStorage::new(), 5);
        for term in ["a", "b", "c", "d", "e", "f"] {
            recent.record(term);
        }
        assert_eq!(recent.list(), vec!["f", "e", "d", "c", "b"]);
    }

    #[test]
    fn blank_terms_are_ignored() {
        let mut recent = RecentSearches::new(MemoryStorage::new(), HOME_CAP);
        recent.record("  ");
        assert!(recent.list().is_empty());
        assert_eq!(recent.record("  Raleigh "), vec!["Raleigh"]);
    }

    #[test]
    fn invalid_json_reads_as_empty_history() {
        let mut storage = MemoryStorage::new();
        storage
            .set(RECENT_SEARCHES_KEY, "{not an array".to_string())
            .unwrap();
        let mut recent = RecentSearches::new(storage, HOME_CAP);
        assert!(recent.list().is_empty());
        assert_eq!(recent.record("Miami"), vec!["Miami"]);
    }

    #[test]
    fn file_storage_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");
        let mut recent = RecentSearches::new(FileStorage::new(&path), HOME_CAP);
        recent.record("Austin");
        recent.record("Denver");

        let reopened = RecentSearches::new(FileStorage::new(&path), HOME_CAP);
        assert_eq!(reopened.list(), vec!["Denver", "Austin"]);

        let mut reopened = reopened;
        reopened.clear();
        assert!(reopened.list().is_empty());
    }
}
