//! Single-slot cache for the default feed
//!
//! Exactly one record lives in storage, under a fixed key. Saving overwrites
//! it; nothing ever deletes it.

use serde::{Deserialize, Serialize};
use std::io;
use std::sync::Arc;
use tracing::{debug, warn};

use super::storage::Storage;
use crate::data::FeedEntry;

/// Storage key of the cached default feed
pub const CACHE_KEY: &str = "apod_cache";

/// Persisted wrapper around a feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheRecord {
    /// Creation time in milliseconds since the Unix epoch
    pub timestamp: i64,
    /// Entries in the order the API returned them
    #[serde(rename = "data")]
    pub payload: Vec<FeedEntry>,
}

/// Reads and writes the cached default feed
#[derive(Clone)]
pub struct CacheStore {
    storage: Arc<dyn Storage>,
}

impl std::fmt::Debug for CacheStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheStore").field("key", &CACHE_KEY).finish()
    }
}

impl CacheStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Loads the stored record
    ///
    /// Missing, unreadable and corrupt records all come back as `None`.
    pub fn load(&self) -> Option<CacheRecord> {
        let raw = match self.storage.get(CACHE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("no cached feed");
                return None;
            }
            Err(e) => {
                warn!(error = %e, "failed to read cached feed");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(error = %e, "cached feed is corrupt, ignoring it");
                None
            }
        }
    }

    /// Overwrites the stored record
    pub fn save(&self, record: &CacheRecord) -> io::Result<()> {
        let json = serde_json::to_string(record)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        self.storage.set(CACHE_KEY, &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::storage::{FileStorage, MemoryStorage};
    use crate::data::{sample_entry, MediaType};
    use tempfile::TempDir;

    fn sample_record() -> CacheRecord {
        CacheRecord {
            timestamp: 1_754_006_400_000,
            payload: vec![
                sample_entry("2025-08-01", "Andromeda Galaxy", MediaType::Image),
                sample_entry("2025-08-03", "Orion Nebula", MediaType::Image),
            ],
        }
    }

    #[test]
    fn test_load_empty_storage_is_none() {
        let store = CacheStore::new(Arc::new(MemoryStorage::new()));
        assert!(store.load().is_none());
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let store = CacheStore::new(Arc::new(MemoryStorage::new()));
        let record = sample_record();

        store.save(&record).unwrap();

        assert_eq!(store.load(), Some(record));
    }

    #[test]
    fn test_save_then_load_roundtrip_on_disk() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = CacheStore::new(Arc::new(FileStorage::with_dir(temp_dir.path().to_path_buf())));
        let record = sample_record();

        store.save(&record).unwrap();

        assert!(temp_dir.path().join("apod_cache.json").exists());
        assert_eq!(store.load(), Some(record));
    }

    #[test]
    fn test_record_json_shape() {
        let storage = Arc::new(MemoryStorage::new());
        let store = CacheStore::new(storage.clone());

        store.save(&sample_record()).unwrap();

        let raw = storage.get(CACHE_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["timestamp"], 1_754_006_400_000i64);
        assert_eq!(value["data"][0]["title"], "Andromeda Galaxy");
        assert_eq!(value["data"][0]["media_type"], "image");
        assert_eq!(value["data"][0]["date"], "2025-08-01");
    }

    #[test]
    fn test_corrupt_record_is_treated_as_absent() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(CACHE_KEY, "{not json").unwrap();
        let store = CacheStore::new(storage);

        assert!(store.load().is_none());
    }

    #[test]
    fn test_wrong_shape_is_treated_as_absent() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(CACHE_KEY, r#"{"timestamp": "yesterday", "data": []}"#).unwrap();
        let store = CacheStore::new(storage);

        assert!(store.load().is_none());
    }

    #[test]
    fn test_save_overwrites_previous_record() {
        let store = CacheStore::new(Arc::new(MemoryStorage::new()));
        store.save(&sample_record()).unwrap();

        let newer = CacheRecord {
            timestamp: 1_754_200_000_000,
            payload: vec![sample_entry("2025-08-05", "Comet", MediaType::Image)],
        };
        store.save(&newer).unwrap();

        assert_eq!(store.load(), Some(newer));
    }
}
