//! Persisted key-value state.
//!
//! Holds a single record today: the last successfully loaded location.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use northwind_core::StorageError;
use parking_lot::Mutex;

use crate::types::PersistedLocation;

/// Key of the last-location record
pub const LAST_LOCATION_KEY: &str = "northwind:last-location";

/// Synchronous string key-value storage. Writes are last-write-wins.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn put(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Keys stored together in one JSON object on disk.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StorageError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = std::fs::read_to_string(&self.path).map_err(|e| StorageError::Read {
            path: self.path.display().to_string(),
            message: e.to_string(),
        })?;
        serde_json::from_str(&contents).map_err(|e| StorageError::Corruption(e.to_string()))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock();
        Ok(self.read_all()?.remove(key))
    }

    fn put(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock();
        let write_err = |message: String| StorageError::Write {
            path: self.path.display().to_string(),
            message,
        };

        // A corrupted file is replaced rather than blocking every save
        let mut entries = match self.read_all() {
            Ok(entries) => entries,
            Err(StorageError::Corruption(e)) => {
                tracing::warn!("Replacing corrupted state file {}: {}", self.path.display(), e);
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };
        entries.insert(key.to_string(), value.to_string());

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| write_err(e.to_string()))?;
        }
        let json = serde_json::to_string_pretty(&entries).map_err(|e| write_err(e.to_string()))?;
        std::fs::write(&self.path, json).map_err(|e| write_err(e.to_string()))
    }
}

/// In-process store, for tests and ephemeral runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::default();
        store.entries.lock().insert(key.to_string(), value.to_string());
        store
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Overwrite the last-location record.
pub fn save_location(
    store: &dyn KeyValueStore,
    location: &PersistedLocation,
) -> Result<(), StorageError> {
    let json =
        serde_json::to_string(location).map_err(|e| StorageError::Corruption(e.to_string()))?;
    store.put(LAST_LOCATION_KEY, &json)
}

/// Read the last-location record.
///
/// Absent, unreadable, malformed or out-of-range records all yield `None`.
pub fn load_location(store: &dyn KeyValueStore) -> Option<PersistedLocation> {
    let raw = match store.get(LAST_LOCATION_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::warn!("Failed to read saved location: {}", e);
            return None;
        }
    };

    match serde_json::from_str::<PersistedLocation>(&raw) {
        Ok(location) if location.coordinate().is_valid() => Some(location),
        Ok(location) => {
            tracing::warn!(
                "Ignoring saved location with invalid coordinate {}",
                location.coordinate()
            );
            None
        }
        Err(e) => {
            tracing::warn!("Ignoring malformed saved location: {}", e);
            None
        }
    }
}
