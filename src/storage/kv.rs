//! Persisted string key-value stores

use crate::{Error, Result};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

/// Minimal persisted key-value surface
pub trait KeyValueStore: Send + Sync {
    /// Read a value
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a value (missing keys are not an error)
    fn remove(&self, key: &str) -> Result<()>;

    /// Write several values as one update
    ///
    /// Stores that persist should either write all entries or none.
    fn set_many(&self, entries: &[(&str, &str)]) -> Result<()> {
        for (key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }
}

fn poisoned<T>(_: T) -> Error {
    Error::Storage("Key-value store lock poisoned".to_string())
}

/// In-memory store, lost on exit
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().map_err(poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().map_err(poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.lock().map_err(poisoned)?;
        entries.remove(key);
        Ok(())
    }

    fn set_many(&self, pairs: &[(&str, &str)]) -> Result<()> {
        let mut entries = self.entries.lock().map_err(poisoned)?;
        for (key, value) in pairs {
            entries.insert(key.to_string(), value.to_string());
        }
        Ok(())
    }
}

/// Store backed by a pretty-printed JSON object on disk
///
/// The whole file is rewritten on every mutation. Memory only changes once
/// the write succeeded, so a failed write can be retried.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl JsonFileStore {
    /// Open (or lazily create) a store at `path`
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let entries = if path.exists() {
            let data = std::fs::read_to_string(&path)
                .map_err(|e| Error::Storage(format!("Failed to read {}: {}", path.display(), e)))?;
            if data.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&data)
                    .map_err(|e| Error::Storage(format!("Failed to parse {}: {}", path.display(), e)))?
            }
        } else {
            BTreeMap::new()
        };

        debug!("Opened key-value store {} ({} keys)", path.display(), entries.len());

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Location of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Storage(format!("Failed to create store directory: {}", e)))?;
        }

        let json = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, json)
            .map_err(|e| Error::Storage(format!("Failed to write {}: {}", self.path.display(), e)))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().map_err(poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.set_many(&[(key, value)])
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.lock().map_err(poisoned)?;
        if !entries.contains_key(key) {
            return Ok(());
        }

        let mut updated = entries.clone();
        updated.remove(key);
        self.persist(&updated)?;
        *entries = updated;
        Ok(())
    }

    fn set_many(&self, pairs: &[(&str, &str)]) -> Result<()> {
        let mut entries = self.entries.lock().map_err(poisoned)?;
        if pairs
            .iter()
            .all(|(key, value)| entries.get(*key).map(String::as_str) == Some(*value))
        {
            return Ok(());
        }

        let mut updated = entries.clone();
        for (key, value) in pairs {
            updated.insert(key.to_string(), value.to_string());
        }
        self.persist(&updated)?;
        *entries = updated;
        Ok(())
    }
}
