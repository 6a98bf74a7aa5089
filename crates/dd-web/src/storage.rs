//! Storage API
//!
//! localStorage: an ordered string key/value store with optional
//! persistence to a JSON file. Keys keep their insertion order, so
//! `key(i)` is stable across reloads.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Storage error
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// On-disk form of one item
#[derive(Debug, Serialize, Deserialize)]
struct Entry {
    key: String,
    value: String,
}

/// Storage backend
#[derive(Debug, Default)]
pub struct Storage {
    entries: Vec<(String, String)>,
    path: Option<PathBuf>,
}

impl Storage {
    /// In-memory storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage persisted at `path`, loading what is already there
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        let mut storage = Self {
            entries: Vec::new(),
            path: Some(path.clone()),
        };

        if path.exists() {
            let contents = fs::read_to_string(&path)?;
            if !contents.trim().is_empty() {
                let entries: Vec<Entry> = serde_json::from_str(&contents)?;
                storage.entries = entries.into_iter().map(|e| (e.key, e.value)).collect();
            }
            tracing::debug!(path = %path.display(), items = storage.entries.len(), "loaded storage");
        }

        Ok(storage)
    }

    /// Get item
    pub fn get_item(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set item; an existing key keeps its position
    pub fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value.to_string(),
            None => self.entries.push((key.to_string(), value.to_string())),
        }
        self.persist()
    }

    /// Remove item
    pub fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        let before = self.entries.len();
        self.entries.retain(|(k, _)| k != key);
        if self.entries.len() == before {
            return Ok(());
        }
        self.persist()
    }

    /// Clear all items
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.entries.clear();
        self.persist()
    }

    /// Get key at index
    pub fn key(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|(k, _)| k.as_str())
    }

    /// Get number of items
    pub fn length(&self) -> usize {
        self.entries.len()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Write to disk if persistent
    fn persist(&self) -> Result<(), StorageError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let entries: Vec<Entry> = self
            .entries
            .iter()
            .map(|(k, v)| Entry {
                key: k.clone(),
                value: v.clone(),
            })
            .collect();
        fs::write(path, serde_json::to_string_pretty(&entries)?)?;
        Ok(())
    }
}
