//! Key/value persistence capability.
//!
//! The host application provides a small persistent map with `get`/`set`
//! semantics and a default when a key is unset. [`KeyValueStore`] is that
//! seam; [`FileKeyValue`] backs it with a single JSON file for headless use
//! and [`MemoryKeyValue`] keeps everything in memory for tests and
//! embedding hosts.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use thiserror::Error;

/// Errors from the persistence capability.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error for {0}: {1}")]
    Io(PathBuf, #[source] io::Error),

    #[error("Malformed storage file {0}: {1}")]
    Malformed(PathBuf, String),
}

/// Host-provided persistent key/value map.
pub trait KeyValueStore: Send + Sync {
    /// Returns the stored value, or `None` when the key is unset.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores a value under the key, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes the key entirely.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// File-backed key/value store: one JSON object per file.
///
/// Clones share the same backing file. The parent directory is created on
/// first write.
#[derive(Debug, Clone)]
pub struct FileKeyValue {
    path: PathBuf,
}

impl FileKeyValue {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn load_map(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => serde_json::from_str(&contents)
                .map_err(|e| StorageError::Malformed(self.path.clone(), e.to_string())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(StorageError::Io(self.path.clone(), e)),
        }
    }

    fn store_map(&self, map: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| StorageError::Io(parent.to_path_buf(), e))?;
        }
        let contents = serde_json::to_string_pretty(map)
            .map_err(|e| StorageError::Malformed(self.path.clone(), e.to_string()))?;
        fs::write(&self.path, contents).map_err(|e| StorageError::Io(self.path.clone(), e))
    }
}

impl KeyValueStore for FileKeyValue {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.load_map()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut map = self.load_map()?;
        map.insert(key.to_string(), value.to_string());
        self.store_map(&map)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut map = self.load_map()?;
        if map.remove(key).is_some() {
            self.store_map(&map)?;
        }
        Ok(())
    }
}

/// In-memory key/value store. Clones share the same backing map.
#[derive(Debug, Clone, Default)]
pub struct MemoryKeyValue {
    map: Arc<RwLock<BTreeMap<String, String>>>,
}

impl MemoryKeyValue {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKeyValue {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.map.read().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.map
            .write()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.map.write().unwrap().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_store() -> (FileKeyValue, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = FileKeyValue::new(temp_dir.path().join("state.json"));
        (store, temp_dir)
    }

    #[test]
    fn test_get_unset_key_returns_none() {
        let (store, _temp) = test_store();
        assert_eq!(store.get("missing").unwrap(), None);
    }

    #[test]
    fn test_set_then_get() {
        let (store, _temp) = test_store();
        store.set("notes", "hello").unwrap();
        assert_eq!(store.get("notes").unwrap(), Some("hello".to_string()));
    }

    #[test]
    fn test_set_overwrites() {
        let (store, _temp) = test_store();
        store.set("k", "one").unwrap();
        store.set("k", "two").unwrap();
        assert_eq!(store.get("k").unwrap(), Some("two".to_string()));
    }

    #[test]
    fn test_set_creates_parent_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("nested").join("state.json");
        let store = FileKeyValue::new(nested.clone());
        store.set("k", "v").unwrap();
        assert!(nested.exists());
    }

    #[test]
    fn test_clones_share_backing_file() {
        let (store, _temp) = test_store();
        let other = store.clone();
        store.set("k", "v").unwrap();
        assert_eq!(other.get("k").unwrap(), Some("v".to_string()));
    }

    #[test]
    fn test_remove() {
        let (store, _temp) = test_store();
        store.set("k", "v").unwrap();
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let (store, temp) = test_store();
        fs::write(temp.path().join("state.json"), "not json").unwrap();
        assert!(matches!(
            store.get("k"),
            Err(StorageError::Malformed(_, _))
        ));
    }

    #[test]
    fn test_memory_store_clones_share_map() {
        let store = MemoryKeyValue::new();
        let other = store.clone();
        store.set("k", "v").unwrap();
        assert_eq!(other.get("k").unwrap(), Some("v".to_string()));
        other.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }
}
