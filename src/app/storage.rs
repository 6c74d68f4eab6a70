// Cercanos - app/storage.rs
//
// Local storage: a string-keyed map of string values, the same contract as
// a browser's localStorage. Values are JSON-encoded by the callers.
//
// Design principles:
// - FileStorage rewrites the whole map on every mutation, atomically
//   (write temp, rename final), so a crash never corrupts the previous file.
// - A missing file is a normal first run. A malformed file is logged and
//   treated as empty; the next write replaces it.

use crate::util::error::StorageError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Key/value store with localStorage semantics.
pub trait LocalStorage: fmt::Debug {
    /// Raw stored value, if any.
    fn get_item(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value.
    fn set_item(&mut self, key: &str, value: String) -> Result<(), StorageError>;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove_item(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Decode the JSON value stored under `key`. `Ok(None)` if the key is absent.
pub fn get_json<T, S>(storage: &S, key: &str) -> Result<Option<T>, StorageError>
where
    T: DeserializeOwned,
    S: LocalStorage + ?Sized,
{
    match storage.get_item(key) {
        None => Ok(None),
        Some(raw) => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| StorageError::Decode {
                key: key.to_string(),
                source: e,
            }),
    }
}

/// JSON-encode `value` and store it under `key`.
pub fn set_json<T, S>(storage: &mut S, key: &str, value: &T) -> Result<(), StorageError>
where
    T: Serialize + ?Sized,
    S: LocalStorage + ?Sized,
{
    let encoded = serde_json::to_string(value).map_err(|e| StorageError::Encode {
        key: key.to_string(),
        source: e,
    })?;
    storage.set_item(key, encoded)
}

// =============================================================================
// In-memory backend
// =============================================================================

/// Volatile storage, used by tests and when no data directory is wanted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStorage {
    items: BTreeMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.items.insert(key.to_string(), value);
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        self.items.remove(key);
        Ok(())
    }
}

// =============================================================================
// File backend
// =============================================================================

/// Storage persisted as one pretty-printed JSON object on disk.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    items: BTreeMap<String, String>,
}

impl FileStorage {
    /// Open the storage file at `path`, loading its contents if present.
    ///
    /// Only unreadable files (other than "not found") are errors.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        let items = match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(items) => items,
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Local storage file is malformed; starting empty"
                    );
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No local storage file yet");
                BTreeMap::new()
            }
            Err(e) => {
                return Err(StorageError::Io {
                    path: path.to_path_buf(),
                    operation: "read",
                    source: e,
                })
            }
        };

        tracing::debug!(path = %path.display(), keys = items.len(), "Local storage opened");
        Ok(Self {
            path: path.to_path_buf(),
            items,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the full map to disk atomically.
    fn flush(&self) -> Result<(), StorageError> {
        let io_err = |operation: &'static str, path: &Path, source| StorageError::Io {
            path: path.to_path_buf(),
            operation,
            source,
        };

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| io_err("create directory", parent, e))?;
        }

        let json = serde_json::to_string_pretty(&self.items).map_err(|e| StorageError::Json {
            path: self.path.clone(),
            source: e,
        })?;

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json.as_bytes()).map_err(|e| io_err("write", tmp.as_path(), e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| {
            let _ = std::fs::remove_file(&tmp);
            io_err("rename", self.path.as_path(), e)
        })?;

        tracing::debug!(path = %self.path.display(), "Local storage flushed");
        Ok(())
    }
}

impl LocalStorage for FileStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: String) -> Result<(), StorageError> {
        self.items.insert(key.to_string(), value);
        self.flush()
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        if self.items.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_set_get_remove() {
        let mut storage = MemoryStorage::new();
        assert_eq!(storage.get_item("k"), None);
        storage.set_item("k", "\"v\"".to_string()).unwrap();
        assert_eq!(storage.get_item("k").as_deref(), Some("\"v\""));
        storage.remove_item("k").unwrap();
        storage.remove_item("k").unwrap();
        assert_eq!(storage.get_item("k"), None);
    }

    #[test]
    fn test_json_helpers() {
        let mut storage = MemoryStorage::new();
        set_json(&mut storage, "ids", &vec!["1", "2"]).unwrap();
        assert_eq!(storage.get_item("ids").as_deref(), Some(r#"["1","2"]"#));
        let ids: Option<Vec<String>> = get_json(&storage, "ids").unwrap();
        assert_eq!(ids, Some(vec!["1".to_string(), "2".to_string()]));
        let missing: Option<Vec<String>> = get_json(&storage, "nope").unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_get_json_decode_error_names_key() {
        let mut storage = MemoryStorage::new();
        storage.set_item("ids", "not json".to_string()).unwrap();
        let err = get_json::<Vec<String>, _>(&storage, "ids").unwrap_err();
        assert!(matches!(err, StorageError::Decode { ref key, .. } if key == "ids"));
    }

    #[test]
    fn test_file_storage_persists_across_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("local_storage.json");

        let mut storage = FileStorage::open(&path).unwrap();
        storage.set_item("a", "1".to_string()).unwrap();
        storage.set_item("b", "2".to_string()).unwrap();
        storage.remove_item("a").unwrap();

        let reopened = FileStorage::open(&path).unwrap();
        assert_eq!(reopened.get_item("a"), None);
        assert_eq!(reopened.get_item("b").as_deref(), Some("2"));
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_file_storage_malformed_starts_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("local_storage.json");
        std::fs::write(&path, b"{{{{ garbage").unwrap();

        let mut storage = FileStorage::open(&path).unwrap();
        assert_eq!(storage.get_item("anything"), None);

        storage.set_item("k", "v".to_string()).unwrap();
        let reopened = FileStorage::open(&path).unwrap();
        assert_eq!(reopened.get_item("k").as_deref(), Some("v"));
    }

    #[test]
    fn test_file_storage_overwrites_stale_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("local_storage.json");
        std::fs::write(path.with_extension("json.tmp"), b"garbage").unwrap();

        let mut storage = FileStorage::open(&path).unwrap();
        storage.set_item("k", "v".to_string()).unwrap();
        assert_eq!(FileStorage::open(&path).unwrap().get_item("k").as_deref(), Some("v"));
    }
}
