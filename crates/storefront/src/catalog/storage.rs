//! Key-value persistence for the catalog.
//!
//! Values are opaque strings (JSON in practice). `FileStorage` keeps one
//! `<key>.json` file per key; `MemoryStorage` backs tests and tooling.

use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Mutex;

use thiserror::Error;

/// Errors from a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Key contains characters that can't be mapped to a file name.
    #[error("invalid storage key: {0}")]
    InvalidKey(String),

    /// Backend state is unusable (e.g. a poisoned lock).
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Boxed future returned by [`KeyValueStorage`] methods.
pub type StorageFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StorageError>> + Send + 'a>>;

/// A named-value store.
///
/// Implementations must make `write` atomic with respect to `read`: a
/// reader sees either the previous value or the new one, never a mix.
pub trait KeyValueStorage: Send + Sync {
    /// Read the value stored under `key`, or `None` if nothing is stored.
    fn read<'a>(&'a self, key: &'a str) -> StorageFuture<'a, Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn write<'a>(&'a self, key: &'a str, value: &'a str) -> StorageFuture<'a, ()>;
}

// =============================================================================
// File storage
// =============================================================================

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Create a storage rooted at `dir`. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the stored files.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidKey` for empty keys or keys that are not
    /// plain ASCII alphanumerics, `_` or `-`.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }

    async fn read_file(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }

    async fn write_file(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| StorageError::Io {
                path: self.dir.clone(),
                source,
            })?;

        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, value)
            .await
            .map_err(|source| StorageError::Io {
                path: tmp.clone(),
                source,
            })?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|source| StorageError::Io { path, source })
    }
}

impl KeyValueStorage for FileStorage {
    fn read<'a>(&'a self, key: &'a str) -> StorageFuture<'a, Option<String>> {
        Box::pin(self.read_file(key))
    }

    fn write<'a>(&'a self, key: &'a str, value: &'a str) -> StorageFuture<'a, ()> {
        Box::pin(self.write_file(key, value))
    }
}

// =============================================================================
// Memory storage
// =============================================================================

/// Process-local storage.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-populated with one value.
    #[must_use]
    pub fn with_value(key: &str, value: &str) -> Self {
        let storage = Self::default();
        if let Ok(mut values) = storage.values.lock() {
            values.insert(key.to_string(), value.to_string());
        }
        storage
    }

    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let values = self
            .values
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut values = self
            .values
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

impl KeyValueStorage for MemoryStorage {
    fn read<'a>(&'a self, key: &'a str) -> StorageFuture<'a, Option<String>> {
        let result = self.get(key);
        Box::pin(std::future::ready(result))
    }

    fn write<'a>(&'a self, key: &'a str, value: &'a str) -> StorageFuture<'a, ()> {
        let result = self.set(key, value);
        Box::pin(std::future::ready(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("lumina-storage-{name}-{}", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn test_memory_storage_round_trip() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.read("k").await.expect("read"), None);

        storage.write("k", "v1").await.expect("write");
        storage.write("k", "v2").await.expect("write");
        assert_eq!(storage.read("k").await.expect("read").as_deref(), Some("v2"));
    }

    #[tokio::test]
    async fn test_file_storage_missing_key_is_none() {
        let storage = FileStorage::new(temp_dir("missing"));
        assert_eq!(storage.read("lumina_products").await.expect("read"), None);
    }

    #[tokio::test]
    async fn test_file_storage_writes_json_file() {
        let dir = temp_dir("write");
        let storage = FileStorage::new(&dir);

        storage
            .write("lumina_products", "[]")
            .await
            .expect("write");

        let on_disk = std::fs::read_to_string(dir.join("lumina_products.json")).expect("file");
        assert_eq!(on_disk, "[]");
        assert!(!dir.join("lumina_products.json.tmp").exists());
        assert_eq!(
            storage.read("lumina_products").await.expect("read").as_deref(),
            Some("[]")
        );

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_file_storage_rejects_path_keys() {
        let storage = FileStorage::new("data");
        assert!(matches!(
            storage.path_for("../etc/passwd"),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(matches!(storage.path_for(""), Err(StorageError::InvalidKey(_))));
        assert_eq!(
            storage.path_for("lumina_products").expect("path"),
            PathBuf::from("data").join("lumina_products.json")
        );
    }
}
