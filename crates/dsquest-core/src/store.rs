//! String key/value stores backing the progress repository.

use std::collections::{BTreeMap, HashMap};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::StoreError;

/// A persistent string key/value store.
///
/// Writes are last-write-wins; there is no cross-process locking.
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `None` when absent.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Insert or overwrite a value.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove a value. Removing an absent key is not an error.
    fn delete(&self, key: &str) -> Result<(), StoreError>;
}

/// In-memory store, used by tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A poisoned map is still a valid map.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.lock().remove(key);
        Ok(())
    }
}

/// A store persisted as one JSON object in a file.
///
/// A missing file reads as empty. A corrupt file also reads as empty (and is
/// replaced on the next write). Every write goes through a temporary file in
/// the same directory followed by a rename.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_err(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(self.io_err(e)),
        };
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        match serde_json::from_str(&content) {
            Ok(map) => Ok(map),
            Err(e) => {
                tracing::warn!(
                    "store file {} is corrupt, treating as empty: {}",
                    self.path.display(),
                    e
                );
                Ok(BTreeMap::new())
            }
        }
    }

    fn write_all(&self, map: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(map).map_err(|e| StoreError::Encode {
            key: "*".into(),
            message: e.to_string(),
        })?;

        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&parent).map_err(|e| self.io_err(e))?;

        let mut tmp = tempfile::NamedTempFile::new_in(&parent).map_err(|e| self.io_err(e))?;
        tmp.write_all(json.as_bytes())
            .map_err(|e| self.io_err(e))?;
        tmp.persist(&self.path).map_err(|e| self.io_err(e.error))?;
        Ok(())
    }

    fn update(
        &self,
        f: impl FnOnce(&mut BTreeMap<String, String>),
    ) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut map = self.read_all()?;
        f(&mut map);
        self.write_all(&map)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.update(|map| {
            map.insert(key.to_string(), value.to_string());
        })
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.update(|map| {
            map.remove(key);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_basic_ops() {
        let store = MemoryStore::new();
        assert!(store.get("k").unwrap().is_none());
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        store.set("k", "w").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("w"));
        store.delete("k").unwrap();
        store.delete("k").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("save.json");

        let store = FileStore::new(&path);
        assert!(store.get("progress").unwrap().is_none());
        store.set("progress", "{\"xp\":5}").unwrap();
        store.set("code_l1", "print(1)\n").unwrap();

        let reopened = FileStore::new(&path);
        assert_eq!(
            reopened.get("code_l1").unwrap().as_deref(),
            Some("print(1)\n")
        );
        reopened.delete("code_l1").unwrap();
        assert!(store.get("code_l1").unwrap().is_none());
        assert!(store.get("progress").unwrap().is_some());
    }

    #[test]
    fn file_store_corrupt_file_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("save.json");
        std::fs::write(&path, "{{{ definitely not json").unwrap();

        let store = FileStore::new(&path);
        assert!(store.get("progress").unwrap().is_none());

        store.set("progress", "x").unwrap();
        assert_eq!(store.get("progress").unwrap().as_deref(), Some("x"));
    }

    /// A store whose parent "directory" is a regular file.
    fn blocked_store(dir: &Path) -> FileStore {
        let blocker = dir.join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();
        FileStore::new(blocker.join("save.json"))
    }

    #[test]
    fn file_store_io_failure_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = blocked_store(dir.path());

        let err = store.set("progress", "x").unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
        assert!(err.to_string().contains("save.json"));
    }

    #[test]
    fn set_completed_propagates_io_failure() {
        use crate::progress::ProgressStore;
        use crate::repository::KvProgressRepository;
        use std::sync::Arc;

        let dir = tempfile::tempdir().unwrap();
        let kv = Arc::new(blocked_store(dir.path()));
        let progress = ProgressStore::new(Arc::new(KvProgressRepository::new(kv)));

        let err = progress.set_completed("py-01", 50).unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
        assert!(progress.save_code("py-01", "print(1)").is_err());
    }
}
