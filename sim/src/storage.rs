use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to read {key:?}: {source}")]
    Read { key: String, source: io::Error },

    #[error("failed to write {key:?}: {source}")]
    Write { key: String, source: io::Error },
}

/// Key-value blob store the world snapshot lives in
pub trait Storage {
    /// `Ok(None)` when nothing was ever stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace whatever is stored under `key`
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Storage that lives as long as the process
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One `<key>.json` file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Read {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let write_err = |source| StorageError::Write {
            key: key.to_string(),
            source,
        };

        fs::create_dir_all(&self.dir).map_err(write_err)?;

        // Write next to the target and swap, so readers never see half a file
        let target = self.path_for(key);
        let staging = target.with_extension("json.tmp");
        fs::write(&staging, value).map_err(write_err)?;
        fs::rename(&staging, &target).map_err(write_err)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_replaces() {
        let mut storage = MemoryStorage::new();
        assert!(storage.get("k").unwrap().is_none());

        storage.set("k", "one").unwrap();
        storage.set("k", "two").unwrap();
        assert_eq!(storage.get("k").unwrap().as_deref(), Some("two"));
    }

    #[test]
    fn test_file_storage_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path().join("nested"));

        assert!(storage.get("CanvasData").unwrap().is_none());

        storage.set("CanvasData", "{\"a\":1}").unwrap();
        storage.set("CanvasData", "{\"a\":2}").unwrap();

        assert_eq!(
            storage.get("CanvasData").unwrap().as_deref(),
            Some("{\"a\":2}")
        );
        assert!(dir.path().join("nested").join("CanvasData.json").exists());
        assert!(!dir.path().join("nested").join("CanvasData.json.tmp").exists());
    }

    #[test]
    fn test_file_storage_reports_unreadable_key() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should be cannot be read as text
        std::fs::create_dir_all(dir.path().join("broken.json")).unwrap();

        let storage = FileStorage::new(dir.path());
        assert!(matches!(
            storage.get("broken"),
            Err(StorageError::Read { .. })
        ));
    }
}
