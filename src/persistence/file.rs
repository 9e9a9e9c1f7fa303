//! JSON file backend for native builds
//!
//! All keys live in one JSON object. Writes go to a sibling `.tmp` file that
//! is then renamed over the save, so a crash never leaves a half-written file.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{Storage, StorageError};

#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(json) => Ok(serde_json::from_str(&json)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_all(&self, items: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_string_pretty(items)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl Storage for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_all()?.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = self.read_all()?;
        items.insert(key.to_string(), value.to_string());
        self.write_all(&items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::ScoreStore;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("whack-a-mole-test-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let store = FileStore::new(temp_path("missing.json"));
        assert_eq!(store.get_item("anything").unwrap(), None);
        assert_eq!(store.load_best_score(), 0);
    }

    #[test]
    fn test_keys_persist_across_instances() {
        let path = temp_path("persist.json");
        let mut store = FileStore::new(&path);
        store.save_best_score(23);
        store.set_item("whackamole_muted", "true").unwrap();

        let reopened = FileStore::new(&path);
        assert_eq!(reopened.load_best_score(), 23);
        assert_eq!(
            reopened.get_item("whackamole_muted").unwrap().as_deref(),
            Some("true")
        );
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_corrupt_file_is_an_error_but_score_is_zero() {
        let path = temp_path("corrupt.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{ not json").unwrap();
        let store = FileStore::new(&path);
        assert!(matches!(store.get_item("k"), Err(StorageError::Json(_))));
        assert_eq!(store.load_best_score(), 0);
        let _ = fs::remove_file(&path);
    }
}
