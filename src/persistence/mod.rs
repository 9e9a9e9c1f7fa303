//! Key/value persistence for the best score and settings
//!
//! Backends implement [`Storage`], which can fail. The game only ever talks
//! to [`ScoreStore`], which swallows every failure: an unreadable store is
//! a best score of 0 and a failed save is logged and forgotten.

#[cfg(not(target_arch = "wasm32"))]
pub mod file;
#[cfg(target_arch = "wasm32")]
pub mod local;

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::Debug;
use std::rc::Rc;

use thiserror::Error;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;
#[cfg(target_arch = "wasm32")]
pub use local::LocalStore;

/// Storage key for the best score
pub const BEST_SCORE_KEY: &str = "whackamole_best_score";

/// Failure inside a storage backend
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage is unavailable")]
    Unavailable,

    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored data is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("browser storage error: {0}")]
    Js(String),
}

/// String key/value backend (LocalStorage semantics)
pub trait Storage: Debug {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Best-score persistence as the session sees it. Infallible by contract.
pub trait ScoreStore: Debug {
    /// Stored best score, 0 when absent or unreadable
    fn load_best_score(&self) -> u64;
    /// Persist a new best score; failures are logged only
    fn save_best_score(&mut self, score: u64);
}

impl<S: Storage> ScoreStore for S {
    fn load_best_score(&self) -> u64 {
        match self.get_item(BEST_SCORE_KEY) {
            Ok(Some(raw)) => match raw.trim().parse::<u64>() {
                Ok(score) => score,
                Err(_) => {
                    log::warn!("Ignoring malformed best score {raw:?}");
                    0
                }
            },
            Ok(None) => 0,
            Err(e) => {
                log::warn!("Could not load best score: {e}");
                0
            }
        }
    }

    fn save_best_score(&mut self, score: u64) {
        match self.set_item(BEST_SCORE_KEY, &score.to_string()) {
            Ok(()) => log::info!("Best score {score} saved"),
            Err(e) => log::warn!("Could not save best score: {e}"),
        }
    }
}

/// In-process store. Clones share the same map, so a test can keep a handle
/// while the session owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: Rc<RefCell<HashMap<String, String>>>,
    unavailable: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every operation fails (storage denied)
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl Storage for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.unavailable {
            return Err(StorageError::Unavailable);
        }
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.unavailable {
            return Err(StorageError::Unavailable);
        }
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_best_is_zero() {
        assert_eq!(MemoryStore::new().load_best_score(), 0);
    }

    #[test]
    fn test_best_score_round_trip_through_clone() {
        let handle = MemoryStore::new();
        let mut store = handle.clone();
        store.save_best_score(17);
        assert_eq!(handle.load_best_score(), 17);
        assert_eq!(
            handle.get_item(BEST_SCORE_KEY).unwrap().as_deref(),
            Some("17")
        );
    }

    #[test]
    fn test_unavailable_store_is_swallowed() {
        let mut store = MemoryStore::unavailable();
        store.save_best_score(99);
        assert_eq!(store.load_best_score(), 0);
        assert!(matches!(
            store.get_item(BEST_SCORE_KEY),
            Err(StorageError::Unavailable)
        ));
    }

    #[test]
    fn test_malformed_best_is_zero() {
        let mut store = MemoryStore::new();
        store.set_item(BEST_SCORE_KEY, "lots").unwrap();
        assert_eq!(store.load_best_score(), 0);
        store.set_item(BEST_SCORE_KEY, " 12 ").unwrap();
        assert_eq!(store.load_best_score(), 12);
    }
}
