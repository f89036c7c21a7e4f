//! Process-wide store handle
//!
//! The on-disk store must have at most one live writable connection per
//! process. `Store` owns that connection behind a mutex; it is
//! initialized exactly once at startup and reached through a single
//! accessor. A second initialization attempt is rejected.

use super::Database;
use crate::error::{AskRouteError, Result};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, OnceLock};

static STORE: OnceLock<Store> = OnceLock::new();

/// Shared handle to the process's single writable database connection
#[derive(Debug)]
pub struct Store {
    db: Mutex<Database>,
}

impl Store {
    /// Open and initialize the store. Fails if already initialized.
    pub fn init(path: impl AsRef<Path>) -> Result<&'static Store> {
        let db = Database::open(path)?;
        db.initialize()?;

        let store = Store { db: Mutex::new(db) };
        STORE
            .set(store)
            .map_err(|_| AskRouteError::Config("store already initialized".to_string()))?;

        Ok(STORE.get().expect("store was just initialized"))
    }

    /// Get the initialized store
    pub fn get() -> Result<&'static Store> {
        STORE
            .get()
            .ok_or_else(|| AskRouteError::Config("store not initialized".to_string()))
    }

    /// Lock the underlying connection for a sequence of operations
    pub fn lock(&self) -> MutexGuard<'_, Database> {
        self.db.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_once_then_rejected() {
        let dir = tempfile::tempdir().unwrap();

        assert!(Store::get().is_err());

        let store = Store::init(dir.path().join("store.sqlite")).unwrap();
        assert_eq!(store.lock().schema_version().unwrap(), Some(1));

        assert!(Store::get().is_ok());

        let err = Store::init(dir.path().join("other.sqlite")).unwrap_err();
        assert!(matches!(err, AskRouteError::Config(_)));
    }
}
