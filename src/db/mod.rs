use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;

use log::{debug, info};

use crate::errors::AppError;
use crate::utils::config::Config;

/// One key per persisted collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
    Employees,
    Transactions,
    EmployeeTrash,
    TransactionTrash,
    Reports,
    ActivityLog,
    CurrentProfile,
    AuthenticatedFlag,
}

impl StoreKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKey::Employees => "employees",
            StoreKey::Transactions => "transactions",
            StoreKey::EmployeeTrash => "employee-trash",
            StoreKey::TransactionTrash => "transaction-trash",
            StoreKey::Reports => "reports",
            StoreKey::ActivityLog => "activity-log",
            StoreKey::CurrentProfile => "current-profile",
            StoreKey::AuthenticatedFlag => "authenticated-flag",
        }
    }
}

/// Whole-snapshot key-value storage. Implementations only move strings.
pub trait StoreAdapter: Send {
    fn read(&self, key: StoreKey) -> Result<Option<String>, AppError>;
    fn write(&mut self, key: StoreKey, snapshot: &str) -> Result<(), AppError>;
}

/// Stores each key as `<dir>/<key>.json`.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, AppError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|err| {
            AppError::PersistenceFailure(format!("cannot create {}: {}", dir.display(), err))
        })?;
        Ok(Self { dir })
    }

    fn path(&self, key: StoreKey) -> PathBuf {
        self.dir.join(format!("{}.json", key.as_str()))
    }
}

impl StoreAdapter for FileStore {
    fn read(&self, key: StoreKey) -> Result<Option<String>, AppError> {
        match fs::read_to_string(self.path(key)) {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(AppError::PersistenceFailure(format!(
                "cannot read {}: {}",
                key.as_str(),
                err
            ))),
        }
    }

    fn write(&mut self, key: StoreKey, snapshot: &str) -> Result<(), AppError> {
        let path = self.path(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, snapshot)
            .and_then(|_| fs::rename(&tmp, &path))
            .map_err(|err| {
                AppError::PersistenceFailure(format!("cannot write {}: {}", key.as_str(), err))
            })?;
        debug!("Persisted {} ({} bytes)", key.as_str(), snapshot.len());
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<StoreKey, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StoreAdapter for MemoryStore {
    fn read(&self, key: StoreKey) -> Result<Option<String>, AppError> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| AppError::PersistenceFailure("memory store poisoned".to_string()))?;
        Ok(entries.get(&key).cloned())
    }

    fn write(&mut self, key: StoreKey, snapshot: &str) -> Result<(), AppError> {
        let entries = self
            .entries
            .get_mut()
            .map_err(|_| AppError::PersistenceFailure("memory store poisoned".to_string()))?;
        entries.insert(key, snapshot.to_string());
        Ok(())
    }
}

pub fn open_store(config: &Config) -> Result<Box<dyn StoreAdapter>, AppError> {
    let store = FileStore::open(&config.data_dir)?;
    info!("Using data directory {}", config.data_dir.display());
    Ok(Box::new(store))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_reads_back_what_it_wrote() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut store = FileStore::open(dir.path()).expect("store opens");

        assert_eq!(store.read(StoreKey::Employees).expect("read"), None);
        store.write(StoreKey::Employees, "[]").expect("write");
        store.write(StoreKey::Employees, "[{\"id\":\"E1\"}]").expect("overwrite");

        let reopened = FileStore::open(dir.path()).expect("store reopens");
        assert_eq!(
            reopened.read(StoreKey::Employees).expect("read").as_deref(),
            Some("[{\"id\":\"E1\"}]")
        );
        assert!(dir.path().join("employees.json").exists());
        assert!(!dir.path().join("employees.json.tmp").exists());
    }

    #[test]
    fn keys_are_distinct() {
        let mut store = MemoryStore::new();
        store.write(StoreKey::Transactions, "t").expect("write");
        store.write(StoreKey::TransactionTrash, "tt").expect("write");
        assert_eq!(store.read(StoreKey::Transactions).expect("read").as_deref(), Some("t"));
        assert_eq!(
            store.read(StoreKey::TransactionTrash).expect("read").as_deref(),
            Some("tt")
        );
        assert_eq!(store.read(StoreKey::Reports).expect("read"), None);
    }
}
