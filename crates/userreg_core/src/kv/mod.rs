//! Key-value blob storage backing the user store.
//!
//! # Responsibility
//! - Provide whole-value read/write access under string keys.
//! - Open and migrate the SQLite file that holds those entries.
//!
//! # Invariants
//! - A `set` fully replaces the previous value for that key.
//! - Migration version is tracked via `PRAGMA user_version`.
//! - Values are opaque text; encoding is owned by the caller.

use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;
mod sqlite;

pub use open::{open_db, open_db_in_memory};
pub use sqlite::SqliteBlobStore;

pub type KvResult<T> = Result<T, KvError>;

#[derive(Debug)]
pub enum KvError {
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// Backend refused the operation (e.g. storage disabled or full).
    Unavailable(String),
}

impl Display for KvError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::Unavailable(message) => write!(f, "storage unavailable: {message}"),
        }
    }
}

impl Error for KvError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
            Self::Unavailable(_) => None,
        }
    }
}

impl From<rusqlite::Error> for KvError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Whole-value key-value storage contract.
pub trait BlobStore {
    /// Reads the value stored under `key`, if any.
    fn get(&self, key: &str) -> KvResult<Option<String>>;
    /// Stores `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> KvResult<()>;
    /// Removes `key`. Returns whether an entry existed.
    fn remove(&mut self, key: &str) -> KvResult<bool>;
}

/// In-process blob store for tests and throwaway sessions.
#[derive(Debug, Default, Clone)]
pub struct MemoryBlobStore {
    entries: HashMap<String, String>,
    reject_writes: bool,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-seeded with one entry.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut store = Self::default();
        store.entries.insert(key.into(), value.into());
        store
    }

    /// Makes subsequent `set`/`remove` calls fail with `KvError::Unavailable`.
    pub fn set_reject_writes(&mut self, reject: bool) {
        self.reject_writes = reject;
    }

    fn check_writable(&self) -> KvResult<()> {
        if self.reject_writes {
            return Err(KvError::Unavailable("writes rejected".to_string()));
        }
        Ok(())
    }
}

impl BlobStore for MemoryBlobStore {
    fn get(&self, key: &str) -> KvResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> KvResult<()> {
        self.check_writable()?;
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> KvResult<bool> {
        self.check_writable()?;
        Ok(self.entries.remove(key).is_some())
    }
}
