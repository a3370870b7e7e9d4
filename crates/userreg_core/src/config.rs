//! Runtime configuration resolved from the environment.
//!
//! # Invariants
//! - Blank environment values behave as if unset.
//! - Logging stays disabled unless a log directory is configured.

use crate::logging::default_log_level;
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "USERREG_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "USERREG_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "USERREG_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "userreg.sqlite3";

/// Storage and logging settings shared by front ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl RegistryConfig {
    /// Reads `USERREG_*` variables from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolves settings through `lookup`, falling back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |name: &str| {
            lookup(name)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();

        Self {
            db_path: read(DB_PATH_ENV).map_or(defaults.db_path, PathBuf::from),
            log_level: read(LOG_LEVEL_ENV).unwrap_or(defaults.log_level),
            log_dir: read(LOG_DIR_ENV).map(PathBuf::from),
        }
    }
}

/// `<temp_dir>/userreg.sqlite3`
pub fn default_db_path() -> PathBuf {
    std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)
}
