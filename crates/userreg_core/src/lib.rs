//! Core logic for the user registry editor.
//! Owns the user collection, its persistence, and view synchronization.

pub mod config;
pub mod controller;
pub mod kv;
pub mod logging;
pub mod model;
pub mod store;

pub use config::RegistryConfig;
pub use controller::{
    FormSurface, Mode, NoticeLevel, PasswordVisibility, PromptSurface, RegistryController,
    RegistryView, TableSurface, UserRow,
};
pub use kv::{BlobStore, KvError, KvResult, MemoryBlobStore, SqliteBlobStore};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::user::{Field, User, UserFields, UserId, UserValidationError};
pub use store::{
    Clock, FixedClock, StoreError, StoreResult, SystemClock, UserQuery, UserStore, USERS_KEY,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
