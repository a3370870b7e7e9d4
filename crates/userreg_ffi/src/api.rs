//! FFI use-case API for a Flutter registry screen.
//!
//! # Responsibility
//! - Expose list/get/add/update/delete as synchronous FRB calls.
//! - Convert every core error into an operator-readable message.
//!
//! # Invariants
//! - Exported functions never panic across the FFI boundary.
//! - Each call loads the persisted collection fresh and persists before
//!   returning success.
//! - Mutations refuse to run over unreadable or corrupt storage, so a bad
//!   read is never written back as an empty collection.
//! - Delete confirmation is owned by the Dart caller.

use log::warn;
use std::path::PathBuf;
use std::sync::OnceLock;
use userreg_core::controller::operator_message;
use userreg_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, RegistryConfig,
    SqliteBlobStore, StoreError, User, UserFields, UserId, UserStore,
};

static DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and an error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// One visible table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserListItem {
    /// 1-based position within the filtered list.
    pub position: u32,
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub mobile: String,
}

/// Filtered list envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserListResponse {
    pub items: Vec<UserListItem>,
    /// Label text for the count badge; reflects the filtered count.
    pub count_label: String,
    /// Placeholder text when `items` is empty, otherwise empty.
    pub message: String,
}

/// Full record used to prefill the edit form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDetail {
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub password: String,
}

/// Generic mutation envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserActionResponse {
    pub ok: bool,
    pub user_id: Option<i64>,
    pub message: String,
}

impl UserActionResponse {
    fn success(message: impl Into<String>, user_id: UserId) -> Self {
        Self {
            ok: true,
            user_id: Some(user_id.value()),
            message: message.into(),
        }
    }

    fn failure(action: &str, err: &StoreError) -> Self {
        warn!("event=ffi_{action} module=ffi status=error");
        Self {
            ok: false,
            user_id: None,
            message: operator_message(err),
        }
    }
}

/// Lists users whose name/email (case-insensitive) or mobile contain `search`.
#[flutter_rust_bridge::frb(sync)]
pub fn user_list(search: String) -> UserListResponse {
    match read_store(|store| Ok(list_items(store, search.as_str()))) {
        Ok(items) => {
            let message = if items.is_empty() {
                "No users found".to_string()
            } else {
                String::new()
            };
            UserListResponse {
                count_label: format!("{} users", items.len()),
                items,
                message,
            }
        }
        Err(err) => UserListResponse {
            items: Vec::new(),
            count_label: "0 users".to_string(),
            message: operator_message(&err),
        },
    }
}

/// Returns one user for edit prefill, or `None` when the id is stale.
#[flutter_rust_bridge::frb(sync)]
pub fn user_get(user_id: i64) -> Option<UserDetail> {
    read_store(|store| store.get(UserId(user_id)).map(to_detail)).ok()
}

#[flutter_rust_bridge::frb(sync)]
pub fn user_add(
    name: String,
    email: String,
    mobile: String,
    password: String,
) -> UserActionResponse {
    let fields = UserFields::new(name, email, mobile, password).trimmed();
    match with_store(|store| store.add(fields)) {
        Ok(user) => UserActionResponse::success("User added successfully!", user.id),
        Err(err) => UserActionResponse::failure("user_add", &err),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn user_update(
    user_id: i64,
    name: String,
    email: String,
    mobile: String,
    password: String,
) -> UserActionResponse {
    let fields = UserFields::new(name, email, mobile, password).trimmed();
    match with_store(|store| store.update(UserId(user_id), fields)) {
        Ok(user) => UserActionResponse::success("User updated successfully!", user.id),
        Err(err) => UserActionResponse::failure("user_update", &err),
    }
}

/// Deletes a user. The caller must have confirmed with the operator.
#[flutter_rust_bridge::frb(sync)]
pub fn user_delete(user_id: i64) -> UserActionResponse {
    let id = UserId(user_id);
    match with_store(|store| store.remove(id)) {
        Ok(()) => UserActionResponse::success("User deleted successfully!", id),
        Err(err) => UserActionResponse::failure("user_delete", &err),
    }
}

fn list_items(store: &UserStore<SqliteBlobStore>, search: &str) -> Vec<UserListItem> {
    store
        .query(search)
        .zip(1u32..)
        .map(|(user, position)| UserListItem {
            position,
            user_id: user.id.value(),
            name: user.name.clone(),
            email: user.email.clone(),
            mobile: user.mobile.clone(),
        })
        .collect()
}

fn to_detail(user: &User) -> UserDetail {
    UserDetail {
        user_id: user.id.value(),
        name: user.name.clone(),
        email: user.email.clone(),
        mobile: user.mobile.clone(),
        password: user.password.clone(),
    }
}

fn resolve_db_path() -> &'static PathBuf {
    DB_PATH.get_or_init(|| RegistryConfig::from_env().db_path)
}

/// Read-only access; unreadable storage shows as an empty list.
fn read_store<T>(
    f: impl FnOnce(&UserStore<SqliteBlobStore>) -> Result<T, StoreError>,
) -> Result<T, StoreError> {
    let mut store = UserStore::new(SqliteBlobStore::open(resolve_db_path())?);
    store.load();
    f(&store)
}

/// Mutating access over a strictly loaded collection.
fn with_store<T>(
    f: impl FnOnce(&mut UserStore<SqliteBlobStore>) -> Result<T, StoreError>,
) -> Result<T, StoreError> {
    let mut store = UserStore::new(SqliteBlobStore::open(resolve_db_path())?);
    store.load_strict()?;
    f(&mut store)
}
