//! User collection store over a key-value blob.
//!
//! # Responsibility
//! - Load the collection once from storage (fail-open).
//! - Validate, apply and persist add/update/remove operations.
//! - Serve read-only filtered views through [`UserQuery`].
//!
//! # Invariants
//! - `id` values are unique within the collection and never change.
//! - Insertion order is preserved; new users are appended.
//! - Memory is updated only after the serialized collection was written.

use super::clock::{Clock, SystemClock};
use crate::kv::{BlobStore, KvError};
use crate::model::user::{User, UserFields, UserId, UserValidationError};
use log::{debug, error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage key holding the serialized collection.
pub const USERS_KEY: &str = "users";

pub type StoreResult<T> = Result<T, StoreError>;

/// Error for store lifecycle and mutation operations.
#[derive(Debug)]
pub enum StoreError {
    Validation(UserValidationError),
    NotFound(UserId),
    Storage(KvError),
    Serialization(serde_json::Error),
    /// Persisted blob exists but cannot be decoded into a collection.
    Corrupt(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "user not found: {id}"),
            Self::Storage(err) => write!(f, "{err}"),
            Self::Serialization(err) => write!(f, "failed to encode users: {err}"),
            Self::Corrupt(message) => write!(f, "corrupt persisted users: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::Serialization(err) => Some(err),
            Self::NotFound(_) | Self::Corrupt(_) => None,
        }
    }
}

impl From<UserValidationError> for StoreError {
    fn from(value: UserValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<KvError> for StoreError {
    fn from(value: KvError) -> Self {
        Self::Storage(value)
    }
}

/// Authoritative in-memory user collection mirrored to a blob store.
pub struct UserStore<S, C = SystemClock> {
    blob: S,
    clock: C,
    users: Vec<User>,
}

impl<S: BlobStore> UserStore<S> {
    /// Creates an empty store using the wall clock for ids.
    ///
    /// Call [`UserStore::load`] before serving the collection.
    pub fn new(blob: S) -> Self {
        Self::with_clock(blob, SystemClock)
    }
}

impl<S: BlobStore, C: Clock> UserStore<S, C> {
    pub fn with_clock(blob: S, clock: C) -> Self {
        Self {
            blob,
            clock,
            users: Vec::new(),
        }
    }

    /// Replaces the collection with the persisted one.
    ///
    /// A missing, unreadable or undecodable blob yields an empty collection.
    /// Returns the number of loaded users.
    pub fn load(&mut self) -> usize {
        match self.read_persisted() {
            Ok(users) => self.users = users,
            Err(err) => {
                warn!(
                    "event=store_load module=store status=corrupt fallback=empty error={}",
                    err
                );
                self.users = Vec::new();
            }
        }
        info!(
            "event=store_load module=store status=ok count={}",
            self.users.len()
        );
        self.users.len()
    }

    /// Like [`UserStore::load`], but reports unreadable or corrupt storage.
    ///
    /// On error the current collection is left untouched.
    pub fn load_strict(&mut self) -> StoreResult<usize> {
        self.users = self.read_persisted()?;
        Ok(self.users.len())
    }

    /// Validates `fields`, appends a new user and persists.
    ///
    /// # Errors
    /// - `Validation` when a field is missing or malformed; nothing changes.
    /// - `Storage`/`Serialization` when the write fails; nothing changes.
    /// - `Corrupt` when no id above the current maximum is left.
    pub fn add(&mut self, fields: UserFields) -> StoreResult<User> {
        fields.validate()?;

        let user = User::from_fields(self.next_id()?, fields);
        let mut next = self.users.clone();
        next.push(user.clone());
        self.commit(next)?;

        info!(
            "event=user_add module=store status=ok user_id={} count={}",
            user.id,
            self.users.len()
        );
        Ok(user)
    }

    /// Replaces every field of user `id` except the id itself, then persists.
    pub fn update(&mut self, id: UserId, fields: UserFields) -> StoreResult<User> {
        let index = self.position(id)?;
        fields.validate()?;

        let mut next = self.users.clone();
        next[index].apply(fields);
        let updated = next[index].clone();
        self.commit(next)?;

        info!("event=user_update module=store status=ok user_id={id}");
        Ok(updated)
    }

    /// Removes user `id` and persists.
    ///
    /// Operator confirmation is the caller's responsibility.
    pub fn remove(&mut self, id: UserId) -> StoreResult<()> {
        let index = self.position(id)?;

        let mut next = self.users.clone();
        next.remove(index);
        self.commit(next)?;

        info!(
            "event=user_remove module=store status=ok user_id={} count={}",
            id,
            self.users.len()
        );
        Ok(())
    }

    /// Looks up one user by id.
    pub fn get(&self, id: UserId) -> StoreResult<&User> {
        self.users
            .iter()
            .find(|user| user.id == id)
            .ok_or(StoreError::NotFound(id))
    }

    /// Lazily iterates users matching `term`, in insertion order.
    ///
    /// See [`User::matches`] for matching rules.
    pub fn query<'a>(&'a self, term: &'a str) -> UserQuery<'a> {
        UserQuery {
            users: &self.users,
            term,
            next: 0,
        }
    }

    /// Re-writes the current collection to storage.
    pub fn flush(&mut self) -> StoreResult<()> {
        Self::write(&mut self.blob, &self.users)
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn blob(&self) -> &S {
        &self.blob
    }

    pub fn blob_mut(&mut self) -> &mut S {
        &mut self.blob
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    fn read_persisted(&self) -> StoreResult<Vec<User>> {
        let Some(raw) = self.blob.get(USERS_KEY)? else {
            return Ok(Vec::new());
        };
        let users: Vec<User> =
            serde_json::from_str(&raw).map_err(|err| StoreError::Corrupt(err.to_string()))?;

        let mut seen = std::collections::HashSet::with_capacity(users.len());
        if let Some(duplicate) = users.iter().find(|user| !seen.insert(user.id)) {
            return Err(StoreError::Corrupt(format!(
                "duplicate user id {}",
                duplicate.id
            )));
        }
        Ok(users)
    }

    fn position(&self, id: UserId) -> StoreResult<usize> {
        self.users
            .iter()
            .position(|user| user.id == id)
            .ok_or(StoreError::NotFound(id))
    }

    /// Millisecond timestamp, bumped past the largest known id so ids stay
    /// unique even for additions within the same millisecond.
    ///
    /// Fails with `Corrupt` once the largest id is `i64::MAX`.
    fn next_id(&self) -> StoreResult<UserId> {
        let now = self.clock.now_millis();
        let Some(max_id) = self.users.iter().map(|user| user.id.value()).max() else {
            return Ok(UserId(now));
        };
        let floor = max_id
            .checked_add(1)
            .ok_or_else(|| StoreError::Corrupt("id space exhausted".to_string()))?;
        if floor > now {
            debug!("event=user_id_bump module=store clock_ms={now} assigned={floor}");
        }
        Ok(UserId(now.max(floor)))
    }

    fn commit(&mut self, next: Vec<User>) -> StoreResult<()> {
        Self::write(&mut self.blob, &next)?;
        self.users = next;
        Ok(())
    }

    fn write(blob: &mut S, users: &[User]) -> StoreResult<()> {
        let encoded = serde_json::to_string(users).map_err(StoreError::Serialization)?;
        blob.set(USERS_KEY, &encoded).map_err(|err| {
            error!("event=store_persist module=store status=error error={err}");
            StoreError::from(err)
        })
    }
}

/// Restartable lazy filter over the store's collection.
#[derive(Debug, Clone)]
pub struct UserQuery<'a> {
    users: &'a [User],
    term: &'a str,
    next: usize,
}

impl<'a> UserQuery<'a> {
    /// Moves the cursor back to the first user.
    pub fn rewind(&mut self) {
        self.next = 0;
    }
}

impl<'a> Iterator for UserQuery<'a> {
    type Item = &'a User;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(user) = self.users.get(self.next) {
            self.next += 1;
            if user.matches(self.term) {
                return Some(user);
            }
        }
        None
    }
}
