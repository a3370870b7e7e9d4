//! Record store: the authoritative user collection and its persistence.
//!
//! # Responsibility
//! - Own the ordered user collection for the whole process.
//! - Persist the full collection after every successful mutation.
//!
//! # Invariants
//! - After a mutating call returns `Ok`, storage holds exactly the in-memory
//!   collection.
//! - A failed mutation changes neither memory nor storage.

mod clock;
pub mod user_store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use user_store::{StoreError, StoreResult, UserQuery, UserStore, USERS_KEY};
