//! User registry domain model.
//!
//! # Responsibility
//! - Define the canonical user record persisted by the store.
//! - Own field shape rules shared by every write path.
//!
//! # Invariants
//! - Every record is identified by a stable `UserId`.
//! - Committed records always satisfy `UserFields::validate()`.

pub mod user;
