//! View controller: bridges operator actions to store calls.
//!
//! # Responsibility
//! - Define the surfaces a front end implements (form, table, prompts).
//! - Keep the rendered table and count label in step with store state.
//!
//! # Invariants
//! - The controller never mutates the collection except through the store.
//! - Every handler is a recovery boundary: failures become notifications.
//!
//! # See also
//! - `crate::store::UserStore`

mod registry_controller;
mod surface;

pub use registry_controller::{
    operator_message, Mode, RegistryController, ADD_LABEL, EMPTY_TABLE_MESSAGE, UPDATE_LABEL,
};
pub use surface::{
    FormSurface, NoticeLevel, PasswordVisibility, PromptSurface, RegistryView, TableSurface,
    UserRow,
};
