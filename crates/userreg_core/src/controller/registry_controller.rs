//! Two-state registry controller.
//!
//! # Invariants
//! - `Mode::Create` is the initial state.
//! - `Create -> Update(id)` only on a successful edit lookup.
//! - `Update(id) -> Create` on successful update, form clear, or when `id`
//!   turns out to be stale.
//! - Every re-render shows the filtered count, never the total.

use super::surface::{NoticeLevel, PasswordVisibility, RegistryView, UserRow};
use crate::kv::BlobStore;
use crate::model::user::{UserFields, UserId, UserValidationError};
use crate::store::{Clock, StoreError, SystemClock, UserStore};
use log::{debug, warn};

pub const ADD_LABEL: &str = "Add User";
pub const UPDATE_LABEL: &str = "Update User";
pub const EMPTY_TABLE_MESSAGE: &str = "No users found";

const DELETE_PROMPT: &str = "Are you sure you want to delete this user?";

/// Dispatch target of the submit action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Create,
    Update(UserId),
}

/// Translates operator actions into store calls and re-renders the view.
pub struct RegistryController<S, V, C = SystemClock> {
    store: UserStore<S, C>,
    view: V,
    mode: Mode,
    search: String,
    password_visibility: PasswordVisibility,
}

impl<S, V, C> RegistryController<S, V, C>
where
    S: BlobStore,
    V: RegistryView,
    C: Clock,
{
    pub fn new(store: UserStore<S, C>, view: V) -> Self {
        Self {
            store,
            view,
            mode: Mode::Create,
            search: String::new(),
            password_visibility: PasswordVisibility::Masked,
        }
    }

    /// Loads persisted users and renders the initial table.
    pub fn init(&mut self) {
        self.store.load();
        self.enter_create_mode();
        self.view
            .set_password_visibility(self.password_visibility);
        self.render();
    }

    /// Re-reads storage written by another session and re-renders.
    ///
    /// Mode and form are kept; a vanished edit target is reported on submit.
    pub fn reload(&mut self) {
        let count = self.store.load();
        debug!("event=reload module=controller status=ok count={count}");
        self.render();
    }

    /// Adds or updates depending on the current mode.
    pub fn submit(&mut self) {
        let fields = self.view.read_fields().trimmed();
        match self.mode {
            Mode::Create => self.submit_create(fields),
            Mode::Update(id) => self.submit_update(id, fields),
        }
    }

    /// Loads user `id` into the form and switches to update mode.
    pub fn edit(&mut self, id: UserId) {
        let fields = match self.store.get(id) {
            Ok(user) => user.fields(),
            Err(err) => {
                self.report_failure("edit", &err);
                return;
            }
        };

        self.view.fill_fields(&fields);
        self.mode = Mode::Update(id);
        self.view.set_submit_label(UPDATE_LABEL);
        debug!("event=mode_change module=controller mode=update user_id={id}");
    }

    /// Removes user `id` after operator confirmation.
    pub fn delete(&mut self, id: UserId) {
        if !self.view.confirm(DELETE_PROMPT) {
            debug!("event=user_delete module=controller status=cancelled user_id={id}");
            return;
        }

        match self.store.remove(id) {
            Ok(()) => {
                if self.mode == Mode::Update(id) {
                    self.reset_form();
                }
                self.render();
                self.view
                    .notify(NoticeLevel::Info, "User deleted successfully!");
            }
            Err(err) => self.report_failure("delete", &err),
        }
    }

    /// Re-renders the table filtered by `term`.
    pub fn search(&mut self, term: &str) {
        self.search = term.to_string();
        self.render();
    }

    /// Empties the form and returns to create mode.
    pub fn clear_form(&mut self) {
        self.reset_form();
    }

    pub fn toggle_password_visibility(&mut self) {
        self.password_visibility = self.password_visibility.toggled();
        self.view
            .set_password_visibility(self.password_visibility);
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn search_term(&self) -> &str {
        &self.search
    }

    pub fn password_visibility(&self) -> PasswordVisibility {
        self.password_visibility
    }

    pub fn store(&self) -> &UserStore<S, C> {
        &self.store
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn into_parts(self) -> (UserStore<S, C>, V) {
        (self.store, self.view)
    }

    fn submit_create(&mut self, fields: UserFields) {
        match self.store.add(fields) {
            Ok(_) => {
                self.render();
                self.reset_form();
                self.view
                    .notify(NoticeLevel::Info, "User added successfully!");
            }
            Err(err) => self.report_failure("add", &err),
        }
    }

    fn submit_update(&mut self, id: UserId, fields: UserFields) {
        match self.store.update(id, fields) {
            Ok(_) => {
                self.render();
                self.reset_form();
                self.view
                    .notify(NoticeLevel::Info, "User updated successfully!");
            }
            Err(err @ StoreError::NotFound(_)) => {
                self.reset_form();
                self.render();
                self.report_failure("update", &err);
            }
            Err(err) => self.report_failure("update", &err),
        }
    }

    fn render(&mut self) {
        let rows = self
            .store
            .query(&self.search)
            .enumerate()
            .map(|(index, user)| UserRow::new(index + 1, user))
            .collect::<Vec<_>>();

        if rows.is_empty() {
            self.view.render_empty(EMPTY_TABLE_MESSAGE);
        } else {
            self.view.render_rows(&rows);
        }
        self.view.set_count_label(rows.len());
    }

    fn reset_form(&mut self) {
        self.view.clear_fields();
        self.view.focus_first_field();
        self.enter_create_mode();
    }

    fn enter_create_mode(&mut self) {
        if let Mode::Update(id) = self.mode {
            debug!("event=mode_change module=controller mode=create previous_user_id={id}");
        }
        self.mode = Mode::Create;
        self.view.set_submit_label(ADD_LABEL);
    }

    fn report_failure(&mut self, action: &str, err: &StoreError) {
        warn!(
            "event=user_{action} module=controller status=error error_kind={}",
            error_kind(err)
        );
        self.view.notify(NoticeLevel::Error, &operator_message(err));
    }
}

fn error_kind(err: &StoreError) -> &'static str {
    match err {
        StoreError::Validation(_) => "validation",
        StoreError::NotFound(_) => "not_found",
        StoreError::Storage(_) => "storage",
        StoreError::Serialization(_) => "serialization",
        StoreError::Corrupt(_) => "corrupt",
    }
}

/// Operator-facing text for a failed action.
pub fn operator_message(err: &StoreError) -> String {
    match err {
        StoreError::Validation(UserValidationError::MissingField(_)) => {
            "Please fill all fields".to_string()
        }
        StoreError::Validation(UserValidationError::InvalidEmail) => {
            "Please enter a valid email".to_string()
        }
        StoreError::Validation(UserValidationError::InvalidMobile) => {
            "Please enter a valid 10-digit mobile number".to_string()
        }
        StoreError::NotFound(id) => format!("User {id} no longer exists"),
        other => format!("Operation failed: {other}"),
    }
}
