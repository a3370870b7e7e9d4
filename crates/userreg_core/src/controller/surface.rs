//! Front-end surface contracts driven by the controller.

use crate::model::user::{User, UserFields, UserId};

/// Display mode of the password input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PasswordVisibility {
    #[default]
    Masked,
    Plain,
}

impl PasswordVisibility {
    pub fn toggled(self) -> Self {
        match self {
            Self::Masked => Self::Plain,
            Self::Plain => Self::Masked,
        }
    }
}

/// Severity of an operator notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// One visible table row.
///
/// `position` is the 1-based index within the filtered view, not the storage
/// position of the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserRow<'a> {
    pub position: usize,
    pub id: UserId,
    pub name: &'a str,
    pub email: &'a str,
    pub mobile: &'a str,
}

impl<'a> UserRow<'a> {
    pub fn new(position: usize, user: &'a User) -> Self {
        Self {
            position,
            id: user.id,
            name: &user.name,
            email: &user.email,
            mobile: &user.mobile,
        }
    }
}

/// Four-field input form.
pub trait FormSurface {
    /// Returns the raw current values of name, email, mobile and password.
    fn read_fields(&mut self) -> UserFields;
    fn fill_fields(&mut self, fields: &UserFields);
    fn clear_fields(&mut self);
    fn focus_first_field(&mut self);
    fn set_submit_label(&mut self, label: &str);
    /// Switches password display without touching its value.
    fn set_password_visibility(&mut self, visibility: PasswordVisibility);
}

/// Filtered user table plus its count label.
pub trait TableSurface {
    /// Replaces the table body with `rows` (never empty).
    fn render_rows(&mut self, rows: &[UserRow<'_>]);
    /// Replaces the table body with a single placeholder row.
    fn render_empty(&mut self, message: &str);
    fn set_count_label(&mut self, count: usize);
}

/// Blocking operator prompts.
pub trait PromptSurface {
    fn confirm(&mut self, message: &str) -> bool;
    fn notify(&mut self, level: NoticeLevel, message: &str);
}

/// Complete front end for a [`crate::controller::RegistryController`].
pub trait RegistryView: FormSurface + TableSurface + PromptSurface {}

impl<T: FormSurface + TableSurface + PromptSurface> RegistryView for T {}
