//! User domain model and field validation.
//!
//! # Responsibility
//! - Define the persisted `User` record and the `UserFields` input shape.
//! - Validate form input before any store mutation.
//!
//! # Invariants
//! - `id` is assigned once by the store and never changes afterwards.
//! - `mobile` is exactly 10 ASCII digits.
//! - `email` has a `local@domain.tld` shape with no whitespace.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));
static MOBILE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{10}$").expect("valid mobile regex"));

/// Stable user identifier, seeded from epoch milliseconds at creation.
///
/// Serialized as a bare JSON number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl UserId {
    pub fn value(self) -> i64 {
        self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for UserId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// One registry entry.
///
/// The password is kept as entered. Callers that need protection at rest
/// must hash or encrypt before handing fields to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub password: String,
}

impl User {
    /// Builds a record from already validated fields.
    pub fn from_fields(id: UserId, fields: UserFields) -> Self {
        Self {
            id,
            name: fields.name,
            email: fields.email,
            mobile: fields.mobile,
            password: fields.password,
        }
    }

    /// Replaces every field except `id`.
    pub fn apply(&mut self, fields: UserFields) {
        self.name = fields.name;
        self.email = fields.email;
        self.mobile = fields.mobile;
        self.password = fields.password;
    }

    /// Returns the editable part of this record.
    pub fn fields(&self) -> UserFields {
        UserFields {
            name: self.name.clone(),
            email: self.email.clone(),
            mobile: self.mobile.clone(),
            password: self.password.clone(),
        }
    }

    /// Search predicate used by list filtering.
    ///
    /// Name and email match case-insensitively, mobile matches literally.
    /// An empty term matches every record.
    pub fn matches(&self, term: &str) -> bool {
        if term.is_empty() {
            return true;
        }
        let needle = term.to_lowercase();
        self.name.to_lowercase().contains(&needle)
            || self.email.to_lowercase().contains(&needle)
            || self.mobile.contains(term)
    }
}

/// Form input for add/update use-cases.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFields {
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub password: String,
}

impl UserFields {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        mobile: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            mobile: mobile.into(),
            password: password.into(),
        }
    }

    /// Returns a copy with surrounding whitespace removed from every field.
    pub fn trimmed(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            mobile: self.mobile.trim().to_string(),
            password: self.password.trim().to_string(),
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Mobile => &self.mobile,
            Field::Password => &self.password,
        }
    }

    /// Checks presence first (in form order), then email and mobile shape.
    pub fn validate(&self) -> Result<(), UserValidationError> {
        if let Some(field) = Field::ALL
            .into_iter()
            .find(|field| self.get(*field).is_empty())
        {
            return Err(UserValidationError::MissingField(field));
        }
        if !is_valid_email(&self.email) {
            return Err(UserValidationError::InvalidEmail);
        }
        if !is_valid_mobile(&self.mobile) {
            return Err(UserValidationError::InvalidMobile);
        }
        Ok(())
    }
}

/// Editable user field, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Email,
    Mobile,
    Password,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Name, Field::Email, Field::Mobile, Field::Password];

    pub fn label(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Mobile => "mobile",
            Field::Password => "password",
        }
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Field shape violation detected before a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserValidationError {
    MissingField(Field),
    InvalidEmail,
    InvalidMobile,
}

impl UserValidationError {
    /// The field that failed validation.
    pub fn field(&self) -> Field {
        match self {
            Self::MissingField(field) => *field,
            Self::InvalidEmail => Field::Email,
            Self::InvalidMobile => Field::Mobile,
        }
    }
}

impl Display for UserValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "{field} is required"),
            Self::InvalidEmail => write!(f, "email must look like local@domain.tld"),
            Self::InvalidMobile => write!(f, "mobile must be exactly 10 digits"),
        }
    }
}

impl Error for UserValidationError {}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

pub fn is_valid_mobile(value: &str) -> bool {
    MOBILE_RE.is_match(value)
}

#[cfg(test)]
mod tests {
    use super::{is_valid_email, is_valid_mobile};

    #[test]
    fn email_shape_requires_at_and_dot_in_domain() {
        assert!(is_valid_email("alice@x.com"));
        assert!(is_valid_email("a.b+c@mail.example.org"));
        assert!(!is_valid_email("alice.x.com"));
        assert!(!is_valid_email("alice@localhost"));
        assert!(!is_valid_email("al ice@x.com"));
        assert!(!is_valid_email("a@@x.com"));
    }

    #[test]
    fn mobile_shape_is_exactly_ten_ascii_digits() {
        assert!(is_valid_mobile("9876543210"));
        assert!(!is_valid_mobile("987654321"));
        assert!(!is_valid_mobile("98765432101"));
        assert!(!is_valid_mobile("98765o3210"));
        assert!(!is_valid_mobile("٩٨٧٦٥٤٣٢١٠"));
    }
}
