//! User domain model

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Audience bucket chosen at sign-up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserCategory {
    Student,
    Employed,
}

impl Default for UserCategory {
    fn default() -> Self {
        Self::Student
    }
}

impl UserCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserCategory::Student => "student",
            UserCategory::Employed => "employed",
        }
    }

    /// Parse a category, falling back to `student` for unknown values
    pub fn parse_or_default(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "employed" => UserCategory::Employed,
            _ => UserCategory::Student,
        }
    }
}

/// A registered user account
///
/// The password is stored in plaintext. There is no credential security in
/// this system; the whole auth flow is a client-side simulation and the
/// stored record reflects that.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    /// Display name, kept in sync as "first last" on every name change
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub category: UserCategory,
    /// URL or data URI
    #[serde(default)]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with required fields
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        category: UserCategory,
    ) -> Self {
        let first_name = first_name.into();
        let last_name = last_name.into();
        let name = format!("{} {}", first_name, last_name).trim().to_string();
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            first_name,
            last_name,
            name,
            email: email.into(),
            password: password.into(),
            category,
            profile_image: None,
            phone: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Recompute the display name from the name parts
    pub fn sync_name(&mut self) {
        self.name = format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string();
    }

    /// Validate the full record (sign-up rules)
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();

        if let Some(e) = validate_name_part("firstName", "First name", &self.first_name) {
            errors.push(e);
        }
        if let Some(e) = validate_name_part("lastName", "Last name", &self.last_name) {
            errors.push(e);
        }
        if let Some(e) = validate_email(&self.email) {
            errors.push(e);
        }
        if let Some(e) = validate_password(&self.password) {
            errors.push(e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// A field-level validation error, recoverable by user correction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn validate_name_part(field: &str, label: &str, value: &str) -> Option<FieldError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Some(FieldError::new(field, format!("{} is required", label)));
    }
    if trimmed.len() < 2 {
        return Some(FieldError::new(
            field,
            format!("{} must be at least 2 characters", label),
        ));
    }
    if trimmed.len() > 25 {
        return Some(FieldError::new(
            field,
            format!("{} must not exceed 25 characters", label),
        ));
    }
    None
}

/// Validate an email address shape
pub fn validate_email(email: &str) -> Option<FieldError> {
    if email.trim().is_empty() {
        return Some(FieldError::new("email", "Email is required"));
    }
    if !email.contains('@') {
        return Some(FieldError::new("email", "Email must contain @ symbol"));
    }
    let re = Regex::new(r"^\S+@\S+\.\S+$").expect("static regex");
    if !re.is_match(email) {
        return Some(FieldError::new("email", "Email is invalid"));
    }
    None
}

/// Validate the password policy: 8-50 chars, at least one uppercase,
/// one lowercase, one digit and one special character
pub fn validate_password(password: &str) -> Option<FieldError> {
    if password.is_empty() {
        return Some(FieldError::new("password", "Password is required"));
    }
    if password.len() < 8 {
        return Some(FieldError::new(
            "password",
            "Password must be at least 8 characters",
        ));
    }
    if password.len() > 50 {
        return Some(FieldError::new(
            "password",
            "Password must not exceed 50 characters",
        ));
    }
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_special = password
        .chars()
        .any(|c| r##"!@#$%^&*()_+-=[]{};':"\|,.<>/?"##.contains(c));
    if !has_upper || !has_lower || !has_digit || !has_special {
        return Some(FieldError::new(
            "password",
            "Password must contain at least 1 uppercase, 1 lowercase, 1 numeric, and 1 special character",
        ));
    }
    None
}
