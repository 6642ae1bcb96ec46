//! User model and related types

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationError, ValidationErrors};

pub const USERNAME_MAX_LEN: usize = 150;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\w.@+-]+$").expect("username pattern is valid"));

/// Full user model from database
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct User {
    pub id: i32,
    pub username: String,
    /// Hashed password (argon2)
    #[serde(skip_serializing)]
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Grants catalog administration
    pub is_staff: bool,
    #[serde(skip_serializing)]
    pub is_active: bool,
    pub date_joined: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

/// Registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterUser {
    #[serde(default, deserialize_with = "crate::models::trimmed")]
    #[validate(length(min = 1, message = "This field is required."))]
    pub username: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "This field is required."))]
    pub password: String,
    #[serde(default, deserialize_with = "crate::models::trimmed")]
    #[validate(length(max = 150, message = "Ensure this field has no more than 150 characters."))]
    pub first_name: String,
    #[serde(default, deserialize_with = "crate::models::trimmed")]
    #[validate(length(max = 150, message = "Ensure this field has no more than 150 characters."))]
    pub last_name: String,
    /// Optional; an empty string counts as absent
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(email(message = "Enter a valid email address."))]
    pub email: Option<String>,
}

impl RegisterUser {
    /// Field validation, independent of what is already stored
    pub fn check(&self) -> Result<(), ValidationErrors> {
        let mut errors = match self.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };

        if !self.username.is_empty() {
            if self.username.chars().count() > USERNAME_MAX_LEN {
                errors.add(
                    "username",
                    message(
                        "length",
                        "Ensure this field has no more than 150 characters.",
                    ),
                );
            } else if !USERNAME_RE.is_match(&self.username) {
                errors.add(
                    "username",
                    message(
                        "invalid",
                        "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
                    ),
                );
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Login request
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Values written when a user row is inserted
#[derive(Debug)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub password_hash: String,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub is_staff: bool,
}

fn message(code: &'static str, text: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(text.into());
    error
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}
