//! Data models for Bookshelf

pub mod author;
pub mod book;
pub mod genre;
pub mod session;
pub mod user;

use serde::{Deserialize, Deserializer};

// Re-export commonly used types
pub use author::Author;
pub use book::{Book, BookPayload, BookType};
pub use genre::Genre;
pub use session::{Session, SessionData};
pub use user::User;

/// Deserialize a string with surrounding whitespace removed, so a blank
/// value fails the `length(min = 1)` rules
pub(crate) fn trimmed<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    Ok(value.trim().to_string())
}
