//! Book model and related types

use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::ToSchema;
use validator::Validate;

/// Kind of publication
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BookType {
    Book,
    Magazine,
    Comic,
    #[default]
    Other,
}

impl BookType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookType::Book => "book",
            BookType::Magazine => "magazine",
            BookType::Comic => "comic",
            BookType::Other => "other",
        }
    }
}

impl std::fmt::Display for BookType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BookType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "book" => Ok(BookType::Book),
            "magazine" => Ok(BookType::Magazine),
            "comic" => Ok(BookType::Comic),
            "other" => Ok(BookType::Other),
            _ => Err(format!("Invalid book type: {}", s)),
        }
    }
}

// Stored as VARCHAR
impl sqlx::Type<Postgres> for BookType {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<Postgres>>::compatible(ty)
    }
}

impl<'r> Decode<'r, Postgres> for BookType {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: &str = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for BookType {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <&str as Encode<Postgres>>::encode(self.as_str(), buf)
    }
}

/// Book as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub book_type: BookType,
    pub volume: i32,
    pub year: Option<i32>,
    pub description: Option<String>,
    /// Genre ids, ascending
    pub genres: Vec<i32>,
    /// Author ids, ascending
    pub authors: Vec<i32>,
    /// Owning user id
    #[sqlx(rename = "owner_id")]
    pub owner: i32,
}

/// Create or full-replace request for a book
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct BookPayload {
    #[serde(default, deserialize_with = "crate::models::trimmed")]
    #[validate(length(min = 1, max = 100, message = "Title is required and must be at most 100 characters."))]
    pub title: String,
    #[serde(rename = "type", default)]
    pub book_type: BookType,
    #[validate(
        required(message = "This field is required."),
        range(min = 0, message = "Ensure this value is greater than or equal to 0.")
    )]
    pub volume: Option<i32>,
    #[validate(range(min = 0, message = "Ensure this value is greater than or equal to 0."))]
    pub year: Option<i32>,
    pub description: Option<String>,
    #[serde(default)]
    pub genres: Vec<i32>,
    #[serde(default)]
    pub authors: Vec<i32>,
    /// Explicit owner; defaults to the acting user on create
    /// and to the current owner on update
    pub owner: Option<i32>,
}

/// Checked values ready to be written
#[derive(Debug, Clone)]
pub struct BookRecord {
    pub title: String,
    pub book_type: BookType,
    pub volume: i32,
    pub year: Option<i32>,
    pub description: Option<String>,
    pub genres: Vec<i32>,
    pub authors: Vec<i32>,
    pub owner: i32,
}

impl BookPayload {
    /// Sorted, de-duplicated author and genre ids
    pub fn normalized_ids(&self) -> (Vec<i32>, Vec<i32>) {
        let mut authors = self.authors.clone();
        authors.sort_unstable();
        authors.dedup();
        let mut genres = self.genres.clone();
        genres.sort_unstable();
        genres.dedup();
        (authors, genres)
    }
}
