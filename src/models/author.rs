//! Author model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Author record; names are free text and not unique
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Author {
    pub id: i32,
    pub name: String,
}

/// Create author request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAuthor {
    #[serde(default, deserialize_with = "crate::models::trimmed")]
    #[validate(length(min = 1, max = 100, message = "Name is required and must be at most 100 characters."))]
    pub name: String,
}
