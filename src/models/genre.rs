//! Genre model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Genre {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
}

/// Create genre request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateGenre {
    #[serde(default, deserialize_with = "crate::models::trimmed")]
    #[validate(length(min = 1, max = 50, message = "Name is required and must be at most 50 characters."))]
    pub name: String,
    pub description: Option<String>,
}
