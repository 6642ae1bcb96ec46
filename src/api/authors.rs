//! Author endpoints

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::AppResult,
    models::author::{Author, CreateAuthor},
    AppState,
};

use super::{CatalogReader, JsonBody, StaffUser};

/// List authors
#[utoipa::path(
    get,
    path = "/books/authors/",
    tag = "books",
    responses(
        (status = 200, description = "All authors", body = Vec<Author>)
    )
)]
pub async fn list_authors(
    State(state): State<AppState>,
    _reader: CatalogReader,
) -> AppResult<Json<Vec<Author>>> {
    let authors = state.services.catalog.list_authors().await?;
    Ok(Json(authors))
}

/// Create an author
#[utoipa::path(
    post,
    path = "/books/authors/",
    tag = "books",
    security(("session_cookie" = [])),
    request_body = CreateAuthor,
    responses(
        (status = 201, description = "Author created", body = Author),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 403, description = "Staff session required", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_author(
    State(state): State<AppState>,
    _staff: StaffUser,
    JsonBody(data): JsonBody<CreateAuthor>,
) -> AppResult<(StatusCode, Json<Author>)> {
    let author = state.services.catalog.create_author(data).await?;
    Ok((StatusCode::CREATED, Json(author)))
}
