//! Genre endpoints

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::AppResult,
    models::genre::{CreateGenre, Genre},
    AppState,
};

use super::{CatalogReader, JsonBody, StaffUser};

/// List genres
#[utoipa::path(
    get,
    path = "/books/genres/",
    tag = "books",
    responses(
        (status = 200, description = "All genres", body = Vec<Genre>)
    )
)]
pub async fn list_genres(
    State(state): State<AppState>,
    _reader: CatalogReader,
) -> AppResult<Json<Vec<Genre>>> {
    let genres = state.services.catalog.list_genres().await?;
    Ok(Json(genres))
}

/// Create a genre
#[utoipa::path(
    post,
    path = "/books/genres/",
    tag = "books",
    security(("session_cookie" = [])),
    request_body = CreateGenre,
    responses(
        (status = 201, description = "Genre created", body = Genre),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 403, description = "Staff session required", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_genre(
    State(state): State<AppState>,
    _staff: StaffUser,
    JsonBody(data): JsonBody<CreateGenre>,
) -> AppResult<(StatusCode, Json<Genre>)> {
    let genre = state.services.catalog.create_genre(data).await?;
    Ok((StatusCode::CREATED, Json(genre)))
}
