//! Book (catalog) endpoints

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::book::{Book, BookPayload},
    AppState,
};

use super::{CatalogReader, JsonBody, PathId, StaffUser};

/// Create a book
#[utoipa::path(
    post,
    path = "/books/create/",
    tag = "books",
    security(("session_cookie" = [])),
    request_body = BookPayload,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 403, description = "Staff session required", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    StaffUser(session): StaffUser,
    JsonBody(payload): JsonBody<BookPayload>,
) -> AppResult<(StatusCode, Json<Book>)> {
    let book = state
        .services
        .catalog
        .create_book(payload, session.user_id())
        .await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// List all books
#[utoipa::path(
    get,
    path = "/books/list/",
    tag = "books",
    responses(
        (status = 200, description = "All books", body = Vec<Book>)
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    _reader: CatalogReader,
) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.catalog.list_books().await?;
    Ok(Json(books))
}

/// Get book details by ID
#[utoipa::path(
    get,
    path = "/books/detail/{id}/",
    tag = "books",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = Book),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    _reader: CatalogReader,
    PathId(id): PathId<i32>,
) -> AppResult<Json<Book>> {
    let book = state.services.catalog.get_book(id).await?;
    Ok(Json(book))
}

/// Replace a book
#[utoipa::path(
    put,
    path = "/books/detail/{id}/",
    tag = "books",
    security(("session_cookie" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    request_body = BookPayload,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse),
        (status = 403, description = "Staff session required", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    _staff: StaffUser,
    PathId(id): PathId<i32>,
    JsonBody(payload): JsonBody<BookPayload>,
) -> AppResult<Json<Book>> {
    let book = state.services.catalog.update_book(id, payload).await?;
    Ok(Json(book))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/detail/{id}/",
    tag = "books",
    security(("session_cookie" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 403, description = "Staff session required", body = crate::error::ErrorResponse),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    _staff: StaffUser,
    PathId(id): PathId<i32>,
) -> AppResult<StatusCode> {
    state.services.catalog.delete_book(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Books in a genre; unknown genres give an empty list
#[utoipa::path(
    get,
    path = "/books/genre/{genre_id}/",
    tag = "books",
    params(("genre_id" = i32, Path, description = "Genre ID")),
    responses(
        (status = 200, description = "Books tagged with the genre", body = Vec<Book>),
        (status = 404, description = "Genre id is not an integer", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_books_by_genre(
    State(state): State<AppState>,
    _reader: CatalogReader,
    PathId(genre_id): PathId<i32>,
) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.catalog.list_books_by_genre(genre_id).await?;
    Ok(Json(books))
}
