//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{accounts, authors, books, genres, health};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bookshelf API",
        version = "0.1.0",
        description = "Book catalog with session-based accounts"
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Accounts
        accounts::register,
        accounts::login,
        accounts::logout,
        accounts::me,
        // Books
        books::create_book,
        books::list_books,
        books::get_book,
        books::update_book,
        books::delete_book,
        books::list_books_by_genre,
        authors::list_authors,
        authors::create_author,
        genres::list_genres,
        genres::create_genre,
    ),
    components(
        schemas(
            accounts::MessageResponse,
            crate::models::user::User,
            crate::models::user::RegisterUser,
            crate::models::user::LoginRequest,
            crate::models::book::Book,
            crate::models::book::BookType,
            crate::models::book::BookPayload,
            crate::models::author::Author,
            crate::models::author::CreateAuthor,
            crate::models::genre::Genre,
            crate::models::genre::CreateGenre,
            health::HealthResponse,
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SessionCookieAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "accounts", description = "Registration and sessions"),
        (name = "books", description = "Book catalog")
    )
)]
pub struct ApiDoc;

struct SessionCookieAddon;

impl Modify for SessionCookieAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session_cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new("sessionid"))),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
