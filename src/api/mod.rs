//! API handlers for Bookshelf REST endpoints
//!
//! Access rules are declared by the extractor each handler takes:
//!
//! | extractor       | who gets through                                         |
//! |-----------------|----------------------------------------------------------|
//! | none            | everyone                                                 |
//! | `CatalogReader` | everyone, or only sessions when `catalog.public_read` is off |
//! | `CurrentUser`   | callers with a live session                              |
//! | `StaffUser`     | callers whose session belongs to a staff user            |
//!
//! Missing sessions and missing rights both answer 403.

pub mod accounts;
pub mod authors;
pub mod books;
pub mod genres;
pub mod health;
pub mod openapi;

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::de::DeserializeOwned;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    config::SessionConfig,
    error::{AppError, AppResult},
    models::session::Session,
    AppState,
};

/// Session of the caller, if any
pub struct MaybeSession(pub Option<Session>);

/// Caller with a live session
pub struct CurrentUser(pub Session);

/// Caller whose session belongs to a staff user
pub struct StaffUser(pub Session);

/// Caller allowed to read the catalog under `catalog.public_read`
pub struct CatalogReader(pub Option<Session>);

async fn resolve_session(parts: &Parts, state: &AppState) -> AppResult<Option<Session>> {
    let jar = CookieJar::from_headers(&parts.headers);
    match jar.get(&state.config.session.cookie_name) {
        Some(cookie) => state.services.sessions.resolve(cookie.value()).await,
        None => Ok(None),
    }
}

#[async_trait]
impl FromRequestParts<AppState> for MaybeSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(MaybeSession(resolve_session(parts, state).await?))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        resolve_session(parts, state)
            .await?
            .map(CurrentUser)
            .ok_or_else(AppError::not_authenticated)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for StaffUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let session = resolve_session(parts, state)
            .await?
            .ok_or_else(AppError::not_authenticated)?;

        if !session.is_staff() {
            return Err(AppError::permission_denied());
        }

        Ok(StaffUser(session))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CatalogReader {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let session = resolve_session(parts, state).await?;
        if session.is_none() && !state.config.catalog.public_read {
            return Err(AppError::not_authenticated());
        }
        Ok(CatalogReader(session))
    }
}

/// JSON body whose rejections are reported as 400 validation errors
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::validation(rejection.body_text()))?;
        Ok(JsonBody(value))
    }
}

/// Path parameters; anything that does not parse names no resource and
/// answers 404
pub struct PathId<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for PathId<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                tracing::debug!(path = %parts.uri.path(), "Unparseable path: {}", rejection.body_text());
                AppError::NotFound("Not found.".to_string())
            })?;
        Ok(PathId(value))
    }
}

/// Cookie carrying a freshly issued session key
pub fn session_cookie(config: &SessionConfig, key: String) -> Cookie<'static> {
    let max_age = i64::try_from(config.ttl_seconds).unwrap_or(i64::MAX);
    Cookie::build((config.cookie_name.clone(), key))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.secure_cookie)
        .max_age(time::Duration::seconds(max_age))
        .build()
}

/// Cookie that clears the session key in the client
pub fn removal_cookie(config: &SessionConfig) -> Cookie<'static> {
    Cookie::build((config.cookie_name.clone(), "")).path("/").build()
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let routes = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Accounts
        .route("/accounts/register", post(accounts::register))
        .route("/accounts/login", post(accounts::login))
        .route("/accounts/logout", get(accounts::logout).post(accounts::logout))
        .route("/accounts/me", get(accounts::me))
        // Books
        .route("/books/create/", post(books::create_book))
        .route("/books/list/", get(books::list_books))
        .route(
            "/books/detail/:id/",
            get(books::get_book)
                .put(books::update_book)
                .delete(books::delete_book),
        )
        .route("/books/genre/:genre_id/", get(books::list_books_by_genre))
        // Reference data
        .route(
            "/books/authors/",
            get(authors::list_authors).post(authors::create_author),
        )
        .route(
            "/books/genres/",
            get(genres::list_genres).post(genres::create_genre),
        )
        .with_state(state);

    Router::new()
        .merge(routes)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
