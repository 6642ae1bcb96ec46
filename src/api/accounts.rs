//! Account endpoints: registration and session login/logout

use std::convert::Infallible;

use axum::{
    async_trait,
    extract::{FromRequest, Request, State},
    http::{header, StatusCode},
    Form, Json,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::user::{LoginRequest, RegisterUser, User},
    AppState,
};

use super::{removal_cookie, session_cookie, CurrentUser, JsonBody, MaybeSession};

#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: &str) -> Json<Self> {
        Json(Self {
            message: message.to_string(),
        })
    }
}

/// Login credentials from a JSON or urlencoded form body.
///
/// An absent or unreadable body yields blank credentials.
pub struct Credentials(pub LoginRequest);

#[async_trait]
impl<S> FromRequest<S> for Credentials
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("application/x-www-form-urlencoded"));

        let request = if is_form {
            Form::<LoginRequest>::from_request(req, state)
                .await
                .map(|Form(request)| request)
                .ok()
        } else {
            Json::<LoginRequest>::from_request(req, state)
                .await
                .map(|Json(request)| request)
                .ok()
        };

        Ok(Credentials(request.unwrap_or_default()))
    }
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/accounts/register",
    tag = "accounts",
    request_body = RegisterUser,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse)
    )
)]
pub async fn register(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<RegisterUser>,
) -> AppResult<(StatusCode, Json<User>)> {
    let user = state.services.accounts.register(payload).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Log in and receive a session cookie
#[utoipa::path(
    post,
    path = "/accounts/login",
    tag = "accounts",
    request_body(
        content = LoginRequest,
        description = "JSON or application/x-www-form-urlencoded"
    ),
    responses(
        (status = 200, description = "Logged in, session cookie set", body = MessageResponse),
        (status = 401, description = "Authentication failed", body = crate::error::ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    MaybeSession(previous): MaybeSession,
    jar: CookieJar,
    Credentials(request): Credentials,
) -> AppResult<(CookieJar, Json<MessageResponse>)> {
    let (_user, key) = state
        .services
        .accounts
        .login(&request, previous.as_ref())
        .await?;

    let jar = jar.add(session_cookie(&state.config.session, key));
    Ok((jar, MessageResponse::new("User logged in successfully")))
}

/// Log out (GET or POST)
#[utoipa::path(
    post,
    path = "/accounts/logout",
    tag = "accounts",
    security(("session_cookie" = [])),
    responses(
        (status = 200, description = "Logged out", body = MessageResponse),
        (status = 403, description = "No active session", body = crate::error::ErrorResponse)
    )
)]
pub async fn logout(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
    jar: CookieJar,
) -> AppResult<(CookieJar, Json<MessageResponse>)> {
    state.services.accounts.logout(&session).await?;

    let jar = jar.remove(removal_cookie(&state.config.session));
    Ok((jar, MessageResponse::new("User logged out successfully")))
}

/// Current user
#[utoipa::path(
    get,
    path = "/accounts/me",
    tag = "accounts",
    security(("session_cookie" = [])),
    responses(
        (status = 200, description = "Logged-in user", body = User),
        (status = 403, description = "No active session", body = crate::error::ErrorResponse)
    )
)]
pub async fn me(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
) -> AppResult<Json<User>> {
    let user = state.services.accounts.current_user(&session).await?;
    Ok(Json(user))
}
