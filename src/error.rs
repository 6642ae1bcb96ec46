//! Error types for Bookshelf server

use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

/// Machine-readable error codes carried in every error body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Failure = 1,
    NotAuthenticated = 2,
    PermissionDenied = 3,
    NotFound = 4,
    BadValue = 5,
    DbFailure = 6,
    SessionFailure = 7,
}

/// Per-field validation messages, keyed by payload field name
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Authorization failed: {0}")]
    Authorization(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {message}")]
    Validation { message: String, fields: FieldErrors },

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Session store error: {0}")]
    Session(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Validation failure not tied to a single field
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation {
            message: message.into(),
            fields: FieldErrors::new(),
        }
    }

    /// Validation failure on one field
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        let mut fields = FieldErrors::new();
        fields.insert(field.to_string(), vec![message.into()]);
        AppError::Validation {
            message: "Invalid input".to_string(),
            fields,
        }
    }

    /// Validation failure from an accumulated field map; `None` when empty
    pub fn from_fields(fields: FieldErrors) -> Option<Self> {
        if fields.is_empty() {
            None
        } else {
            Some(AppError::Validation {
                message: "Invalid input".to_string(),
                fields,
            })
        }
    }

    pub fn not_authenticated() -> Self {
        AppError::Authorization("Authentication credentials were not provided.".to_string())
    }

    pub fn permission_denied() -> Self {
        AppError::Authorization("You do not have permission to perform this action.".to_string())
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let fields = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let messages = errs
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| e.code.to_string())
                    })
                    .collect();
                (field.to_string(), messages)
            })
            .collect();

        AppError::Validation {
            message: "Invalid input".to_string(),
            fields,
        }
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: FieldErrors,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, fields) = match self {
            AppError::Authentication(msg) => (
                StatusCode::UNAUTHORIZED,
                ErrorCode::NotAuthenticated,
                msg,
                FieldErrors::new(),
            ),
            AppError::Authorization(msg) => (
                StatusCode::FORBIDDEN,
                ErrorCode::PermissionDenied,
                msg,
                FieldErrors::new(),
            ),
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorCode::NotFound,
                msg,
                FieldErrors::new(),
            ),
            AppError::Validation { message, fields } => {
                (StatusCode::BAD_REQUEST, ErrorCode::BadValue, message, fields)
            }
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorCode::BadValue,
                msg,
                FieldErrors::new(),
            ),
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::DbFailure,
                    "Database error".to_string(),
                    FieldErrors::new(),
                )
            }
            AppError::Session(msg) => {
                tracing::error!("Session store error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::SessionFailure,
                    "Session store error".to_string(),
                    FieldErrors::new(),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::Failure,
                    "Internal server error".to_string(),
                    FieldErrors::new(),
                )
            }
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
            fields,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
