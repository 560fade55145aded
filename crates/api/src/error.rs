//! Unified error handling.
//!
//! All route handlers return `Result<T, ApiError>`. The `IntoResponse`
//! implementation maps the taxonomy onto HTTP statuses and makes sure no
//! internal detail reaches the client; store failures are logged and
//! surfaced as a generic failure. Every failure path produces an explicit
//! response.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::StoreError;
use crate::services::{AuthError, CatalogError};

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A request field is missing or invalid.
    #[error("{0}")]
    Validation(String),

    /// The ID or slug does not resolve.
    #[error("not found")]
    NotFound,

    /// Missing, invalid, or expired credentials.
    #[error("authentication required")]
    AuthenticationFailed,

    /// Authenticated, but the role does not allow the operation.
    #[error("insufficient permissions")]
    Forbidden,

    /// The email is already registered.
    #[error("{0}")]
    Conflict(String),

    /// Persistence failed. Opaque to the caller.
    #[error("store failure")]
    Store(#[from] StoreError),

    /// Server-side fault outside the store, e.g. token signing. Opaque to
    /// the caller.
    #[error("internal error")]
    Internal(String),
}

/// Structured JSON error body.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::AuthenticationFailed => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Store(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Don't expose internal error details to clients.
        let message = match &self {
            Self::Store(err) => {
                tracing::error!(error = %err, "store failure");
                "internal error".to_owned()
            }
            Self::Internal(detail) => {
                tracing::error!(detail, "internal error");
                "internal error".to_owned()
            }
            _ => self.to_string(),
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingName | AuthError::InvalidEmail(_) | AuthError::WeakPassword => {
                Self::Validation(err.to_string())
            }
            AuthError::EmailTaken => Self::Conflict(err.to_string()),
            AuthError::InvalidCredentials => Self::AuthenticationFailed,
            // Hashing failure is a server fault, not a client error.
            AuthError::Hash => Self::Internal("password hashing failed".into()),
            AuthError::Store(e) => Self::Store(e),
        }
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::MissingField(_)
            | CatalogError::InvalidField { .. }
            | CatalogError::OversizedImage => Self::Validation(err.to_string()),
            CatalogError::NotFound => Self::NotFound,
            CatalogError::Store(e) => Self::Store(e),
        }
    }
}

/// Result type alias for `ApiError`.
pub type Result<T> = std::result::Result<T, ApiError>;
