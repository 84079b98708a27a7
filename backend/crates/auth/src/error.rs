//! Auth Error Types
//!
//! Auth-specific error variants integrating with the unified
//! `kernel::AppError` system. Credential failures are deliberately
//! non-specific on the wire: "no such user" and "wrong password" are
//! indistinguishable to the caller.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

use crate::domain::token::TokenError;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown user or wrong password - never reveal which
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Registration with a taken username
    #[error("Username already exists")]
    DuplicateUsername,

    /// Registration with a registered email
    #[error("Email already registered")]
    DuplicateEmail,

    /// Admin lookup or deletion of a user that does not exist
    #[error("User not found")]
    UserNotFound,

    /// Presented token failed validation
    #[error("Invalid token: {0}")]
    Token(#[from] TokenError),

    /// Route requires identity and none was presented
    #[error("Authentication required")]
    Unauthenticated,

    /// Identity present but lacks the required role
    #[error("Insufficient privileges")]
    Forbidden,

    /// Invalid registration input (username, email, password policy)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InvalidCredentials
            | AuthError::Token(_)
            | AuthError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden => StatusCode::FORBIDDEN,
            AuthError::UserNotFound => StatusCode::NOT_FOUND,
            AuthError::DuplicateUsername | AuthError::DuplicateEmail => StatusCode::CONFLICT,
            AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::Database(_) | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::InvalidCredentials
            | AuthError::Token(_)
            | AuthError::Unauthenticated => ErrorKind::Unauthorized,
            AuthError::Forbidden => ErrorKind::Forbidden,
            AuthError::UserNotFound => ErrorKind::NotFound,
            AuthError::DuplicateUsername | AuthError::DuplicateEmail => ErrorKind::Conflict,
            AuthError::Validation(_) => ErrorKind::BadRequest,
            AuthError::Database(_) | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// User-facing message. Token details stay server-side; the client
    /// only learns that authentication failed.
    fn public_message(&self) -> String {
        match self {
            AuthError::Token(_) => "Authentication failed".to_string(),
            other => other.to_string(),
        }
    }

    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.public_message())
    }

    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::Token(e) => {
                tracing::warn!(reason = %e, "Rejected bearer token");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}
