//! Blog Error Types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Blog-specific result type alias
pub type BlogResult<T> = Result<T, BlogError>;

#[derive(Debug, Error)]
pub enum BlogError {
    /// No post with the requested id
    #[error("Post not found")]
    PostNotFound,

    /// Caller is neither the post author nor an admin
    #[error("Not the post author")]
    NotOwner,

    /// Handler reached without a verified identity
    #[error("Authentication required")]
    Unauthenticated,

    /// Invalid post input (title, content, pagination)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl BlogError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            BlogError::PostNotFound => StatusCode::NOT_FOUND,
            BlogError::NotOwner => StatusCode::FORBIDDEN,
            BlogError::Unauthenticated => StatusCode::UNAUTHORIZED,
            BlogError::Validation(_) => StatusCode::BAD_REQUEST,
            BlogError::Database(_) | BlogError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            BlogError::PostNotFound => ErrorKind::NotFound,
            BlogError::NotOwner => ErrorKind::Forbidden,
            BlogError::Unauthenticated => ErrorKind::Unauthorized,
            BlogError::Validation(_) => ErrorKind::BadRequest,
            BlogError::Database(_) | BlogError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string())
    }

    fn log(&self) {
        match self {
            BlogError::Database(e) => {
                tracing::error!(error = %e, "Blog database error");
            }
            BlogError::Internal(msg) => {
                tracing::error!(message = %msg, "Blog internal error");
            }
            _ => {
                tracing::debug!(error = %self, "Blog error");
            }
        }
    }
}

impl IntoResponse for BlogError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}
