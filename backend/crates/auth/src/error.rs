//! Auth Error Types
//!
//! Auth-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind, repo::RepoError};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Message shared by every credential failure so that clients cannot tell
/// an unknown user from a wrong password.
const UNAUTHORIZED_MESSAGE: &str = "Invalid username or password";

#[derive(Debug, Error)]
pub enum AuthError {
    /// Malformed input (user name or password shape)
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("User name already exists")]
    DuplicateUser,

    #[error("User not found")]
    UserNotFound,

    /// Password does not match the stored hash
    #[error("Invalid credentials")]
    BadCredentials,

    /// Bad signature, unexpected algorithm, malformed or expired token
    #[error("Invalid session token")]
    InvalidToken,

    /// No token presented on a protected route
    #[error("Missing session token")]
    MissingToken,

    #[error("Token signing failed: {0}")]
    SigningError(String),

    /// Startup-time configuration fault
    #[error("Invalid auth configuration: {0}")]
    Configuration(String),

    #[error(transparent)]
    Repo(#[from] RepoError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Validation(_) => ErrorKind::BadRequest,
            AuthError::DuplicateUser => ErrorKind::Conflict,
            AuthError::UserNotFound
            | AuthError::BadCredentials
            | AuthError::InvalidToken
            | AuthError::MissingToken => ErrorKind::Unauthorized,
            AuthError::SigningError(_)
            | AuthError::Configuration(_)
            | AuthError::Internal(_) => ErrorKind::InternalServerError,
            AuthError::Repo(e) => e.kind(),
        }
    }

    /// Client-facing error. Credential failures collapse into one message.
    pub fn to_app_error(&self) -> AppError {
        match self {
            AuthError::UserNotFound | AuthError::BadCredentials => {
                AppError::unauthorized(UNAUTHORIZED_MESSAGE)
            }
            AuthError::Repo(_)
            | AuthError::SigningError(_)
            | AuthError::Configuration(_)
            | AuthError::Internal(_) => AppError::new(self.kind(), self.kind().as_str()),
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    fn log(&self) {
        match self {
            AuthError::Repo(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::SigningError(msg) | AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::Configuration(msg) => {
                tracing::error!(message = %msg, "Auth configuration error");
            }
            AuthError::UserNotFound | AuthError::BadCredentials => {
                tracing::warn!(error = %self, "Rejected login attempt");
            }
            AuthError::InvalidToken => {
                tracing::warn!("Rejected session token");
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
