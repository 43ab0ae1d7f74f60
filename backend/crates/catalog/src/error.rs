//! Catalog Error Types
//!
//! Catalog-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind, repo::RepoError};
use thiserror::Error;

use crate::domain::value_objects::ItemNameError;

/// Catalog-specific result type alias
pub type CatalogResult<T> = Result<T, CatalogError>;

#[derive(Debug, Error)]
pub enum CatalogError {
    /// Rejected input (item name shape, malformed id)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// No item with this id in the current snapshot
    #[error("Item {0} not found")]
    NotFound(i64),

    #[error(transparent)]
    Repo(#[from] RepoError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ItemNameError> for CatalogError {
    fn from(err: ItemNameError) -> Self {
        CatalogError::Validation(err.to_string())
    }
}

impl CatalogError {
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            CatalogError::Validation(_) => ErrorKind::BadRequest,
            CatalogError::NotFound(_) => ErrorKind::NotFound,
            CatalogError::Repo(e) => e.kind(),
            CatalogError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    fn log(&self) {
        match self {
            CatalogError::Repo(RepoError::Backend(e)) => {
                tracing::error!(error = %e, "Catalog database error");
            }
            CatalogError::Internal(msg) => {
                tracing::error!(message = %msg, "Catalog internal error");
            }
            _ => {
                tracing::debug!(error = %self, "Catalog error");
            }
        }
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Repo(RepoError::NotFound) => AppError::not_found("Item not found"),
            CatalogError::Repo(e) => e.into(),
            CatalogError::Internal(_) => AppError::internal("Internal Server Error"),
            other => AppError::new(other.kind(), other.to_string()),
        }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        self.log();
        AppError::from(self).into_response()
    }
}
