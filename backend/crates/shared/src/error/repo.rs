//! Repository Error
//!
//! Faults reported by the durable store, shared by every repository
//! implementation so that domain crates classify them the same way.

use thiserror::Error;

use super::app_error::AppError;
use super::kind::ErrorKind;

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Debug, Error)]
pub enum RepoError {
    /// A keyed write matched no row.
    #[error("No matching record")]
    NotFound,

    /// A uniqueness constraint rejected the write.
    #[error("Record already exists")]
    Conflict,

    /// Any other store fault; the cause is kept for logs.
    #[error("Database error: {0}")]
    Backend(#[source] sqlx::Error),
}

impl RepoError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RepoError::NotFound => ErrorKind::NotFound,
            RepoError::Conflict => ErrorKind::Conflict,
            RepoError::Backend(
                sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_),
            ) => ErrorKind::ServiceUnavailable,
            RepoError::Backend(_) => ErrorKind::InternalServerError,
        }
    }

    /// Fail a keyed write that touched nothing.
    pub fn expect_rows(rows_affected: u64) -> RepoResult<()> {
        if rows_affected == 0 {
            Err(RepoError::NotFound)
        } else {
            Ok(())
        }
    }
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => RepoError::NotFound,
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => RepoError::Conflict,
            _ => RepoError::Backend(err),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => AppError::not_found("Record not found"),
            RepoError::Conflict => AppError::conflict("Record already exists"),
            RepoError::Backend(e) => AppError::from(e),
        }
    }
}
