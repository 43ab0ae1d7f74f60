//! Shared Kernel
//!
//! Vocabulary used by every domain crate of the catalog service:
//! - [`error::kind::ErrorKind`] and [`error::app_error::AppError`] for the HTTP edge
//! - [`error::repo::RepoError`] for faults coming back from the durable store
//!
//! Only things with one meaning across all domains belong here.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
    #[cfg(feature = "sqlx")]
    pub mod repo;
}
