//! Catalog Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Items, item names, repository trait
//! - `application/` - The in-memory item cache
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Consistency Model
//! - Reads are served from an immutable snapshot swapped in atomically
//! - Writes go straight to the store under a single write lock
//! - Each accepted write schedules a full reload; readers may briefly see
//!   the previous snapshot

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::{CacheState, CatalogConfig, ItemCache, ReloadPolicy};
pub use domain::{Item, ItemName};
pub use error::{CatalogError, CatalogResult};
pub use infra::postgres::PgItemRepository;
pub use presentation::CatalogAppState;
pub use presentation::router::{catalog_router, catalog_router_generic};

#[cfg(test)]
mod tests;
