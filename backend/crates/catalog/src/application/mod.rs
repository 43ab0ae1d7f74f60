//! Application Layer
//!
//! The item cache and its configuration.

pub mod config;
pub mod item_cache;

// Re-exports
pub use config::{CatalogConfig, ReloadPolicy};
pub use item_cache::{CacheState, ItemCache};
