//! Application Configuration
//!
//! Configuration for the Catalog application layer.

/// How a reload scheduled by a write is run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReloadPolicy {
    /// Spawn a tokio task and return immediately
    #[default]
    Detached,
    /// Await the reload before the write returns
    Inline,
}

/// Catalog application configuration
#[derive(Debug, Clone, Default)]
pub struct CatalogConfig {
    pub reload_policy: ReloadPolicy,
}

impl CatalogConfig {
    /// Reloads complete before writes return (deterministic tests)
    pub fn inline() -> Self {
        Self {
            reload_policy: ReloadPolicy::Inline,
        }
    }
}
