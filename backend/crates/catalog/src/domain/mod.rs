//! Domain Layer
//!
//! Contains entities, value objects, and the repository trait.

pub mod entities;
pub mod repository;
pub mod value_objects;

// Re-exports
pub use entities::Item;
pub use repository::ItemRepository;
pub use value_objects::{ItemName, ItemNameError};
