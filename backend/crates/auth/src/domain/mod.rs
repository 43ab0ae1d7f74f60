//! Domain Layer
//!
//! Contains entities, value objects, and repository traits.

pub mod entity;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::user::{NewUser, User, UserCredentials};
pub use repository::UserRepository;
pub use value_object::{claims::Claims, user_name::UserName, user_role::UserRole};
