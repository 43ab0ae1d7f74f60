//! User Entity
//!
//! A registered account. Users are immutable once created; the password
//! hash travels separately in [`UserCredentials`] and never leaves the
//! credential layer.

use platform::password::HashedPassword;

use crate::domain::value_object::{user_name::UserName, user_role::UserRole};

/// Stored user as seen by callers above the credential layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Store-assigned identifier
    pub id: i64,
    /// Unique login name
    pub username: UserName,
    pub role: UserRole,
}

/// A user about to be inserted (no id yet)
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: UserName,
    pub password_hash: HashedPassword,
    pub role: UserRole,
}

impl NewUser {
    /// Registration always creates plain users
    pub fn new(username: UserName, password_hash: HashedPassword) -> Self {
        Self {
            username,
            password_hash,
            role: UserRole::User,
        }
    }
}

/// User row together with its password hash, as read back from the store
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: HashedPassword,
}
