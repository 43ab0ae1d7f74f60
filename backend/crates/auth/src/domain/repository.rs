//! Repository Traits
//!
//! Interfaces for user persistence. Implementation is in infrastructure layer.

use kernel::error::repo::RepoResult;

use crate::domain::entity::user::{NewUser, UserCredentials};
use crate::domain::value_object::user_name::UserName;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Insert a user and return the assigned id.
    ///
    /// Must fail with `RepoError::Conflict` when the user name is taken.
    async fn insert(&self, user: &NewUser) -> RepoResult<i64>;

    /// Find a user (with hash) by exact user name
    async fn find_by_username(&self, username: &UserName) -> RepoResult<Option<UserCredentials>>;
}
