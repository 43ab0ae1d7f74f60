//! Credential Store
//!
//! Registration and password authentication.

use std::sync::{Arc, LazyLock};

use kernel::error::repo::RepoError;
use platform::password::{ClearTextPassword, HashedPassword};

use crate::application::config::AuthConfig;
use crate::domain::entity::user::{NewUser, User};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::user_name::UserName;
use crate::error::{AuthError, AuthResult};

/// Checked in place of a stored hash when the user does not exist, so that
/// both login failures cost one Argon2 verification.
static DUMMY_HASH: LazyLock<Option<HashedPassword>> = LazyLock::new(|| {
    ClearTextPassword::new("dummy-password-never-matched")
        .ok()?
        .hash(None)
        .ok()
});

#[cfg(test)]
pub(crate) static DUMMY_VERIFICATIONS: std::sync::atomic::AtomicUsize =
    std::sync::atomic::AtomicUsize::new(0);

pub struct CredentialStore<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<U> CredentialStore<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { user_repo, config }
    }

    /// Create a plain user.
    ///
    /// The existence check and the insert are not atomic; a concurrent
    /// duplicate is caught by the store's unique constraint and reported the
    /// same way.
    pub async fn register(&self, username: &str, password: &str) -> AuthResult<()> {
        let username =
            UserName::new(username).map_err(|e| AuthError::Validation(e.to_string()))?;

        if self.user_repo.find_by_username(&username).await?.is_some() {
            return Err(AuthError::DuplicateUser);
        }

        let password =
            ClearTextPassword::new(password).map_err(|e| AuthError::Validation(e.to_string()))?;
        let password_hash = password
            .hash(self.config.pepper())
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        let id = self
            .user_repo
            .insert(&NewUser::new(username.clone(), password_hash))
            .await
            .map_err(|e| match e {
                RepoError::Conflict => AuthError::DuplicateUser,
                other => AuthError::Repo(other),
            })?;

        tracing::info!(user_id = id, username = %username, "User registered");

        Ok(())
    }

    /// Check a user name and password pair.
    ///
    /// Unknown users and wrong passwords are distinct errors here; the HTTP
    /// layer renders both the same way.
    pub async fn authenticate(&self, username: &str, password: &str) -> AuthResult<User> {
        let Ok(username) = UserName::new(username) else {
            self.verify_dummy(password);
            return Err(AuthError::UserNotFound);
        };

        let Some(credentials) = self.user_repo.find_by_username(&username).await? else {
            self.verify_dummy(password);
            return Err(AuthError::UserNotFound);
        };

        let password = ClearTextPassword::new(password).map_err(|_| AuthError::BadCredentials)?;

        if !credentials
            .password_hash
            .verify(&password, self.config.pepper())
        {
            return Err(AuthError::BadCredentials);
        }

        tracing::info!(user_id = credentials.user.id, "User authenticated");

        Ok(credentials.user)
    }

    /// Spend the same hashing work as a real mismatch
    fn verify_dummy(&self, password: &str) {
        let Ok(password) = ClearTextPassword::new(password) else {
            return;
        };
        if let Some(hash) = DUMMY_HASH.as_ref() {
            let _ = hash.verify(&password, self.config.pepper());

            #[cfg(test)]
            DUMMY_VERIFICATIONS.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        }
    }
}
