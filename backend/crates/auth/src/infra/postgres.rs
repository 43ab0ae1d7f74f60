//! PostgreSQL Repository Implementations

use kernel::error::repo::{RepoError, RepoResult};
use platform::database::Database;
use platform::password::HashedPassword;
use sqlx::PgPool;

use crate::domain::entity::user::{NewUser, User, UserCredentials};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{user_name::UserName, user_role::UserRole};

/// PostgreSQL-backed user repository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            pool: db.pool().clone(),
        }
    }
}

impl UserRepository for PgUserRepository {
    async fn insert(&self, user: &NewUser) -> RepoResult<i64> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO users (username, password_hash, role)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(user.username.as_str())
        .bind(user.password_hash.as_phc_string())
        .bind(user.role.code())
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn find_by_username(&self, username: &UserName) -> RepoResult<Option<UserCredentials>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, password_hash, role
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRow::into_credentials).transpose()
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    password_hash: String,
    role: String,
}

impl UserRow {
    fn into_credentials(self) -> RepoResult<UserCredentials> {
        let corrupt = |what: String| RepoError::Backend(sqlx::Error::Decode(what.into()));

        let username = UserName::new(&self.username)
            .map_err(|e| corrupt(format!("Invalid username in row {}: {}", self.id, e)))?;
        let role = self
            .role
            .parse::<UserRole>()
            .map_err(|e| corrupt(format!("Invalid role in row {}: {}", self.id, e)))?;
        let password_hash = HashedPassword::from_phc_string(self.password_hash)
            .map_err(|e| corrupt(format!("Invalid password hash in row {}: {}", self.id, e)))?;

        Ok(UserCredentials {
            user: User {
                id: self.id,
                username,
                role,
            },
            password_hash,
        })
    }
}
