//! Session Claims
//!
//! The payload carried inside a signed session token. Claims only ever exist
//! inside a token; they are never persisted.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entity::user::User;
use crate::domain::value_object::user_role::UserRole;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user name
    pub sub: String,
    pub role: UserRole,
    pub authorized: bool,
    /// Expiry, seconds since the Unix epoch
    pub exp: i64,
}

impl Claims {
    pub fn for_user(user: &User, exp: i64) -> Self {
        Self {
            sub: user.username.to_string(),
            role: user.role,
            authorized: true,
            exp,
        }
    }

    /// Same identity with a new expiry
    pub fn with_expiry(&self, exp: i64) -> Self {
        Self {
            exp,
            ..self.clone()
        }
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.exp, 0)
            .single()
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}
