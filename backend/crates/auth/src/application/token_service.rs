//! Token Service
//!
//! Issues, verifies and refreshes HS256-signed session tokens in JWT
//! compact form (`header.payload.signature`, base64url segments).

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use crate::application::config::AuthConfig;
use crate::domain::entity::user::User;
use crate::domain::value_object::claims::Claims;
use crate::error::{AuthError, AuthResult};

const ALGORITHM: Algorithm = Algorithm::HS256;

/// A signed token handed to the transport boundary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    /// Matches the `exp` claim; use it as the cookie expiry
    pub expires_at: DateTime<Utc>,
}

/// Holds the signing keys for the process lifetime.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_secs: i64,
}

impl TokenService {
    /// Build from config. An empty secret is a configuration error.
    pub fn new(config: &AuthConfig) -> AuthResult<Self> {
        if config.token_secret.is_empty() {
            return Err(AuthError::Configuration(
                "token signing secret must not be empty".to_string(),
            ));
        }
        if config.token_ttl_secs() <= 0 {
            return Err(AuthError::Configuration(
                "token ttl must be at least one second".to_string(),
            ));
        }

        // Only HS256 is accepted; `exp` is mandatory and checked without leeway
        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(&config.token_secret),
            decoding_key: DecodingKey::from_secret(&config.token_secret),
            validation,
            ttl_secs: config.token_ttl_secs(),
        })
    }

    /// Sign a fresh token for an authenticated user
    pub fn issue(&self, user: &User) -> AuthResult<IssuedToken> {
        let claims = Claims::for_user(user, self.next_expiry(None));
        self.sign(&claims)
    }

    /// Decode and check signature, algorithm and expiry
    pub fn verify(&self, token: &str) -> AuthResult<Claims> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            tracing::debug!(error = %e, "Token verification failed");
            AuthError::InvalidToken
        })?;

        if !data.claims.authorized {
            return Err(AuthError::InvalidToken);
        }

        Ok(data.claims)
    }

    /// Re-sign already verified claims with a later expiry (sliding session)
    pub fn refresh(&self, claims: &Claims) -> AuthResult<IssuedToken> {
        let refreshed = claims.with_expiry(self.next_expiry(Some(claims.exp)));
        self.sign(&refreshed)
    }

    fn sign(&self, claims: &Claims) -> AuthResult<IssuedToken> {
        let token = encode(&Header::new(ALGORITHM), claims, &self.encoding_key)
            .map_err(|e| AuthError::SigningError(e.to_string()))?;

        Ok(IssuedToken {
            token,
            expires_at: claims.expires_at(),
        })
    }

    /// `now + ttl`, and always past `previous` so that a refresh within the
    /// same second still moves the expiry forward.
    fn next_expiry(&self, previous: Option<i64>) -> i64 {
        let candidate = Utc::now().timestamp().saturating_add(self.ttl_secs);
        match previous {
            Some(prev) if candidate <= prev => prev.saturating_add(1),
            _ => candidate,
        }
    }
}

#[cfg(test)]
impl TokenService {
    /// Sign arbitrary claims (expired or otherwise) for tests
    pub(crate) fn sign_for_test(&self, claims: &Claims) -> String {
        encode(&Header::new(ALGORITHM), claims, &self.encoding_key).unwrap()
    }
}
