//! HTTP Handlers

use axum::Json;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use std::sync::Arc;

use platform::cookie::set_cookie_header;
use platform::password::ClearTextPassword;

use crate::application::{AuthConfig, CredentialStore, TokenService};
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{CredentialsRequest, LoginResponse};
use crate::presentation::middleware::SessionState;

/// Shared state for auth handlers, built once at startup
pub struct AuthAppState<R>
where
    R: UserRepository + Send + Sync + 'static,
{
    pub credentials: Arc<CredentialStore<R>>,
    pub tokens: Arc<TokenService>,
    pub config: Arc<AuthConfig>,
}

impl<R> Clone for AuthAppState<R>
where
    R: UserRepository + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            credentials: self.credentials.clone(),
            tokens: self.tokens.clone(),
            config: self.config.clone(),
        }
    }
}

impl<R> AuthAppState<R>
where
    R: UserRepository + Send + Sync + 'static,
{
    /// Fails when the signing secret is unusable
    pub fn new(repo: R, config: AuthConfig) -> AuthResult<Self> {
        let config = Arc::new(config);
        let tokens = Arc::new(TokenService::new(&config)?);
        let credentials = Arc::new(CredentialStore::new(Arc::new(repo), config.clone()));

        Ok(Self {
            credentials,
            tokens,
            config,
        })
    }

    /// State for `require_session`, sharing this state's signing keys
    pub fn session_state(&self) -> SessionState {
        SessionState {
            tokens: self.tokens.clone(),
            config: self.config.clone(),
        }
    }
}

/// POST /register
pub async fn register<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<CredentialsRequest>,
) -> AuthResult<StatusCode>
where
    R: UserRepository + Send + Sync + 'static,
{
    // Strength rules apply to new passwords only
    ClearTextPassword::new(req.password.as_str())
        .and_then(|password| password.check_strength())
        .map_err(|e| AuthError::Validation(e.to_string()))?;

    state
        .credentials
        .register(&req.username, &req.password)
        .await?;

    Ok(StatusCode::OK)
}

/// POST /login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<CredentialsRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + Send + Sync + 'static,
{
    let user = state
        .credentials
        .authenticate(&req.username, &req.password)
        .await?;

    let issued = state.tokens.issue(&user)?;
    let cookie = set_cookie_header(&state.config.cookie_config(), &issued.token);

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(LoginResponse {
            token: issued.token,
            expires_at: issued.expires_at,
        }),
    ))
}

/// POST /logout
///
/// Tokens are stateless, so this only clears the cookie.
pub async fn logout<R>(State(state): State<AuthAppState<R>>) -> impl IntoResponse
where
    R: UserRepository + Send + Sync + 'static,
{
    let cookie = state.config.cookie_config().build_delete_cookie();
    (StatusCode::NO_CONTENT, [(header::SET_COOKIE, cookie)])
}
