//! Auth Middleware
//!
//! Guards protected routes and slides the session forward on every
//! authenticated request.

use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use platform::cookie::{extract_token, set_cookie_header};

use crate::application::{AuthConfig, TokenService};
use crate::domain::value_object::claims::Claims;
use crate::error::AuthError;

/// Middleware state
#[derive(Clone)]
pub struct SessionState {
    pub tokens: Arc<TokenService>,
    pub config: Arc<AuthConfig>,
}

/// Claims of the caller, stored in request extensions for handlers
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Claims);

/// Require a valid token (cookie or bearer), then re-issue it.
///
/// The refreshed token is attached as a `Set-Cookie` header on whatever
/// response the inner handler produces.
pub async fn require_session(
    State(state): State<SessionState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_token(req.headers(), &state.config.cookie_name)
        .ok_or_else(|| AuthError::MissingToken.into_response())?;

    let claims = state
        .tokens
        .verify(&token)
        .map_err(IntoResponse::into_response)?;

    let refreshed = state
        .tokens
        .refresh(&claims)
        .map_err(IntoResponse::into_response)?;

    tracing::debug!(subject = %claims.sub, "Session refreshed");

    req.extensions_mut().insert(AuthenticatedUser(claims));

    let mut response = next.run(req).await;
    response.headers_mut().append(
        header::SET_COOKIE,
        set_cookie_header(&state.config.cookie_config(), &refreshed.token),
    );

    Ok(response)
}
