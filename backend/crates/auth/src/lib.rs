//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Credential store and token service
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, router, session middleware
//!
//! ## Features
//! - Registration and login with user name + password
//! - Stateless HS256 session tokens carried in a cookie or bearer header
//! - Sliding sessions: every authenticated request re-issues the token
//!
//! ## Security Model
//! - Passwords hashed with Argon2id
//! - Unknown user and wrong password look identical to clients
//! - Tokens signed with any algorithm other than HS256 are rejected

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::{AuthConfig, CredentialStore, IssuedToken, TokenService};
pub use domain::{Claims, User, UserRole};
pub use error::{AuthError, AuthResult};
pub use infra::postgres::PgUserRepository;
pub use presentation::{
    AuthAppState, AuthenticatedUser, SessionState, auth_router, auth_router_generic,
    require_session,
};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
