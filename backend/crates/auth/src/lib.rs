//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository and identity provider traits
//! - `application/` - Use cases and the session token issuer
//! - `infra/` - PostgreSQL / in-memory stores and the WeChat API client
//! - `presentation/` - HTTP handlers, DTOs, router, bearer middleware
//!
//! ## Features
//! - Mini-program login: one-time code -> WeChat identity -> user -> session token
//! - Token refresh for authenticated users
//! - Profile read and update
//! - Subscribe messages through the WeChat API
//!
//! ## Security Model
//! - Stateless HS256 session tokens bound to the open id, fixed lifetime
//! - Every token failure answers the same "invalid or expired session"
//! - App secret and WeChat session keys never reach the logs

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use application::token::SessionTokenIssuer;
pub use error::{AuthError, AuthResult};
pub use infra::postgres::PgAuthRepository;
pub use infra::wechat::{WechatClient, WechatConfig};
pub use presentation::middleware::{CurrentUser, SessionGuard, require_session};
pub use presentation::router::auth_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod router {
    pub use crate::presentation::router::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}
