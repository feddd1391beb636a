//! Admin Middleware

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use platform::crypto::secrets_match;

use crate::error::ReleaseError;

/// Header carrying the shared admin token
pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// Middleware state
#[derive(Clone)]
pub struct AdminGuard {
    token: Arc<str>,
}

impl AdminGuard {
    pub fn new(token: impl Into<Arc<str>>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

/// Middleware that requires the admin token header
pub async fn require_admin(
    State(guard): State<AdminGuard>,
    req: Request,
    next: Next,
) -> Result<Response, ReleaseError> {
    let provided = req
        .headers()
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if provided.is_empty() || !secrets_match(provided, &guard.token) {
        return Err(ReleaseError::Forbidden);
    }

    Ok(next.run(req).await)
}
