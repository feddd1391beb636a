//! Auth Middleware
//!
//! Bearer-token guard for protected routes.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use platform::bearer::extract_bearer;

use crate::application::token::SessionTokenIssuer;
use crate::domain::value_object::open_id::OpenId;
use crate::error::AuthError;

/// Middleware state
#[derive(Clone)]
pub struct SessionGuard {
    issuer: Arc<SessionTokenIssuer>,
}

impl SessionGuard {
    pub fn new(issuer: Arc<SessionTokenIssuer>) -> Self {
        Self { issuer }
    }
}

/// Authenticated caller, stored in request extensions
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub open_id: OpenId,
}

/// Middleware that requires a valid bearer session token
pub async fn require_session(
    State(guard): State<SessionGuard>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let session = {
        let token = extract_bearer(req.headers()).map_err(|e| {
            tracing::debug!(reason = %e, "Bearer credential rejected");
            AuthError::MissingCredential
        })?;
        guard.issuer.verify(token)?
    };

    req.extensions_mut().insert(CurrentUser {
        open_id: session.open_id,
    });

    Ok(next.run(req).await)
}
