//! Refresh Token Use Case
//!
//! Issues a new token for an already authenticated user. The old token is
//! not revoked and stays valid until its own expiry.

use std::sync::Arc;

use platform::deadline::within;

use crate::application::config::AuthConfig;
use crate::application::token::{IssuedToken, SessionTokenIssuer};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::open_id::OpenId;
use crate::error::{AuthError, AuthResult};

/// Refresh token use case
pub struct RefreshTokenUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    issuer: Arc<SessionTokenIssuer>,
    config: Arc<AuthConfig>,
}

impl<U> RefreshTokenUseCase<U>
where
    U: UserRepository + Send + Sync,
{
    pub fn new(user_repo: Arc<U>, issuer: Arc<SessionTokenIssuer>, config: Arc<AuthConfig>) -> Self {
        Self {
            user_repo,
            issuer,
            config,
        }
    }

    pub async fn execute(&self, open_id: &OpenId) -> AuthResult<IssuedToken> {
        let user = within(
            "user lookup",
            self.config.call_timeout,
            self.user_repo.find_by_open_id(open_id),
        )
        .await??
        .ok_or(AuthError::UserNotFound)?;

        let token = self.issuer.issue(&user.open_id)?;

        tracing::debug!(user_id = %user.user_id, "Session token refreshed");

        Ok(token)
    }
}
