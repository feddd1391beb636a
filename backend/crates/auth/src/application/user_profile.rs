//! User Profile Use Cases
//!
//! Read and overwrite the profile of the authenticated user.

use std::sync::Arc;

use chrono::Utc;
use platform::deadline::within;

use crate::application::config::AuthConfig;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    open_id::OpenId,
    profile::{AvatarUrl, NickName},
};
use crate::error::{AuthError, AuthResult};

/// Get user info use case
pub struct GetUserInfoUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<U> GetUserInfoUseCase<U>
where
    U: UserRepository + Send + Sync,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { user_repo, config }
    }

    pub async fn execute(&self, open_id: &OpenId) -> AuthResult<User> {
        within(
            "user lookup",
            self.config.call_timeout,
            self.user_repo.find_by_open_id(open_id),
        )
        .await??
        .ok_or(AuthError::UserNotFound)
    }
}

/// Update profile input
///
/// Both fields replace the stored values; a missing avatar clears it.
pub struct UpdateProfileInput {
    pub nick_name: String,
    pub avatar_url: Option<String>,
}

/// Update profile use case
pub struct UpdateProfileUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<U> UpdateProfileUseCase<U>
where
    U: UserRepository + Send + Sync,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { user_repo, config }
    }

    pub async fn execute(&self, open_id: &OpenId, input: UpdateProfileInput) -> AuthResult<User> {
        let nick_name = NickName::required(input.nick_name)?;
        let avatar_url = AvatarUrl::new(input.avatar_url.unwrap_or_default())?;

        let timeout = self.config.call_timeout;
        let mut user = within("user lookup", timeout, self.user_repo.find_by_open_id(open_id))
            .await??
            .ok_or(AuthError::UserNotFound)?;

        user.update_profile(nick_name, avatar_url, Utc::now());

        let updated = within("user update", timeout, self.user_repo.update(&user)).await??;
        if !updated {
            return Err(AuthError::UserNotFound);
        }

        tracing::info!(user_id = %user.user_id, "User profile updated");

        Ok(user)
    }
}
