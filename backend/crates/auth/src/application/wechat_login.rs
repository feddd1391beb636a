//! WeChat Login Use Case
//!
//! Exchanges a mini-program login code for an identity, finds or creates
//! the matching user and issues a session token.

use std::sync::Arc;

use chrono::Utc;
use kernel::id::SnowflakeGenerator;
use kernel::store::StoreError;
use platform::deadline::within;

use crate::application::config::AuthConfig;
use crate::application::token::{IssuedToken, SessionTokenIssuer};
use crate::domain::entity::user::User;
use crate::domain::identity::{CodeExchange, IdentityProvider};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{open_id::OpenId, profile::LoginProfile};
use crate::error::{AuthError, AuthResult};

/// WeChat login input
pub struct WechatLoginInput {
    pub code: String,
    pub nick_name: Option<String>,
    pub avatar_url: Option<String>,
}

/// WeChat login output
pub struct WechatLoginOutput {
    pub token: IssuedToken,
    pub user: User,
    pub is_new_user: bool,
}

/// WeChat login use case
pub struct WechatLoginUseCase<U, P>
where
    U: UserRepository,
    P: IdentityProvider,
{
    user_repo: Arc<U>,
    identity: Arc<P>,
    issuer: Arc<SessionTokenIssuer>,
    ids: Arc<SnowflakeGenerator>,
    config: Arc<AuthConfig>,
}

impl<U, P> WechatLoginUseCase<U, P>
where
    U: UserRepository + Send + Sync,
    P: IdentityProvider + Send + Sync,
{
    pub fn new(
        user_repo: Arc<U>,
        identity: Arc<P>,
        issuer: Arc<SessionTokenIssuer>,
        ids: Arc<SnowflakeGenerator>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            user_repo,
            identity,
            issuer,
            ids,
            config,
        }
    }

    pub async fn execute(&self, input: WechatLoginInput) -> AuthResult<WechatLoginOutput> {
        let code = input.code.trim();
        if code.is_empty() {
            return Err(AuthError::Validation("code is required".to_string()));
        }
        let profile = LoginProfile::parse(input.nick_name, input.avatar_url)?;

        let exchange = within(
            "identity exchange",
            self.config.call_timeout,
            self.identity.exchange_code(code),
        )
        .await??;

        let identity = match exchange {
            CodeExchange::Granted(identity) => identity,
            CodeExchange::Rejected(rejection) => {
                return Err(AuthError::ExternalAuth(rejection.errmsg));
            }
        };

        let (user, is_new_user) = self.find_or_register(identity.open_id, &profile).await?;
        let token = self.issuer.issue(&user.open_id)?;

        tracing::info!(
            user_id = %user.user_id,
            open_id = %user.open_id,
            is_new_user,
            "User logged in"
        );

        Ok(WechatLoginOutput {
            token,
            user,
            is_new_user,
        })
    }

    /// Read-then-branch on the open id
    ///
    /// A create that loses a race with a concurrent first login reports
    /// `Conflict`; the winner's row is then visible, so the lookup is repeated
    /// exactly once and the update path taken.
    async fn find_or_register(
        &self,
        open_id: OpenId,
        profile: &LoginProfile,
    ) -> AuthResult<(User, bool)> {
        let timeout = self.config.call_timeout;
        let mut retried = false;

        loop {
            let existing = within("user lookup", timeout, self.user_repo.find_by_open_id(&open_id))
                .await??;

            let now = Utc::now();
            if let Some(mut user) = existing {
                user.record_login(profile, now);
                let updated = within("user update", timeout, self.user_repo.update(&user)).await??;
                if !updated {
                    return Err(AuthError::UserNotFound);
                }
                return Ok((user, false));
            }

            let user = User::register(self.ids.next_id(), open_id.clone(), profile, now);
            match within("user create", timeout, self.user_repo.create(&user)).await? {
                Ok(()) => return Ok((user, true)),
                Err(StoreError::Conflict) if !retried => {
                    tracing::debug!(open_id = %open_id, "Concurrent first login, retrying lookup");
                    retried = true;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}
