//! HTTP Handlers

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::{Extension, Json};
use kernel::id::SnowflakeGenerator;
use kernel::response::ApiResponse;

use crate::application::config::AuthConfig;
use crate::application::token::SessionTokenIssuer;
use crate::application::{
    GetUserInfoUseCase, RefreshTokenUseCase, UpdateProfileInput, UpdateProfileUseCase,
    WechatLoginInput, WechatLoginUseCase,
};
use crate::domain::identity::IdentityProvider;
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{
    LoginResponse, RefreshTokenResponse, UpdateUserInfoRequest, UserInfoResponse,
    WechatLoginRequest,
};
use crate::presentation::middleware::CurrentUser;

/// Shared state for auth handlers
pub struct AuthAppState<R, P>
where
    R: UserRepository + Send + Sync + 'static,
    P: IdentityProvider + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub identity: Arc<P>,
    pub issuer: Arc<SessionTokenIssuer>,
    pub ids: Arc<SnowflakeGenerator>,
    pub config: Arc<AuthConfig>,
}

// Manual impl: only the Arcs are cloned, so R and P need not be Clone
impl<R, P> Clone for AuthAppState<R, P>
where
    R: UserRepository + Send + Sync + 'static,
    P: IdentityProvider + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            identity: self.identity.clone(),
            issuer: self.issuer.clone(),
            ids: self.ids.clone(),
            config: self.config.clone(),
        }
    }
}

// ============================================================================
// WeChat Login
// ============================================================================

/// POST /auth/wechat-login
pub async fn wechat_login<R, P>(
    State(state): State<AuthAppState<R, P>>,
    payload: Result<Json<WechatLoginRequest>, JsonRejection>,
) -> AuthResult<ApiResponse<LoginResponse>>
where
    R: UserRepository + Send + Sync + 'static,
    P: IdentityProvider + Send + Sync + 'static,
{
    let Json(req) = payload.map_err(|e| AuthError::Validation(e.body_text()))?;

    let use_case = WechatLoginUseCase::new(
        state.repo.clone(),
        state.identity.clone(),
        state.issuer.clone(),
        state.ids.clone(),
        state.config.clone(),
    );

    let output = use_case
        .execute(WechatLoginInput {
            code: req.code,
            nick_name: req.nick_name,
            avatar_url: req.avatar_url,
        })
        .await?;

    Ok(ApiResponse::success(LoginResponse {
        token: output.token.token,
        user_info: UserInfoResponse::from(&output.user),
        is_new_user: output.is_new_user,
    }))
}

// ============================================================================
// Refresh Token (requires authentication)
// ============================================================================

/// POST /auth/refresh-token
pub async fn refresh_token<R, P>(
    State(state): State<AuthAppState<R, P>>,
    Extension(current): Extension<CurrentUser>,
) -> AuthResult<ApiResponse<RefreshTokenResponse>>
where
    R: UserRepository + Send + Sync + 'static,
    P: IdentityProvider + Send + Sync + 'static,
{
    let use_case =
        RefreshTokenUseCase::new(state.repo.clone(), state.issuer.clone(), state.config.clone());

    let issued = use_case.execute(&current.open_id).await?;

    Ok(ApiResponse::success(RefreshTokenResponse {
        token: issued.token,
        expires_in: issued.expires_in,
    }))
}

// ============================================================================
// User Info (requires authentication)
// ============================================================================

/// GET /auth/user-info
pub async fn get_user_info<R, P>(
    State(state): State<AuthAppState<R, P>>,
    Extension(current): Extension<CurrentUser>,
) -> AuthResult<ApiResponse<UserInfoResponse>>
where
    R: UserRepository + Send + Sync + 'static,
    P: IdentityProvider + Send + Sync + 'static,
{
    let use_case = GetUserInfoUseCase::new(state.repo.clone(), state.config.clone());

    let user = use_case.execute(&current.open_id).await?;

    Ok(ApiResponse::success(UserInfoResponse::from(&user)))
}

/// PUT /auth/user-info
pub async fn update_user_info<R, P>(
    State(state): State<AuthAppState<R, P>>,
    Extension(current): Extension<CurrentUser>,
    payload: Result<Json<UpdateUserInfoRequest>, JsonRejection>,
) -> AuthResult<ApiResponse<UserInfoResponse>>
where
    R: UserRepository + Send + Sync + 'static,
    P: IdentityProvider + Send + Sync + 'static,
{
    let Json(req) = payload.map_err(|e| AuthError::Validation(e.body_text()))?;

    let use_case = UpdateProfileUseCase::new(state.repo.clone(), state.config.clone());

    let user = use_case
        .execute(
            &current.open_id,
            UpdateProfileInput {
                nick_name: req.nick_name,
                avatar_url: req.avatar_url,
            },
        )
        .await?;

    Ok(ApiResponse::success(UserInfoResponse::from(&user)))
}
