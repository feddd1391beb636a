//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

use crate::domain::entity::user::User;

// ============================================================================
// WeChat Login
// ============================================================================

/// WeChat login request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WechatLoginRequest {
    /// One-time code from `wx.login()`
    #[serde(default)]
    pub code: String,
    pub nick_name: Option<String>,
    pub avatar_url: Option<String>,
}

/// WeChat login response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user_info: UserInfoResponse,
    pub is_new_user: bool,
}

// ============================================================================
// Refresh Token
// ============================================================================

/// Refresh token response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenResponse {
    pub token: String,
    /// Lifetime in seconds
    pub expires_in: i64,
}

// ============================================================================
// User Info
// ============================================================================

/// User info response (timestamps in Unix milliseconds)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfoResponse {
    pub openid: String,
    pub nick_name: String,
    pub avatar_url: String,
    pub create_time: i64,
    pub last_login_time: i64,
}

impl From<&User> for UserInfoResponse {
    fn from(user: &User) -> Self {
        Self {
            openid: user.open_id.to_string(),
            nick_name: user.nick_name.as_str().to_string(),
            avatar_url: user.avatar_url.as_str().to_string(),
            create_time: user.created_at.timestamp_millis(),
            last_login_time: user.last_login_at.timestamp_millis(),
        }
    }
}

/// Update user info request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserInfoRequest {
    #[serde(default)]
    pub nick_name: String,
    pub avatar_url: Option<String>,
}
