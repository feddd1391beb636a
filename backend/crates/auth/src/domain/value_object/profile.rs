//! Profile Value Objects
//!
//! Display name and avatar URL supplied by the client.

use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Maximum nick name length in characters
const NICK_NAME_MAX_CHARS: usize = 64;
/// Maximum avatar URL length in bytes
const AVATAR_URL_MAX_LENGTH: usize = 512;

/// Display name
///
/// May be empty on accounts created by a login that carried no profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NickName(String);

impl NickName {
    /// Accept any value within the length limit, including an empty one
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into().trim().to_string();

        if value.chars().count() > NICK_NAME_MAX_CHARS {
            return Err(AppError::bad_request(format!(
                "nickName must be at most {} characters",
                NICK_NAME_MAX_CHARS
            )));
        }

        Ok(Self(value))
    }

    /// Like [`NickName::new`] but rejects blank values
    pub fn required(value: impl Into<String>) -> AppResult<Self> {
        let nick_name = Self::new(value)?;
        if nick_name.0.is_empty() {
            return Err(AppError::bad_request("nickName is required"));
        }
        Ok(nick_name)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Avatar image URL
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AvatarUrl(String);

impl AvatarUrl {
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into().trim().to_string();

        if value.len() > AVATAR_URL_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "avatarUrl must be at most {} characters",
                AVATAR_URL_MAX_LENGTH
            )));
        }

        if value.chars().any(char::is_whitespace) {
            return Err(AppError::bad_request("avatarUrl must not contain whitespace"));
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Profile fields a login request may carry
///
/// `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginProfile {
    pub nick_name: Option<NickName>,
    pub avatar_url: Option<AvatarUrl>,
}

impl LoginProfile {
    pub fn parse(nick_name: Option<String>, avatar_url: Option<String>) -> AppResult<Self> {
        Ok(Self {
            nick_name: nick_name.map(NickName::new).transpose()?,
            avatar_url: avatar_url.map(AvatarUrl::new).transpose()?,
        })
    }
}
