//! OpenId Value Object
//!
//! Identifier the WeChat platform assigns to a user of this mini-program.
//! Stable per (app, user); the sole lookup key for users.

use derive_more::Display;
use kernel::error::app_error::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Maximum open id length (column width)
const OPEN_ID_MAX_LENGTH: usize = 64;

/// External identity value object
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(transparent)]
pub struct OpenId(String);

impl OpenId {
    /// Create a new open id with validation
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();

        if value.trim().is_empty() {
            return Err(AppError::bad_request("openid cannot be empty"));
        }

        if value.len() > OPEN_ID_MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "openid must be at most {} characters",
                OPEN_ID_MAX_LENGTH
            )));
        }

        if value.chars().any(char::is_control) {
            return Err(AppError::bad_request("openid contains control characters"));
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for OpenId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
