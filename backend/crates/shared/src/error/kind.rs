//! HTTP classes of failure
//!
//! [`ErrorKind`] picks the status line and the fallback business code.
//! Timeouts get their own kind so clients and logs can tell a slow
//! collaborator from a broken one.

use std::fmt;

use serde::Serialize;

use super::code::ErrorCode;

/// ```rust
/// use kernel::error::kind::ErrorKind;
///
/// assert_eq!(ErrorKind::NotFound.status_code(), 404);
/// assert_eq!(ErrorKind::Timeout.default_code().value(), 2004);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ErrorKind {
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    Conflict,
    /// Deadline exceeded on an outbound call
    Timeout,
    Storage,
    InternalServerError,
}

impl ErrorKind {
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::BadRequest => 400,
            Self::Unauthorized => 401,
            Self::Forbidden => 403,
            Self::NotFound => 404,
            Self::Conflict => 409,
            Self::Timeout | Self::Storage | Self::InternalServerError => 500,
        }
    }

    pub const fn default_code(&self) -> ErrorCode {
        match self {
            Self::BadRequest => ErrorCode::PARAM_ERROR,
            Self::Unauthorized => ErrorCode::UNAUTHORIZED,
            Self::Forbidden => ErrorCode::PERMISSION_DENIED,
            Self::NotFound => ErrorCode::NOT_FOUND,
            Self::Conflict => ErrorCode::CONFLICT,
            Self::Timeout => ErrorCode::TIMEOUT,
            Self::Storage => ErrorCode::DATABASE_ERROR,
            Self::InternalServerError => ErrorCode::INTERNAL_ERROR,
        }
    }

    pub const fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }

    const fn label(&self) -> &'static str {
        match self {
            Self::BadRequest => "Bad Request",
            Self::Unauthorized => "Unauthorized",
            Self::Forbidden => "Forbidden",
            Self::NotFound => "Not Found",
            Self::Conflict => "Conflict",
            Self::Timeout => "Timeout",
            Self::Storage => "Storage Error",
            Self::InternalServerError => "Internal Server Error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
