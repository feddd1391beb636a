//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, code::ErrorCode, kind::ErrorKind};
use kernel::store::StoreError;
use platform::deadline::DeadlineExceeded;
use thiserror::Error;

use crate::application::token::TokenError;
use crate::domain::identity::IdentityError;

/// Message for every token failure; callers never learn which check failed
pub const SESSION_REJECTED: &str = "invalid or expired session";

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Malformed or missing input
    #[error("{0}")]
    Validation(String),

    /// The identity provider refused the login code or could not be reached
    #[error("wechat login failed: {0}")]
    ExternalAuth(String),

    /// No bearer credential on a protected route
    #[error("authorization required")]
    MissingCredential,

    /// Bad signature or unparseable token
    #[error("invalid or expired session")]
    InvalidSession,

    /// Token past its expiry
    #[error("invalid or expired session")]
    SessionExpired,

    /// User not found
    #[error("user not found")]
    UserNotFound,

    /// Concurrent first logins still colliding after one retry
    #[error("concurrent login in progress, please retry")]
    Conflict,

    /// Storage failure
    #[error("storage error: {0}")]
    Storage(StoreError),

    /// A collaborator call exceeded its deadline
    #[error("{0} timed out")]
    Timeout(&'static str),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Validation(_) => ErrorKind::BadRequest,
            AuthError::ExternalAuth(_)
            | AuthError::MissingCredential
            | AuthError::InvalidSession
            | AuthError::SessionExpired => ErrorKind::Unauthorized,
            AuthError::UserNotFound => ErrorKind::NotFound,
            AuthError::Conflict => ErrorKind::Conflict,
            AuthError::Storage(_) => ErrorKind::Storage,
            AuthError::Timeout(_) => ErrorKind::Timeout,
            AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Business error code for the response body
    pub fn code(&self) -> ErrorCode {
        match self {
            AuthError::InvalidSession => ErrorCode::INVALID_TOKEN,
            AuthError::SessionExpired => ErrorCode::TOKEN_EXPIRED,
            AuthError::UserNotFound => ErrorCode::USER_NOT_FOUND,
            other => other.kind().default_code(),
        }
    }

    /// Convert to AppError
    ///
    /// Server-side details stay in the log; the client gets a generic message.
    pub fn to_app_error(&self) -> AppError {
        let message = match self {
            AuthError::Storage(_) => "storage error".to_string(),
            AuthError::Internal(_) => "internal error".to_string(),
            other => other.to_string(),
        };
        AppError::new(self.kind(), message).with_code(self.code())
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Storage(e) => {
                tracing::error!(error = %e, "Auth storage error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::Timeout(operation) => {
                tracing::error!(operation, "Auth collaborator timed out");
            }
            AuthError::ExternalAuth(reason) => {
                tracing::warn!(reason = %reason, "External login rejected");
            }
            AuthError::Conflict => {
                tracing::warn!("Login conflict persisted after retry");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        match err.kind() {
            ErrorKind::BadRequest => AuthError::Validation(err.message().to_string()),
            _ => AuthError::Internal(err.to_string()),
        }
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict => AuthError::Conflict,
            StoreError::Timeout => AuthError::Timeout("storage"),
            other => AuthError::Storage(other),
        }
    }
}

impl From<DeadlineExceeded> for AuthError {
    fn from(err: DeadlineExceeded) -> Self {
        AuthError::Timeout(err.operation)
    }
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => AuthError::SessionExpired,
            TokenError::InvalidSignature | TokenError::Malformed => AuthError::InvalidSession,
            TokenError::Signing(msg) => AuthError::Internal(msg),
        }
    }
}

impl From<IdentityError> for AuthError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::Timeout => AuthError::Timeout("identity exchange"),
            other => AuthError::ExternalAuth(other.to_string()),
        }
    }
}
