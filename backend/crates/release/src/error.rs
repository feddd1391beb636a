//! Release Error Types

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, code::ErrorCode, kind::ErrorKind};
use kernel::store::StoreError;
use platform::deadline::DeadlineExceeded;
use thiserror::Error;

/// Release-specific result type alias
pub type ReleaseResult<T> = Result<T, ReleaseError>;

/// Release-specific error variants
#[derive(Debug, Error)]
pub enum ReleaseError {
    #[error("{0}")]
    Validation(String),

    /// No version is flagged active
    #[error("active app version not found")]
    NoActiveVersion,

    #[error("app version not found: {0}")]
    VersionNotFound(String),

    #[error("app version already exists: {0}")]
    DuplicateVersion(String),

    /// Concurrent activation collided with the single-active constraint
    #[error("app version activation conflicted, please retry")]
    Conflict,

    /// Missing or wrong admin token
    #[error("admin token required")]
    Forbidden,

    #[error("storage error: {0}")]
    Storage(StoreError),

    #[error("{0} timed out")]
    Timeout(&'static str),
}

impl ReleaseError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ReleaseError::Validation(_) => ErrorKind::BadRequest,
            ReleaseError::NoActiveVersion | ReleaseError::VersionNotFound(_) => ErrorKind::NotFound,
            ReleaseError::DuplicateVersion(_) | ReleaseError::Conflict => ErrorKind::Conflict,
            ReleaseError::Forbidden => ErrorKind::Forbidden,
            ReleaseError::Storage(_) => ErrorKind::Storage,
            ReleaseError::Timeout(_) => ErrorKind::Timeout,
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.kind().default_code()
    }

    pub fn to_app_error(&self) -> AppError {
        let message = match self {
            ReleaseError::Storage(_) => "storage error".to_string(),
            other => other.to_string(),
        };
        AppError::new(self.kind(), message).with_code(self.code())
    }

    fn log(&self) {
        match self {
            ReleaseError::Storage(e) => {
                tracing::error!(error = %e, "Release storage error");
            }
            ReleaseError::Timeout(operation) => {
                tracing::error!(operation, "Release store call timed out");
            }
            ReleaseError::Forbidden => {
                tracing::warn!("Admin request rejected");
            }
            _ => {
                tracing::debug!(error = %self, "Release error");
            }
        }
    }
}

impl IntoResponse for ReleaseError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for ReleaseError {
    fn from(err: AppError) -> Self {
        match err.kind() {
            ErrorKind::BadRequest => ReleaseError::Validation(err.message().to_string()),
            _ => ReleaseError::Storage(StoreError::backend(err.to_string())),
        }
    }
}

impl From<StoreError> for ReleaseError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict => ReleaseError::Conflict,
            StoreError::Timeout => ReleaseError::Timeout("storage"),
            other => ReleaseError::Storage(other),
        }
    }
}

impl From<DeadlineExceeded> for ReleaseError {
    fn from(err: DeadlineExceeded) -> Self {
        ReleaseError::Timeout(err.operation)
    }
}
