//! Media Error Types

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, code::ErrorCode, kind::ErrorKind};
use kernel::store::StoreError;
use platform::deadline::DeadlineExceeded;
use thiserror::Error;

pub type MediaResult<T> = Result<T, MediaError>;

#[derive(Debug, Error)]
pub enum MediaError {
    /// Rejected upload: bad type tag, extension, size or form
    #[error("{0}")]
    Validation(String),

    #[error("storage error: {0}")]
    Storage(StoreError),

    #[error("{0} timed out")]
    Timeout(&'static str),
}

impl MediaError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MediaError::Validation(_) => ErrorKind::BadRequest,
            MediaError::Storage(_) => ErrorKind::InternalServerError,
            MediaError::Timeout(_) => ErrorKind::Timeout,
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.kind().default_code()
    }

    pub fn to_app_error(&self) -> AppError {
        let message = match self {
            MediaError::Storage(_) => "failed to save file".to_string(),
            other => other.to_string(),
        };
        AppError::new(self.kind(), message).with_code(self.code())
    }

    fn log(&self) {
        match self {
            MediaError::Storage(e) => {
                tracing::error!(error = %e, "Upload storage error");
            }
            MediaError::Timeout(operation) => {
                tracing::error!(operation, "Upload storage timed out");
            }
            MediaError::Validation(reason) => {
                tracing::debug!(reason = %reason, "Upload rejected");
            }
        }
    }
}

impl IntoResponse for MediaError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for MediaError {
    fn from(err: AppError) -> Self {
        match err.kind() {
            ErrorKind::BadRequest => MediaError::Validation(err.message().to_string()),
            _ => MediaError::Storage(StoreError::backend(err.to_string())),
        }
    }
}

impl From<StoreError> for MediaError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Timeout => MediaError::Timeout("storage"),
            other => MediaError::Storage(other),
        }
    }
}

impl From<DeadlineExceeded> for MediaError {
    fn from(err: DeadlineExceeded) -> Self {
        MediaError::Timeout(err.operation)
    }
}
