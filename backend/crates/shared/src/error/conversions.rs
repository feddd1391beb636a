//! Conversions into [`AppError`] and its HTTP rendering

use super::app_error::AppError;
use crate::store::StoreError;

/// Storage details never reach the client; the cause stays attached for logs
impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        let base = match &err {
            StoreError::Conflict => AppError::conflict("resource already exists"),
            StoreError::Timeout => AppError::timeout("storage timed out"),
            StoreError::Backend(_) => AppError::storage("storage failure"),
        };
        base.with_source(err)
    }
}

/// Error body: `{ "code", "message", "timestamp" }`
#[cfg(feature = "axum")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use axum::http::StatusCode;

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let body = serde_json::json!({
            "code": self.code(),
            "message": self.message(),
            "timestamp": chrono::Utc::now().timestamp(),
        });

        (status, Json(body)).into_response()
    }
}
