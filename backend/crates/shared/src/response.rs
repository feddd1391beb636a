//! Success envelope
//!
//! Every successful endpoint answers with
//! `{ "code": 0, "message": "success", "data": ..., "timestamp": <unix secs> }`.

use serde::Serialize;

use crate::error::code::ErrorCode;

/// Success envelope shared by every endpoint
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    pub code: ErrorCode,
    pub message: &'static str,
    pub data: T,
    pub timestamp: i64,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: ErrorCode::SUCCESS,
            message: "success",
            data,
            timestamp: chrono::Utc::now().timestamp(),
        }
    }
}

#[cfg(feature = "axum")]
impl<T: Serialize> axum::response::IntoResponse for ApiResponse<T> {
    fn into_response(self) -> axum::response::Response {
        axum::Json(self).into_response()
    }
}
