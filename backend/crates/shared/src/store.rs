//! Storage error classification
//!
//! Repositories return [`StoreError`] so that use cases can tell a
//! uniqueness conflict (retryable by re-reading) from a slow or broken backend.

use thiserror::Error;

/// Result of a repository call
pub type StoreResult<T> = Result<T, StoreError>;

/// Repository failure, classified just enough for callers to react
#[derive(Debug, Error)]
pub enum StoreError {
    /// Unique key already taken
    #[error("unique constraint violated")]
    Conflict,

    /// Pool acquire or query timed out
    #[error("storage operation timed out")]
    Timeout,

    /// Anything else
    #[error("storage backend error: {0}")]
    Backend(Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl StoreError {
    /// Wrap any error as [`StoreError::Backend`]
    pub fn backend(err: impl Into<Box<dyn std::error::Error + Send + Sync + 'static>>) -> Self {
        Self::Backend(err.into())
    }

    #[inline]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict)
    }
}

// ============================================================================
// SQLx conversions (feature-gated)
// ============================================================================

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::PoolTimedOut => StoreError::Timeout,
            sqlx::Error::Database(db_err) => {
                // https://www.postgresql.org/docs/current/errcodes-appendix.html
                match db_err.code().as_deref() {
                    // unique_violation / exclusion_violation
                    Some("23505") | Some("23P01") => StoreError::Conflict,
                    // query_canceled (statement_timeout)
                    Some("57014") => StoreError::Timeout,
                    _ => StoreError::Backend(Box::new(err)),
                }
            }
            _ => StoreError::Backend(Box::new(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_wraps_message() {
        let err = StoreError::backend("connection reset");
        assert_eq!(err.to_string(), "storage backend error: connection reset");
        assert!(!err.is_conflict());
    }

    #[test]
    fn test_is_conflict() {
        assert!(StoreError::Conflict.is_conflict());
        assert!(!StoreError::Timeout.is_conflict());
    }

    #[cfg(feature = "sqlx")]
    #[test]
    fn test_pool_timeout_maps_to_timeout() {
        let err: StoreError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, StoreError::Timeout));
    }
}
