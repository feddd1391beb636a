//! Deadlines for collaborator calls
//!
//! Every call that leaves the process (identity provider, database, disk)
//! is bounded so a stalled collaborator surfaces as an error instead of
//! holding the request open.

use std::future::Future;
use std::time::Duration;

/// The wrapped operation did not finish in time
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{operation} did not complete within {limit:?}")]
pub struct DeadlineExceeded {
    pub operation: &'static str,
    pub limit: Duration,
}

/// Run `future` with an upper bound of `limit`
///
/// ## Arguments
/// * `operation` - Short name used in the error (e.g. `"user lookup"`)
/// * `limit` - Maximum time the future may take
///
/// ## Returns
/// * `Ok(output)` - The future completed in time
/// * `Err(DeadlineExceeded)` - The future was dropped after `limit`
pub async fn within<F>(
    operation: &'static str,
    limit: Duration,
    future: F,
) -> Result<F::Output, DeadlineExceeded>
where
    F: Future,
{
    tokio::time::timeout(limit, future)
        .await
        .map_err(|_| DeadlineExceeded { operation, limit })
}
