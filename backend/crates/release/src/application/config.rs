//! Application Configuration

use std::fmt;
use std::time::Duration;

/// Release application configuration
#[derive(Clone)]
pub struct ReleaseConfig {
    /// Upper bound for each store call
    pub call_timeout: Duration,
    /// Shared secret for the admin routes; admin routes are off when unset
    pub admin_token: Option<String>,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self {
            call_timeout: Duration::from_secs(5),
            admin_token: None,
        }
    }
}

impl fmt::Debug for ReleaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReleaseConfig")
            .field("call_timeout", &self.call_timeout)
            .field(
                "admin_token",
                &self.admin_token.as_ref().map(|_| "**redacted**"),
            )
            .finish()
    }
}
