//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::fmt;
use std::time::Duration;

/// Auth application configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// HMAC key for session tokens
    pub token_secret: Vec<u8>,
    /// Session token lifetime (72 hours by default)
    pub token_ttl: Duration,
    /// Upper bound for each call to the identity provider or the user store
    pub call_timeout: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_secret: Vec::new(),
            token_ttl: Duration::from_secs(72 * 3600),
            call_timeout: Duration::from_secs(5),
        }
    }
}

impl AuthConfig {
    /// Token lifetime in whole seconds
    pub fn token_ttl_secs(&self) -> i64 {
        i64::try_from(self.token_ttl.as_secs()).unwrap_or(i64::MAX)
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token_secret", &"**redacted**")
            .field("token_ttl", &self.token_ttl)
            .field("call_timeout", &self.call_timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AuthConfig::default();
        assert_eq!(config.token_ttl_secs(), 259_200);
        assert_eq!(config.call_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = AuthConfig {
            token_secret: b"super-secret-signing-key".to_vec(),
            ..Default::default()
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret"));
    }
}
