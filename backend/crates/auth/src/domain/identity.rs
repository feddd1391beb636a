//! Identity Exchange
//!
//! Port to the platform that turns a one-time login code into an
//! external identity.

use std::fmt;

use thiserror::Error;

use crate::domain::value_object::open_id::OpenId;

/// Session key the platform hands out alongside the identity
///
/// Never logged; `Debug` is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionKey(String);

impl SessionKey {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionKey(**redacted**)")
    }
}

/// Identity resolved from a login code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalIdentity {
    pub open_id: OpenId,
    /// Present only when the app is bound to an open-platform account
    pub union_id: Option<String>,
    pub session_key: Option<SessionKey>,
}

/// Error code and message returned by the platform
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("errcode {errcode}: {errmsg}")]
pub struct ProviderRejection {
    pub errcode: i64,
    pub errmsg: String,
}

/// Outcome of a code exchange that reached the platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeExchange {
    Granted(ExternalIdentity),
    /// The platform answered with a non-zero error code (bad or reused code, etc.)
    Rejected(ProviderRejection),
}

/// The exchange did not produce an answer from the platform
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    #[error("identity provider unreachable: {0}")]
    Transport(String),

    #[error("identity provider timed out")]
    Timeout,

    #[error("identity provider response could not be decoded: {0}")]
    Decode(String),
}

/// Identity provider trait
#[trait_variant::make(IdentityProvider: Send)]
pub trait LocalIdentityProvider {
    /// Exchange a one-time login code
    async fn exchange_code(&self, code: &str) -> Result<CodeExchange, IdentityError>;
}
