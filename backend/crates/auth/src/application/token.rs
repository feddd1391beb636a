//! Session Token Issuer
//!
//! Stateless HS256 session tokens bound to an external identity.

use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::value_object::open_id::OpenId;

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (open id)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Token id; makes two tokens issued in the same second distinct
    pub jti: String,
}

/// Why a token was refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token signature does not match")]
    InvalidSignature,

    #[error("token has expired")]
    Expired,

    #[error("token is malformed")]
    Malformed,

    #[error("token could not be signed: {0}")]
    Signing(String),
}

/// A freshly signed token
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    /// Lifetime in seconds
    pub expires_in: i64,
}

/// Identity recovered from a valid token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedSession {
    pub open_id: OpenId,
    pub expires_at: DateTime<Utc>,
}

/// Signs and verifies session tokens
///
/// Holds the signing key; build one at startup and share it behind an `Arc`.
pub struct SessionTokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: chrono::Duration,
}

impl SessionTokenIssuer {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against an explicit clock in `verify_at`
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl: chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX),
        }
    }

    /// Issue a token for `open_id`, valid for the configured TTL
    pub fn issue(&self, open_id: &OpenId) -> Result<IssuedToken, TokenError> {
        self.issue_at(open_id, Utc::now())
    }

    /// Issue a token as if the current time were `now`
    pub fn issue_at(&self, open_id: &OpenId, now: DateTime<Utc>) -> Result<IssuedToken, TokenError> {
        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| TokenError::Signing("token lifetime out of range".to_string()))?;
        let claims = Claims {
            sub: open_id.as_str().to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))?;

        Ok(IssuedToken {
            token,
            expires_at,
            expires_in: self.ttl.num_seconds(),
        })
    }

    /// Verify a token against the current time
    pub fn verify(&self, token: &str) -> Result<VerifiedSession, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify a token as if the current time were `now`
    ///
    /// The signature is checked first; a token whose expiry has passed is
    /// refused as `Expired` even when correctly signed.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<VerifiedSession, TokenError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                JwtErrorKind::InvalidSignature => TokenError::InvalidSignature,
                JwtErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            }
        })?;

        let claims = data.claims;
        if now.timestamp() > claims.exp {
            return Err(TokenError::Expired);
        }

        let open_id = OpenId::new(claims.sub).map_err(|_| TokenError::Malformed)?;
        let expires_at = DateTime::from_timestamp(claims.exp, 0).ok_or(TokenError::Malformed)?;

        Ok(VerifiedSession { open_id, expires_at })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"0123456789abcdef0123456789abcdef";

    fn issuer() -> SessionTokenIssuer {
        SessionTokenIssuer::new(SECRET, Duration::from_secs(72 * 3600))
    }

    fn open_id() -> OpenId {
        OpenId::new("ext-001").unwrap()
    }

    #[test]
    fn test_issue_then_verify() {
        let issuer = issuer();
        let issued = issuer.issue(&open_id()).unwrap();

        assert_eq!(issued.expires_in, 72 * 3600);
        let session = issuer.verify(&issued.token).unwrap();
        assert_eq!(session.open_id, open_id());
        assert_eq!(session.expires_at.timestamp(), issued.expires_at.timestamp());
    }

    #[test]
    fn test_tokens_are_unique() {
        let issuer = issuer();
        let now = Utc::now();
        let a = issuer.issue_at(&open_id(), now).unwrap();
        let b = issuer.issue_at(&open_id(), now).unwrap();
        assert_ne!(a.token, b.token);
    }

    #[test]
    fn test_expired_token() {
        let issuer = issuer();
        let issued_at = Utc::now() - chrono::Duration::hours(73);
        let issued = issuer.issue_at(&open_id(), issued_at).unwrap();

        assert_eq!(issuer.verify(&issued.token), Err(TokenError::Expired));
    }

    #[test]
    fn test_valid_until_expiry_instant() {
        let issuer = issuer();
        let now = Utc::now();
        let issued = issuer.issue_at(&open_id(), now).unwrap();

        let at_expiry = DateTime::from_timestamp(issued.expires_at.timestamp(), 0).unwrap();
        assert!(issuer.verify_at(&issued.token, at_expiry).is_ok());
        assert_eq!(
            issuer.verify_at(&issued.token, at_expiry + chrono::Duration::seconds(1)),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn test_lifetime_past_the_calendar_refused() {
        for ttl in [Duration::from_secs(3_000_000_000 * 3600), Duration::from_secs(u64::MAX)] {
            let issuer = SessionTokenIssuer::new(SECRET, ttl);
            assert!(matches!(
                issuer.issue(&open_id()),
                Err(TokenError::Signing(_))
            ));
        }
    }

    #[test]
    fn test_foreign_signature() {
        let other = SessionTokenIssuer::new(b"another-secret-another-secret-!!", Duration::from_secs(60));
        let issued = other.issue(&open_id()).unwrap();

        assert_eq!(issuer().verify(&issued.token), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_tampered_payload() {
        let issuer = issuer();
        let mine = issuer.issue(&open_id()).unwrap().token;
        let theirs = issuer
            .issue(&OpenId::new("ext-002").unwrap())
            .unwrap()
            .token;

        // header and signature from one token, payload from another
        let mine_parts: Vec<&str> = mine.split('.').collect();
        let theirs_parts: Vec<&str> = theirs.split('.').collect();
        let forged = format!("{}.{}.{}", mine_parts[0], theirs_parts[1], mine_parts[2]);

        assert_eq!(issuer.verify(&forged), Err(TokenError::InvalidSignature));
    }

    #[test]
    fn test_malformed_token() {
        let issuer = issuer();
        assert_eq!(issuer.verify("not-a-token"), Err(TokenError::Malformed));
        assert_eq!(issuer.verify(""), Err(TokenError::Malformed));
        assert_eq!(issuer.verify("a.b.c"), Err(TokenError::Malformed));
    }
}
