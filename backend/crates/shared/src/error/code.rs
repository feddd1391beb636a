//! Business error codes
//!
//! Numeric codes carried in every response body next to the HTTP status.
//! Clients branch on these rather than on the message text.

use serde::Serialize;

/// Business error code
///
/// * `0` - success
/// * `1xxx` - caller mistakes
/// * `2xxx` - server faults
/// * `3xxx` - user and session state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ErrorCode(u32);

impl ErrorCode {
    pub const SUCCESS: Self = Self(0);

    pub const PARAM_ERROR: Self = Self(1001);
    pub const UNAUTHORIZED: Self = Self(1002);
    pub const NOT_FOUND: Self = Self(1003);
    pub const CONFLICT: Self = Self(1004);
    pub const PERMISSION_DENIED: Self = Self(1005);

    pub const INTERNAL_ERROR: Self = Self(2001);
    pub const DATABASE_ERROR: Self = Self(2002);
    pub const TIMEOUT: Self = Self(2004);

    pub const USER_NOT_FOUND: Self = Self(3001);
    pub const INVALID_TOKEN: Self = Self(3002);
    pub const TOKEN_EXPIRED: Self = Self(3003);

    #[inline]
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_number() {
        let json = serde_json::to_string(&ErrorCode::TOKEN_EXPIRED).unwrap();
        assert_eq!(json, "3003");
    }

    #[test]
    fn test_ranges() {
        assert_eq!(ErrorCode::SUCCESS.value(), 0);
        assert!((1000..2000).contains(&ErrorCode::CONFLICT.value()));
        assert!((2000..3000).contains(&ErrorCode::TIMEOUT.value()));
        assert!((3000..4000).contains(&ErrorCode::USER_NOT_FOUND.value()));
    }
}
