//! Bearer credential utilities
//!
//! Extracts `Authorization: Bearer <token>` credentials from request headers.

use axum::http::{HeaderMap, header};

const BEARER_PREFIX: &str = "Bearer ";

/// Error when extracting a bearer credential
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BearerError {
    #[error("Missing Authorization header")]
    Missing,
    #[error("Authorization header is not a bearer credential")]
    NotBearer,
    #[error("Bearer credential is empty")]
    Empty,
}

/// Extract the bearer token from request headers
///
/// ## Arguments
/// * `headers` - HTTP request headers
///
/// ## Returns
/// * `Ok(&str)` - The token, without the `Bearer ` prefix and surrounding whitespace
/// * `Err(BearerError)` - Header missing, not valid ASCII, wrong scheme or empty token
pub fn extract_bearer(headers: &HeaderMap) -> Result<&str, BearerError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(BearerError::Missing)?
        .to_str()
        .map_err(|_| BearerError::NotBearer)?;

    let token = value
        .strip_prefix(BEARER_PREFIX)
        .ok_or(BearerError::NotBearer)?
        .trim();

    if token.is_empty() {
        return Err(BearerError::Empty);
    }
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_extract_bearer() {
        let headers = headers_with("Bearer abc.def.ghi");
        assert_eq!(extract_bearer(&headers), Ok("abc.def.ghi"));
    }

    #[test]
    fn test_extract_bearer_missing() {
        let headers = HeaderMap::new();
        assert_eq!(extract_bearer(&headers), Err(BearerError::Missing));
    }

    #[test]
    fn test_extract_bearer_wrong_scheme() {
        let headers = headers_with("Basic dXNlcjpwYXNz");
        assert_eq!(extract_bearer(&headers), Err(BearerError::NotBearer));
    }

    #[test]
    fn test_extract_bearer_empty() {
        let headers = headers_with("Bearer    ");
        assert_eq!(extract_bearer(&headers), Err(BearerError::Empty));
    }
}
