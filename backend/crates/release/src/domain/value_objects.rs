//! Domain Value Objects
//!
//! Immutable value types for the release domain.

use std::fmt;

use kernel::error::app_error::{AppError, AppResult};
use kernel::id::Id;

/// Marker for app version ids
pub struct AppVersionMarker;
pub type AppVersionId = Id<AppVersionMarker>;

/// Version string such as `2.1.0`, `1.0.0-beta.2` or `3.0+build7`
///
/// One to four dot-separated numeric parts, optionally followed by a
/// `-` or `+` suffix of ASCII alphanumerics, dots, dashes and pluses.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VersionNumber(String);

impl VersionNumber {
    pub const MAX_LENGTH: usize = 20;
    const MAX_PARTS: usize = 4;

    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into().trim().to_string();

        if value.is_empty() {
            return Err(AppError::bad_request("version is required"));
        }
        if value.len() > Self::MAX_LENGTH {
            return Err(AppError::bad_request(format!(
                "version must be at most {} characters",
                Self::MAX_LENGTH
            )));
        }

        let (core, suffix) = match value.find(['-', '+']) {
            Some(pos) => (&value[..pos], Some(&value[pos + 1..])),
            None => (value.as_str(), None),
        };

        let parts: Vec<&str> = core.split('.').collect();
        let numeric = parts.len() <= Self::MAX_PARTS
            && parts
                .iter()
                .all(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit()));

        let suffix_ok = suffix.is_none_or(|s| {
            !s.is_empty()
                && s.bytes()
                    .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'-' | b'+'))
        });

        if !numeric || !suffix_ok {
            return Err(AppError::bad_request(format!(
                "invalid version format: {}",
                value
            )));
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VersionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Display name of a release
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseName(String);

impl ReleaseName {
    pub const MAX_CHARS: usize = 100;

    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into().trim().to_string();

        if value.is_empty() {
            return Err(AppError::bad_request("name is required"));
        }
        if value.chars().count() > Self::MAX_CHARS {
            return Err(AppError::bad_request(format!(
                "name must be at most {} characters",
                Self::MAX_CHARS
            )));
        }

        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
