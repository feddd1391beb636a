//! Boundary error
//!
//! Every crate's error enum collapses into [`AppError`] before it is written
//! to the wire: an HTTP class ([`ErrorKind`]), a business [`ErrorCode`] and a
//! client-safe message. The optional source stays server side.

use std::borrow::Cow;
use std::error::Error;
use std::fmt;

use super::code::ErrorCode;
use super::kind::ErrorKind;

/// Error as the client sees it
///
/// ```rust
/// use kernel::error::{app_error::AppError, code::ErrorCode};
///
/// let err = AppError::unauthorized("invalid or expired session")
///     .with_code(ErrorCode::TOKEN_EXPIRED);
/// assert_eq!(err.status_code(), 401);
/// assert_eq!(err.code().value(), 3003);
/// ```
pub struct AppError {
    kind: ErrorKind,
    code: Option<ErrorCode>,
    message: Cow<'static, str>,
    source: Option<Box<dyn Error + Send + Sync + 'static>>,
}

pub type AppResult<T> = Result<T, AppError>;

type Message = Cow<'static, str>;

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<Message>) -> Self {
        Self {
            kind,
            code: None,
            message: message.into(),
            source: None,
        }
    }

    pub fn bad_request(message: impl Into<Message>) -> Self {
        Self::new(ErrorKind::BadRequest, message)
    }

    pub fn unauthorized(message: impl Into<Message>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    pub fn forbidden(message: impl Into<Message>) -> Self {
        Self::new(ErrorKind::Forbidden, message)
    }

    pub fn not_found(message: impl Into<Message>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn conflict(message: impl Into<Message>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// A collaborator call ran past its deadline
    pub fn timeout(message: impl Into<Message>) -> Self {
        Self::new(ErrorKind::Timeout, message)
    }

    pub fn storage(message: impl Into<Message>) -> Self {
        Self::new(ErrorKind::Storage, message)
    }

    pub fn internal(message: impl Into<Message>) -> Self {
        Self::new(ErrorKind::InternalServerError, message)
    }

    /// Replace the kind's default business code (e.g. 3001 instead of 1003)
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Attach the underlying cause; it is logged, never serialized
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn code(&self) -> ErrorCode {
        self.code.unwrap_or_else(|| self.kind.default_code())
    }

    pub fn status_code(&self) -> u16 {
        self.kind.status_code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_server_error(&self) -> bool {
        self.kind.is_server_error()
    }
}

impl fmt::Debug for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("AppError");
        out.field("kind", &self.kind)
            .field("code", &self.code())
            .field("message", &self.message);
        if let Some(source) = &self.source {
            out.field("source", source);
        }
        out.finish()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} {}] {}", self.kind, self.code(), self.message)
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn Error + 'static))
    }
}
