//! Error types for the authorizer library.

use thiserror::Error;

/// Error type for authorizer operations.
///
/// These errors are internal to an evaluation: `evaluate` itself never
/// returns them. Every failure is converted into a deny decision at the
/// authorizer boundary.
#[derive(Error, Debug)]
pub enum Error {
    /// Token does not have exactly two dot-separated segments.
    #[error("auth: malformed token: expected 2 segments, got {0}")]
    MalformedToken(usize),

    /// Base64 decode failure in a token payload or password.
    #[error("auth: invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Token payload is not valid JSON.
    #[error("auth: token payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Decoded bytes are not valid UTF-8.
    #[error("auth: decoded value is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Token expiry instant is in the past.
    #[error("auth: token expired")]
    TokenExpired,

    /// A required claim is missing or empty.
    #[error("auth: missing claim: {0}")]
    MissingClaim(&'static str),

    /// A required environment variable is not set.
    #[error("auth: missing environment variable: {0}")]
    MissingEnv(&'static str),
}

/// Result type for authorizer operations.
pub type Result<T> = std::result::Result<T, Error>;
