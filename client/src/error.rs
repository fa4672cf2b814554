//! Error types for token construction.

use thiserror::Error;

/// Error type for token construction.
#[derive(Error, Debug)]
pub enum Error {
    /// The private key could not be parsed.
    #[error("token: invalid signing key: {0}")]
    InvalidKey(jsonwebtoken::errors::Error),

    /// Signing the claims failed.
    #[error("token: signing failed: {0}")]
    Signing(jsonwebtoken::errors::Error),

    /// The signing backend produced a token without three segments.
    #[error("token: unexpected token shape")]
    UnexpectedShape,
}

/// Result type for token construction.
pub type Result<T> = std::result::Result<T, Error>;
