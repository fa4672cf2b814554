//! Token construction.
//!
//! A conforming client presents a two-segment token
//! `base64url(header).base64url(payload)` — the first two segments of an
//! RS256 JWT with the signature segment dropped — plus a detached
//! signature supplied out-of-band: the dropped third segment converted to
//! the standard base64 alphabet. The authorizer only checks structure and
//! expiry; the gateway checks the detached signature against the
//! registered public key.

use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default token lifetime: one hour.
pub const DEFAULT_TTL_SECS: i64 = 3600;

/// Claims carried by a connection token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Principal identifier.
    pub sub: String,
    /// Expiry instant, Unix seconds.
    pub exp: i64,
}

/// A token plus its detached signature, ready to attach to a connection
/// attempt (query parameters or upgrade headers).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignedToken {
    pub token: String,
    pub signature: String,
}

/// Issues signed connection tokens for client identities.
pub struct TokenFactory {
    key: EncodingKey,
}

impl TokenFactory {
    /// Creates a factory from a PEM-encoded RSA private key.
    pub fn from_rsa_pem(pem: &[u8]) -> Result<Self> {
        let key = EncodingKey::from_rsa_pem(pem).map_err(Error::InvalidKey)?;
        Ok(Self { key })
    }

    /// Issues a token for `id` expiring [`DEFAULT_TTL_SECS`] from now.
    pub fn issue(&self, id: &str) -> Result<SignedToken> {
        self.issue_with_expiry(id, Utc::now().timestamp() + DEFAULT_TTL_SECS)
    }

    /// Issues a token for `id` with an explicit expiry (Unix seconds).
    pub fn issue_with_expiry(&self, id: &str, exp: i64) -> Result<SignedToken> {
        let claims = Claims {
            sub: id.to_string(),
            exp,
        };
        let jwt = jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &self.key)
            .map_err(Error::Signing)?;

        let mut parts = jwt.splitn(3, '.');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(header), Some(payload), Some(signature)) => Ok(SignedToken {
                token: format!("{header}.{payload}"),
                signature: signature_to_standard(signature),
            }),
            _ => Err(Error::UnexpectedShape),
        }
    }
}

/// Converts a base64url signature segment to the standard alphabet with
/// `==` padding, the encoding the gateway expects for the detached
/// signature field.
pub fn signature_to_standard(signature: &str) -> String {
    let mut out: String = signature
        .chars()
        .map(|c| match c {
            '_' => '/',
            '-' => '+',
            c => c,
        })
        .collect();
    out.push_str("==");
    out
}
