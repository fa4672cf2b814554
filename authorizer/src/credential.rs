//! Credential authorizer.
//!
//! Accepts the username/password pair of an MQTT CONNECT packet, or a
//! static shared-secret token, and compares against configured secrets.
//! The username may carry a trailing `?`-delimited query segment; the
//! portion before the last `?` is the effective username. The query
//! segment is captured for diagnostics only (reserved for extension).

use tracing::{debug, warn};

use crate::config::{AuthorizerConfig, CredentialConfig};
use crate::decision::AuthDecision;
use crate::encoding::decode_base64_forgiving;
use crate::error::Result;
use crate::policy::{PolicyBuilder, SessionLifetime};
use crate::request::{ConnectionRequest, RequestForm};

/// Session lifetime for credential-authenticated connections: a short
/// window, disconnect and refresh both at five minutes.
pub const CREDENTIAL_LIFETIME: SessionLifetime = SessionLifetime {
    disconnect_after_secs: 300,
    refresh_after_secs: 300,
};

/// Identity granted when the static shared-secret token matches.
pub const STATIC_TOKEN_IDENTITY: &str = "username";

/// Username/password connection authorizer.
pub struct CredentialAuthorizer {
    secrets: CredentialConfig,
    policy: PolicyBuilder,
}

impl CredentialAuthorizer {
    pub fn new(config: AuthorizerConfig, secrets: CredentialConfig) -> Self {
        Self {
            secrets,
            policy: PolicyBuilder::new(config, CREDENTIAL_LIFETIME),
        }
    }

    /// Evaluates one connection attempt.
    ///
    /// Always returns a decision. Every deny carries the fixed principal
    /// `"custom"`; a rejected username is never echoed back.
    pub fn evaluate(&self, request: &ConnectionRequest) -> AuthDecision {
        match request.form() {
            RequestForm::Credentials { username, password } => {
                let (effective, query) = split_username(&username);
                if let Some(query) = query {
                    debug!(query, "username carries a query segment");
                }

                let password = match decode_password(&password) {
                    Ok(p) => p,
                    Err(err) => {
                        warn!(%err, "cannot decode password");
                        return self.policy.deny();
                    }
                };

                if effective == self.secrets.username && password == self.secrets.password {
                    self.policy.allow(effective)
                } else {
                    warn!("invalid username or password");
                    self.policy.deny()
                }
            }
            RequestForm::FlatToken { token } if token == self.secrets.token => {
                self.policy.allow(STATIC_TOKEN_IDENTITY)
            }
            _ => {
                warn!("no recognizable credentials in the request");
                self.policy.deny()
            }
        }
    }
}

/// Splits an optional `?`-delimited query segment off a username.
///
/// The split happens at the last `?`, so `a?b?c` yields effective
/// username `a?b` with query `c`.
fn split_username(username: &str) -> (&str, Option<&str>) {
    match username.rsplit_once('?') {
        Some((name, query)) => (name, Some(query)),
        None => (username, None),
    }
}

/// Decodes the base64 password carried by the gateway into plaintext.
fn decode_password(encoded: &str) -> Result<String> {
    Ok(String::from_utf8(decode_base64_forgiving(encoded)?)?)
}
