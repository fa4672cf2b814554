//! Authorizer configuration.
//!
//! Configuration is immutable process-wide state: read once at startup
//! (typically via `from_env`) and injected into the authorizers at
//! construction. The decision functions never read ambient globals.

use std::env;
use std::fmt;

use crate::error::{Error, Result};

/// Deployment identifiers used to build fully-qualified resource names
/// inside policy statements.
#[derive(Debug, Clone)]
pub struct AuthorizerConfig {
    /// Region identifier, e.g. `eu-west-1`.
    pub region: String,
    /// Account identifier.
    pub account: String,
}

impl AuthorizerConfig {
    pub fn new(region: impl Into<String>, account: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            account: account.into(),
        }
    }

    /// Reads `AWS_REGION` and `AWS_ACCOUNT` from the environment.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            region: require_env("AWS_REGION")?,
            account: require_env("AWS_ACCOUNT")?,
        })
    }
}

/// Secrets for the credential authorizer: a username/password pair and a
/// static shared-secret token.
#[derive(Clone)]
pub struct CredentialConfig {
    pub username: String,
    pub password: String,
    pub token: String,
}

impl CredentialConfig {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            token: token.into(),
        }
    }

    /// Reads `USERNAME`, `PASSWORD` and `TOKEN` from the environment.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            username: require_env("USERNAME")?,
            password: require_env("PASSWORD")?,
            token: require_env("TOKEN")?,
        })
    }
}

// Secrets stay out of debug output.
impl fmt::Debug for CredentialConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialConfig")
            .field("username", &self.username)
            .field("password", &"***")
            .field("token", &"***")
            .finish()
    }
}

fn require_env(name: &'static str) -> Result<String> {
    env::var(name).map_err(|_| Error::MissingEnv(name))
}
