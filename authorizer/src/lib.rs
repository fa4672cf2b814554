//! Custom connection authorizers for an MQTT gateway.
//!
//! This crate implements the decision logic invoked by a broker's
//! connection gateway: given an inbound connection attempt carrying a
//! bearer token or an MQTT username/password pair, decide whether to
//! allow the connection and compute the permission set granted to the
//! identity for the life of the connection.
//!
//! Two authorizer variants share one policy constructor:
//!
//! - [`TokenAuthorizer`] checks a two-segment bearer token (structure and
//!   expiry only; signature verification, when required, happens in the
//!   gateway in front of this function).
//! - [`CredentialAuthorizer`] compares a username/password pair, or a
//!   static shared-secret token, against configured secrets.
//!
//! Both are stateless pure functions of (request, configuration): no
//! shared mutable state, no I/O, and every failure converts into a deny
//! decision rather than an error crossing the boundary.
//!
//! # Example
//!
//! ```
//! use mqgate_authorizer::{AuthorizerConfig, ConnectionRequest, TokenAuthorizer};
//!
//! let authorizer = TokenAuthorizer::new(AuthorizerConfig::new("eu-west-1", "123456789012"));
//! let request = ConnectionRequest {
//!     token: Some("not-a-token".to_string()),
//!     ..Default::default()
//! };
//! let decision = authorizer.evaluate(&request);
//! assert!(!decision.is_authenticated);
//! ```

mod config;
mod credential;
mod decision;
mod encoding;
mod error;
mod policy;
mod request;
#[cfg(test)]
mod tests;
mod token;

pub use config::{AuthorizerConfig, CredentialConfig};
pub use credential::{CredentialAuthorizer, CREDENTIAL_LIFETIME, STATIC_TOKEN_IDENTITY};
pub use decision::{
    Action, AuthDecision, Effect, OneOrMany, PolicyDocument, Statement, POLICY_VERSION,
};
pub use encoding::{decode_base64_forgiving, sanitize_principal};
pub use error::{Error, Result};
pub use policy::{PolicyBuilder, SessionLifetime, DENY_PRINCIPAL};
pub use request::{ConnectionRequest, HttpData, MqttData, ProtocolData, RequestForm};
pub use token::{TokenAuthorizer, TOKEN_LIFETIME};
