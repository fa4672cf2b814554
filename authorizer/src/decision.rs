//! Authorization decision wire model.
//!
//! Field names are fixed by the gateway contract (`isAuthenticated`,
//! `principalId`, ...); the policy document uses the gateway's
//! capitalized statement keys and its string-or-list convention for
//! `Action` and `Resource`.

use std::collections::BTreeMap;

use serde::Serialize;

/// Policy document version understood by the gateway.
pub const POLICY_VERSION: &str = "2012-10-17";

/// The decision returned to the gateway for one connection attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthDecision {
    pub is_authenticated: bool,
    /// Principal identifier, restricted to `[A-Za-z0-9]+` on the
    /// authenticated path; `"custom"` on every deny.
    pub principal_id: String,
    pub disconnect_after_in_seconds: u64,
    pub refresh_after_in_seconds: u64,
    /// Opaque key/value context. Always empty in this design; reserved
    /// for extension.
    pub context: BTreeMap<String, String>,
    /// Permission documents enforced for the life of the connection.
    /// Empty when unauthenticated.
    pub policy_documents: Vec<PolicyDocument>,
}

/// One versioned list of permission statements.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolicyDocument {
    #[serde(rename = "Version")]
    pub version: String,
    #[serde(rename = "Statement")]
    pub statement: Vec<Statement>,
}

/// A single permission grant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statement {
    #[serde(rename = "Action")]
    pub action: OneOrMany<Action>,
    #[serde(rename = "Effect")]
    pub effect: Effect,
    #[serde(rename = "Resource")]
    pub resource: OneOrMany<String>,
}

/// Statement effect. Only `Allow` is ever emitted; deny is expressed by
/// returning no documents at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Effect {
    Allow,
}

/// Connection-gateway actions a statement can grant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Action {
    #[serde(rename = "iot:Connect")]
    Connect,
    #[serde(rename = "iot:Subscribe")]
    Subscribe,
    #[serde(rename = "iot:Publish")]
    Publish,
    #[serde(rename = "iot:Receive")]
    Receive,
}

/// Serializes as a bare value for one element and as a list otherwise,
/// matching the gateway's policy grammar.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> From<T> for OneOrMany<T> {
    fn from(v: T) -> Self {
        OneOrMany::One(v)
    }
}

impl<T> From<Vec<T>> for OneOrMany<T> {
    fn from(v: Vec<T>) -> Self {
        OneOrMany::Many(v)
    }
}
