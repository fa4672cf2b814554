//! Shared decision constructor.
//!
//! Both authorizers delegate here: the deny decision is always the same
//! empty document, and the allow decision grants the fixed permission set
//! over the principal's private topic and its shadow-get namespace.

use std::collections::BTreeMap;

use tracing::warn;

use crate::config::AuthorizerConfig;
use crate::decision::{
    Action, AuthDecision, Effect, PolicyDocument, Statement, POLICY_VERSION,
};
use crate::encoding::sanitize_principal;

/// Principal reported on every deny decision.
pub const DENY_PRINCIPAL: &str = "custom";

/// Session lifetime hints attached to an authenticated decision.
#[derive(Debug, Clone, Copy)]
pub struct SessionLifetime {
    pub disconnect_after_secs: u64,
    pub refresh_after_secs: u64,
}

/// Builds allow/deny decisions scoped to a principal's topic namespace.
#[derive(Debug, Clone)]
pub struct PolicyBuilder {
    config: AuthorizerConfig,
    lifetime: SessionLifetime,
}

impl PolicyBuilder {
    pub fn new(config: AuthorizerConfig, lifetime: SessionLifetime) -> Self {
        Self { config, lifetime }
    }

    /// The deny decision: unauthenticated, no documents, zero lifetimes.
    pub fn deny(&self) -> AuthDecision {
        AuthDecision {
            is_authenticated: false,
            principal_id: DENY_PRINCIPAL.to_string(),
            disconnect_after_in_seconds: 0,
            refresh_after_in_seconds: 0,
            context: BTreeMap::new(),
            policy_documents: Vec::new(),
        }
    }

    /// The allow decision for the given identity.
    ///
    /// The identity is sanitized to `[A-Za-z0-9]+` first; an identity that
    /// sanitizes to the empty string cannot be expressed as a principal
    /// and resolves to the deny decision instead.
    pub fn allow(&self, identity: &str) -> AuthDecision {
        let principal = sanitize_principal(identity);
        if principal.is_empty() {
            warn!(identity, "identity is empty after sanitization, denying");
            return self.deny();
        }

        AuthDecision {
            is_authenticated: true,
            principal_id: principal.clone(),
            disconnect_after_in_seconds: self.lifetime.disconnect_after_secs,
            refresh_after_in_seconds: self.lifetime.refresh_after_secs,
            context: BTreeMap::new(),
            policy_documents: vec![self.document(&principal)],
        }
    }

    fn document(&self, principal: &str) -> PolicyDocument {
        PolicyDocument {
            version: POLICY_VERSION.to_string(),
            statement: vec![
                // Broadest grant: any client id may connect. Tightening
                // this to a client-id pattern matching the principal is a
                // valid stricter variant.
                Statement {
                    action: Action::Connect.into(),
                    effect: Effect::Allow,
                    resource: "*".to_string().into(),
                },
                Statement {
                    action: Action::Subscribe.into(),
                    effect: Effect::Allow,
                    resource: vec![
                        self.arn("topicfilter", &format!("d/{principal}")),
                        self.arn(
                            "topicfilter",
                            &format!("$aws/things/{principal}/shadow/get/accepted"),
                        ),
                    ]
                    .into(),
                },
                Statement {
                    action: vec![Action::Receive, Action::Publish].into(),
                    effect: Effect::Allow,
                    resource: vec![
                        self.arn("topic", &format!("d/{principal}")),
                        self.arn("topic", &format!("$aws/things/{principal}/shadow/get")),
                        self.arn(
                            "topic",
                            &format!("$aws/things/{principal}/shadow/get/accepted"),
                        ),
                    ]
                    .into(),
                },
            ],
        }
    }

    fn arn(&self, kind: &str, path: &str) -> String {
        format!(
            "arn:aws:iot:{}:{}:{kind}/{path}",
            self.config.region, self.config.account
        )
    }
}
