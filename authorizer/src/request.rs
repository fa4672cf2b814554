//! Gateway invocation event model.
//!
//! The gateway hands the authorizer one connection-attempt record per
//! inbound connection. The record may carry a protocol-data block (an
//! HTTP-style query string from the WebSocket upgrade, or the
//! username/password fields of an MQTT CONNECT packet) or a flat `token`
//! field. The shape is resolved once, up front, into a [`RequestForm`];
//! the authorizers never probe optional fields themselves.

use serde::{Deserialize, Serialize};

/// A connection-attempt record as delivered by the gateway.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionRequest {
    /// Protocol-specific data attached by the transport listener.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol_data: Option<ProtocolData>,

    /// Flat token field, used when the client passes the token in the
    /// invocation payload rather than the transport layer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Whether the gateway already verified a detached signature over the
    /// token. Carried but not interpreted at this layer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature_verified: Option<bool>,

    /// Detached signature over the token, if the client supplied one.
    /// Carried but not interpreted at this layer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_signature: Option<String>,

    /// Name hint for the authorizer the client intended to invoke.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorizer_name: Option<String>,
}

/// Protocol-specific block of a connection attempt.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http: Option<HttpData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mqtt: Option<MqttData>,
}

/// Data from the WebSocket/HTTP upgrade request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpData {
    /// Raw query string, e.g. `?token=abc.def&x=y`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_string: Option<String>,
}

/// Credentials from an MQTT CONNECT packet.
///
/// The password is base64-encoded by the gateway before invocation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MqttData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
}

/// The resolved shape of a connection attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestForm {
    /// A `token` parameter found in the upgrade request's query string.
    Query { token: String },
    /// MQTT CONNECT credentials; the password is still base64 as carried
    /// by the gateway.
    Credentials { username: String, password: String },
    /// A flat `token` field on the record itself.
    FlatToken { token: String },
    /// None of the recognized shapes.
    Unrecognized,
}

impl ConnectionRequest {
    /// Resolves the record into its tagged form.
    ///
    /// MQTT credentials win over a query-string token, which wins over the
    /// flat token field. A protocol block with incomplete credentials (no
    /// username or no password) is not a credential form.
    pub fn form(&self) -> RequestForm {
        if let Some(data) = &self.protocol_data {
            if let Some(mqtt) = &data.mqtt {
                if let (Some(username), Some(password)) = (&mqtt.username, &mqtt.password) {
                    return RequestForm::Credentials {
                        username: username.clone(),
                        password: password.clone(),
                    };
                }
            }
            if let Some(http) = &data.http {
                if let Some(query) = &http.query_string {
                    if let Some(token) = query_token(query) {
                        return RequestForm::Query { token };
                    }
                }
            }
        }
        if let Some(token) = &self.token {
            return RequestForm::FlatToken {
                token: token.clone(),
            };
        }
        RequestForm::Unrecognized
    }
}

/// Extracts the `token` parameter from a raw query string.
fn query_token(query: &str) -> Option<String> {
    let query = query.strip_prefix('?').unwrap_or(query);
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(k, _)| k == "token")
        .map(|(_, v)| v.into_owned())
}
