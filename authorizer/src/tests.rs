//! Unit tests for the authorizers and the shared policy constructor.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use serde_json::json;

use crate::{
    decode_base64_forgiving, sanitize_principal, AuthorizerConfig, ConnectionRequest,
    CredentialAuthorizer, CredentialConfig, HttpData, MqttData, ProtocolData, RequestForm,
    TokenAuthorizer, DENY_PRINCIPAL, POLICY_VERSION,
};

fn config() -> AuthorizerConfig {
    AuthorizerConfig::new("eu-west-1", "123456789012")
}

fn secrets() -> CredentialConfig {
    CredentialConfig::new("aladdin", "opensesame", "allow-me")
}

/// Builds a two-segment token the way a conforming client does: a header
/// segment and a JSON payload segment, base64url without padding.
fn token_with_payload(payload: &serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256","typ":"JWT"}"#);
    let body = URL_SAFE_NO_PAD.encode(payload.to_string().as_bytes());
    format!("{header}.{body}")
}

fn token_for(sub: &str, exp: i64) -> String {
    token_with_payload(&json!({ "sub": sub, "exp": exp }))
}

fn future_exp() -> i64 {
    Utc::now().timestamp() + 3600
}

fn flat_token_request(token: &str) -> ConnectionRequest {
    ConnectionRequest {
        token: Some(token.to_string()),
        ..Default::default()
    }
}

fn query_request(query: &str) -> ConnectionRequest {
    ConnectionRequest {
        protocol_data: Some(ProtocolData {
            http: Some(HttpData {
                query_string: Some(query.to_string()),
            }),
            mqtt: None,
        }),
        ..Default::default()
    }
}

fn mqtt_request(username: &str, password_b64: &str) -> ConnectionRequest {
    ConnectionRequest {
        protocol_data: Some(ProtocolData {
            http: None,
            mqtt: Some(MqttData {
                username: Some(username.to_string()),
                password: Some(password_b64.to_string()),
                client_id: None,
            }),
        }),
        ..Default::default()
    }
}

// --- request resolution ---

#[test]
fn resolves_query_form() {
    let token = token_for("dev", future_exp());
    let request = query_request(&format!("?token={token}&other=1"));
    assert_eq!(request.form(), RequestForm::Query { token });
}

#[test]
fn resolves_flat_token_when_query_has_no_token() {
    let request = ConnectionRequest {
        protocol_data: Some(ProtocolData {
            http: Some(HttpData {
                query_string: Some("a=1&b=2".to_string()),
            }),
            mqtt: None,
        }),
        token: Some("fallback".to_string()),
        ..Default::default()
    };
    assert_eq!(
        request.form(),
        RequestForm::FlatToken {
            token: "fallback".to_string()
        }
    );
}

#[test]
fn credentials_win_over_flat_token() {
    let mut request = mqtt_request("user", "cGFzcw==");
    request.token = Some("ignored".to_string());
    assert!(matches!(request.form(), RequestForm::Credentials { .. }));
}

#[test]
fn incomplete_credentials_are_unrecognized() {
    let request = ConnectionRequest {
        protocol_data: Some(ProtocolData {
            http: None,
            mqtt: Some(MqttData {
                username: Some("user".to_string()),
                password: None,
                client_id: None,
            }),
        }),
        ..Default::default()
    };
    assert_eq!(request.form(), RequestForm::Unrecognized);
}

#[test]
fn empty_request_is_unrecognized() {
    assert_eq!(ConnectionRequest::default().form(), RequestForm::Unrecognized);
}

// --- token authorizer ---

#[test]
fn token_with_future_exp_authenticates() {
    let authorizer = TokenAuthorizer::new(config());
    let decision = authorizer.evaluate(&flat_token_request(&token_for("device-001", future_exp())));

    assert!(decision.is_authenticated);
    assert_eq!(decision.principal_id, "device001");
    assert_eq!(decision.disconnect_after_in_seconds, 86_400);
    assert_eq!(decision.refresh_after_in_seconds, 600);
    assert!(decision.context.is_empty());
    assert_eq!(decision.policy_documents.len(), 1);
}

#[test]
fn token_from_query_string_authenticates() {
    let authorizer = TokenAuthorizer::new(config());
    let token = token_for("gadget", future_exp());
    let decision = authorizer.evaluate(&query_request(&format!("?token={token}")));

    assert!(decision.is_authenticated);
    assert_eq!(decision.principal_id, "gadget");
}

#[test]
fn expired_token_denies() {
    let authorizer = TokenAuthorizer::new(config());
    let past = Utc::now().timestamp() - 3600;
    let decision = authorizer.evaluate(&flat_token_request(&token_for("device-001", past)));

    assert!(!decision.is_authenticated);
    assert_eq!(decision.principal_id, DENY_PRINCIPAL);
    assert!(decision.policy_documents.is_empty());
    assert_eq!(decision.disconnect_after_in_seconds, 0);
    assert_eq!(decision.refresh_after_in_seconds, 0);
}

#[test]
fn token_without_exp_denies() {
    let authorizer = TokenAuthorizer::new(config());
    let token = token_with_payload(&json!({ "sub": "device-001" }));
    assert!(!authorizer.evaluate(&flat_token_request(&token)).is_authenticated);
}

#[test]
fn token_without_sub_denies() {
    let authorizer = TokenAuthorizer::new(config());
    let token = token_with_payload(&json!({ "exp": future_exp() }));
    assert!(!authorizer.evaluate(&flat_token_request(&token)).is_authenticated);
}

#[test]
fn token_with_empty_sub_denies() {
    let authorizer = TokenAuthorizer::new(config());
    let token = token_for("", future_exp());
    assert!(!authorizer.evaluate(&flat_token_request(&token)).is_authenticated);
}

#[test]
fn sub_that_sanitizes_to_nothing_denies() {
    let authorizer = TokenAuthorizer::new(config());
    let token = token_for("!!!", future_exp());
    let decision = authorizer.evaluate(&flat_token_request(&token));

    assert!(!decision.is_authenticated);
    assert_eq!(decision.principal_id, DENY_PRINCIPAL);
}

#[test]
fn wrong_segment_count_denies() {
    let authorizer = TokenAuthorizer::new(config());
    for token in ["onesegment", "a.b.c", "a.b.c.d", ""] {
        let decision = authorizer.evaluate(&flat_token_request(token));
        assert!(!decision.is_authenticated, "token {token:?} must deny");
    }
}

#[test]
fn undecodable_payload_denies() {
    let authorizer = TokenAuthorizer::new(config());
    assert!(!authorizer
        .evaluate(&flat_token_request("head.%%%%"))
        .is_authenticated);
}

#[test]
fn non_json_payload_denies() {
    let authorizer = TokenAuthorizer::new(config());
    let body = URL_SAFE_NO_PAD.encode(b"not json at all");
    assert!(!authorizer
        .evaluate(&flat_token_request(&format!("head.{body}")))
        .is_authenticated);
}

#[test]
fn request_without_token_denies_with_custom_principal() {
    let authorizer = TokenAuthorizer::new(config());
    let decision = authorizer.evaluate(&ConnectionRequest::default());

    assert!(!decision.is_authenticated);
    assert_eq!(decision.principal_id, DENY_PRINCIPAL);
    assert!(decision.policy_documents.is_empty());
}

#[test]
fn evaluation_is_idempotent() {
    let authorizer = TokenAuthorizer::new(config());
    let request = flat_token_request(&token_for("device-001", future_exp()));
    assert_eq!(authorizer.evaluate(&request), authorizer.evaluate(&request));
}

// --- credential authorizer ---

#[test]
fn matching_credentials_authenticate() {
    let authorizer = CredentialAuthorizer::new(config(), secrets());
    // "opensesame", standard base64 with padding, as the gateway carries it
    let request = serde_json::from_value::<ConnectionRequest>(json!({
        "protocolData": { "mqtt": { "username": "aladdin", "password": "b3BlbnNlc2FtZQ==" } }
    }))
    .unwrap();
    let decision = authorizer.evaluate(&request);

    assert!(decision.is_authenticated);
    assert_eq!(decision.principal_id, "aladdin");
    assert_eq!(decision.disconnect_after_in_seconds, 300);
    assert_eq!(decision.refresh_after_in_seconds, 300);
    assert_eq!(decision.policy_documents.len(), 1);
}

#[test]
fn username_query_segment_is_stripped_before_matching() {
    let authorizer = CredentialAuthorizer::new(config(), secrets());
    let decision = authorizer.evaluate(&mqtt_request("aladdin?sdk=rust&v=1", "b3BlbnNlc2FtZQ=="));

    assert!(decision.is_authenticated);
    assert_eq!(decision.principal_id, "aladdin");
}

#[test]
fn wrong_password_denies_silently() {
    let authorizer = CredentialAuthorizer::new(config(), secrets());
    let decision = authorizer.evaluate(&mqtt_request("aladdin", "d3Jvbmc=")); // "wrong"

    assert!(!decision.is_authenticated);
    assert_eq!(decision.principal_id, DENY_PRINCIPAL);
    assert!(decision.policy_documents.is_empty());
    assert_eq!(decision.disconnect_after_in_seconds, 0);
}

#[test]
fn wrong_username_denies() {
    let authorizer = CredentialAuthorizer::new(config(), secrets());
    let decision = authorizer.evaluate(&mqtt_request("genie", "b3BlbnNlc2FtZQ=="));
    assert!(!decision.is_authenticated);
}

#[test]
fn undecodable_password_denies() {
    let authorizer = CredentialAuthorizer::new(config(), secrets());
    let decision = authorizer.evaluate(&mqtt_request("aladdin", "%%%"));
    assert!(!decision.is_authenticated);
}

#[test]
fn static_token_authenticates_with_placeholder_identity() {
    let authorizer = CredentialAuthorizer::new(config(), secrets());
    let decision = authorizer.evaluate(&flat_token_request("allow-me"));

    assert!(decision.is_authenticated);
    assert_eq!(decision.principal_id, "username");
}

#[test]
fn wrong_static_token_denies() {
    let authorizer = CredentialAuthorizer::new(config(), secrets());
    assert!(!authorizer
        .evaluate(&flat_token_request("deny-me"))
        .is_authenticated);
}

#[test]
fn bearer_token_does_not_satisfy_the_credential_variant() {
    let authorizer = CredentialAuthorizer::new(config(), secrets());
    let decision = authorizer.evaluate(&flat_token_request(&token_for("aladdin", future_exp())));

    assert!(!decision.is_authenticated);
    assert_eq!(decision.principal_id, DENY_PRINCIPAL);
}

// --- decision serialization ---

#[test]
fn allow_decision_serializes_with_gateway_field_names() {
    let authorizer = CredentialAuthorizer::new(config(), secrets());
    let decision = authorizer.evaluate(&mqtt_request("aladdin", "b3BlbnNlc2FtZQ=="));
    let value = serde_json::to_value(&decision).unwrap();

    assert_eq!(value["isAuthenticated"], json!(true));
    assert_eq!(value["principalId"], json!("aladdin"));
    assert_eq!(value["disconnectAfterInSeconds"], json!(300));
    assert_eq!(value["refreshAfterInSeconds"], json!(300));
    assert_eq!(value["context"], json!({}));

    let document = &value["policyDocuments"][0];
    assert_eq!(document["Version"], json!(POLICY_VERSION));

    let statements = document["Statement"].as_array().unwrap();
    assert_eq!(statements.len(), 3);
    assert_eq!(statements[0]["Action"], json!("iot:Connect"));
    assert_eq!(statements[0]["Effect"], json!("Allow"));
    assert_eq!(statements[0]["Resource"], json!("*"));
    assert_eq!(
        statements[1]["Resource"],
        json!([
            "arn:aws:iot:eu-west-1:123456789012:topicfilter/d/aladdin",
            "arn:aws:iot:eu-west-1:123456789012:topicfilter/$aws/things/aladdin/shadow/get/accepted",
        ])
    );
    assert_eq!(statements[2]["Action"], json!(["iot:Receive", "iot:Publish"]));
    assert_eq!(
        statements[2]["Resource"],
        json!([
            "arn:aws:iot:eu-west-1:123456789012:topic/d/aladdin",
            "arn:aws:iot:eu-west-1:123456789012:topic/$aws/things/aladdin/shadow/get",
            "arn:aws:iot:eu-west-1:123456789012:topic/$aws/things/aladdin/shadow/get/accepted",
        ])
    );
}

#[test]
fn deny_decision_serializes_with_gateway_field_names() {
    let authorizer = TokenAuthorizer::new(config());
    let value = serde_json::to_value(authorizer.evaluate(&ConnectionRequest::default())).unwrap();

    assert_eq!(
        value,
        json!({
            "isAuthenticated": false,
            "principalId": "custom",
            "disconnectAfterInSeconds": 0,
            "refreshAfterInSeconds": 0,
            "context": {},
            "policyDocuments": [],
        })
    );
}

// --- helpers ---

#[test]
fn sanitize_strips_everything_but_alphanumerics() {
    assert_eq!(sanitize_principal("device-001"), "device001");
    assert_eq!(sanitize_principal("a.b/c_d"), "abcd");
    assert_eq!(sanitize_principal("plain"), "plain");
    assert_eq!(sanitize_principal(""), "");
    assert_eq!(sanitize_principal("!?#"), "");
}

#[test]
fn forgiving_decode_accepts_both_alphabets() {
    // same bytes, standard vs url-safe alphabet
    let standard = decode_base64_forgiving("++/+").unwrap();
    let url_safe = decode_base64_forgiving("--_-").unwrap();
    assert_eq!(standard, url_safe);
}

#[test]
fn forgiving_decode_ignores_padding_presence() {
    assert_eq!(decode_base64_forgiving("cGFzcw==").unwrap(), b"pass");
    assert_eq!(decode_base64_forgiving("cGFzcw").unwrap(), b"pass");
}

#[test]
fn forgiving_decode_empty_input_is_empty() {
    assert_eq!(decode_base64_forgiving("").unwrap(), Vec::<u8>::new());
}

#[test]
fn forgiving_decode_rejects_impossible_length() {
    assert!(decode_base64_forgiving("abcde").is_err());
}

#[test]
fn forgiving_decode_rejects_invalid_symbols() {
    assert!(decode_base64_forgiving("%%%%").is_err());
}
