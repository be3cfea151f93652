//! Webhook payload parsing and verification-handshake tests.

use standin::platform::webhook::{verify_subscription, VerifyParams, WebhookEnvelope};

fn sample_envelope() -> &'static str {
    r#"{
        "object": "instagram",
        "entry": [
            {
                "messaging": [
                    { "sender": {"id": "111"}, "message": {"text": "hey!"} },
                    { "sender": {"id": "222"}, "message": {"attachments": []} },
                    { "sender": {"id": "333"} }
                ]
            },
            {
                "messaging": [
                    { "sender": {"id": "444"}, "message": {"text": "second entry"} }
                ]
            }
        ]
    }"#
}

#[test]
fn envelope_extracts_text_messages_across_entries() {
    let envelope: WebhookEnvelope =
        serde_json::from_str(sample_envelope()).expect("should parse");
    let messages = envelope.text_messages("instagram");
    assert_eq!(
        messages,
        vec![
            ("111".to_owned(), "hey!".to_owned()),
            ("444".to_owned(), "second entry".to_owned()),
        ]
    );
}

#[test]
fn foreign_object_yields_no_messages() {
    let envelope: WebhookEnvelope =
        serde_json::from_str(sample_envelope()).expect("should parse");
    assert!(envelope.text_messages("page").is_empty());
}

#[test]
fn envelope_without_entries_parses() {
    let envelope: WebhookEnvelope =
        serde_json::from_str(r#"{"object": "instagram"}"#).expect("should parse");
    assert!(envelope.text_messages("instagram").is_empty());
}

fn verify_params(mode: &str, token: &str, challenge: &str) -> VerifyParams {
    VerifyParams {
        mode: Some(mode.to_owned()),
        verify_token: Some(token.to_owned()),
        challenge: Some(challenge.to_owned()),
    }
}

#[test]
fn verification_echoes_challenge_for_matching_token() {
    let params = verify_params("subscribe", "secret", "12345");
    assert_eq!(
        verify_subscription(&params, "secret"),
        Some("12345".to_owned())
    );
}

#[test]
fn verification_rejects_wrong_token_or_mode() {
    let wrong_token = verify_params("subscribe", "nope", "12345");
    assert_eq!(verify_subscription(&wrong_token, "secret"), None);

    let wrong_mode = verify_params("unsubscribe", "secret", "12345");
    assert_eq!(verify_subscription(&wrong_mode, "secret"), None);

    assert_eq!(verify_subscription(&VerifyParams::default(), "secret"), None);
}
