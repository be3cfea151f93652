//! Wire-format tests for the OpenAI-compatible backend.

use standin::backend::openai::{build_request, parse_response};
use standin::backend::{BackendError, GenerationRequest};

fn generation_request(sample: bool) -> GenerationRequest {
    GenerationRequest {
        prompt: "say hi".to_owned(),
        model: "gpt-4o-mini".to_owned(),
        max_new_tokens: 64,
        temperature: 0.9,
        top_p: 0.95,
        sample,
    }
}

#[test]
fn request_wraps_prompt_in_a_user_message() {
    let wire = build_request(&generation_request(true));
    let encoded = serde_json::to_value(&wire).expect("should encode");

    assert_eq!(encoded["model"], "gpt-4o-mini");
    assert_eq!(encoded["messages"][0]["role"], "user");
    assert_eq!(encoded["messages"][0]["content"], "say hi");
    assert_eq!(encoded["max_tokens"], 64);
}

#[test]
fn disabling_sampling_forces_zero_temperature() {
    let wire = build_request(&generation_request(false));
    let encoded = serde_json::to_value(&wire).expect("should encode");
    assert_eq!(encoded["temperature"], 0.0);
}

#[test]
fn response_takes_first_choice_content() {
    let body = r#"{"choices": [{"message": {"content": "hey there!"}}]}"#;
    assert_eq!(parse_response(body).expect("should parse"), "hey there!");
}

#[test]
fn missing_content_is_a_parse_error() {
    let body = r#"{"choices": [{"message": {}}]}"#;
    assert!(matches!(parse_response(body), Err(BackendError::Parse(_))));
}

#[test]
fn empty_choices_is_a_parse_error() {
    assert!(matches!(
        parse_response(r#"{"choices": []}"#),
        Err(BackendError::Parse(_))
    ));
}
