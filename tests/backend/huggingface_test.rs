//! Wire-format tests for the Hugging Face backend.

use standin::backend::huggingface::{build_request, parse_response};
use standin::backend::{BackendError, GenerationRequest};

fn generation_request() -> GenerationRequest {
    GenerationRequest {
        prompt: "About me: ...\n\nYour response:".to_owned(),
        model: "HuggingFaceH4/zephyr-7b-beta".to_owned(),
        max_new_tokens: 120,
        temperature: 0.9,
        top_p: 0.95,
        sample: true,
    }
}

#[test]
fn request_maps_sampling_parameters() {
    let wire = build_request(&generation_request());
    let encoded = serde_json::to_value(&wire).expect("should encode");

    assert_eq!(encoded["inputs"], "About me: ...\n\nYour response:");
    assert_eq!(encoded["parameters"]["max_new_tokens"], 120);
    assert_eq!(encoded["parameters"]["do_sample"], true);
    assert_eq!(encoded["parameters"]["return_full_text"], false);
}

#[test]
fn response_takes_first_generation() {
    let body = r#"[{"generated_text": "sounds fun!"}, {"generated_text": "other"}]"#;
    let text = parse_response(body).expect("should parse");
    assert_eq!(text, "sounds fun!");
}

#[test]
fn empty_generation_array_is_a_parse_error() {
    let result = parse_response("[]");
    assert!(matches!(result, Err(BackendError::Parse(_))));
}

#[test]
fn malformed_body_is_a_parse_error() {
    let result = parse_response(r#"{"error": "model loading"}"#);
    assert!(matches!(result, Err(BackendError::Parse(_))));
}
