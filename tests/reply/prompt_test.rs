//! Integration tests for prompt construction and cue stripping.

use std::sync::Arc;

use standin::persona::Persona;
use standin::profile::{Speaker, UserProfile};
use standin::reply::prompt::{strip_cue_echo, PromptBuilder, SamplingParams, RESPONSE_CUE};

fn builder() -> PromptBuilder {
    PromptBuilder::new(
        Arc::new(Persona::default()),
        "HuggingFaceH4/zephyr-7b-beta",
        SamplingParams::default(),
    )
}

fn profile_with_history(turns: usize) -> UserProfile {
    let mut profile = UserProfile::new("user_1");
    profile.display_name = "Sam".to_owned();
    profile.relationship_level = "regular".to_owned();
    for i in 0..turns {
        let speaker = if i % 2 == 0 { Speaker::User } else { Speaker::Bot };
        profile.record_turn(speaker, &format!("message number {i}"));
    }
    profile
}

#[test]
fn conversation_prompt_embeds_persona_and_profile() {
    let request = builder().build("what's new?", &profile_with_history(2), false);

    assert!(request.prompt.contains("Maya"));
    assert!(request.prompt.contains("26"));
    assert!(request.prompt.contains("photography"));
    assert!(request.prompt.contains("Sam"));
    assert!(request.prompt.contains("regular contact"));
    assert!(request.prompt.contains("Their message: \"what's new?\""));
    assert!(request.prompt.ends_with(RESPONSE_CUE));
}

#[test]
fn history_lines_carry_speaker_labels() {
    let request = builder().build("hey", &profile_with_history(2), false);
    assert!(request.prompt.contains("Sam: message number 0"));
    assert!(request.prompt.contains("Maya: message number 1"));
}

#[test]
fn prompt_includes_at_most_ten_turns() {
    let request = builder().build("hey", &profile_with_history(15), false);
    // Turns 0-4 fall outside the 10-turn window; 5-14 are included.
    assert!(!request.prompt.contains("message number 4\n"));
    assert!(request.prompt.contains("message number 5"));
    assert!(request.prompt.contains("message number 14"));
}

#[test]
fn empty_history_omits_the_recent_section() {
    let request = builder().build("hey", &UserProfile::new("u"), false);
    assert!(!request.prompt.contains("Recent messages:"));
}

#[test]
fn suspicious_prompt_forbids_self_disclosure() {
    let request = builder().build("are you a bot?", &profile_with_history(4), true);
    assert!(request.prompt.contains("Never say or imply"));
    assert!(request.prompt.contains("are you a bot?"));
    // The deflection prompt carries no conversation history.
    assert!(!request.prompt.contains("message number"));
    assert!(request.prompt.ends_with(RESPONSE_CUE));
}

#[test]
fn request_carries_sampling_params_and_model() {
    let sampling = SamplingParams {
        max_new_tokens: 64,
        temperature: 0.5,
        top_p: 0.8,
        sample: false,
    };
    let prompts = PromptBuilder::new(Arc::new(Persona::default()), "my-model", sampling);
    let request = prompts.build("hey", &UserProfile::new("u"), false);
    assert_eq!(request.model, "my-model");
    assert_eq!(request.max_new_tokens, 64);
    assert!((request.temperature - 0.5).abs() < f32::EPSILON);
    assert!((request.top_p - 0.8).abs() < f32::EPSILON);
    assert!(!request.sample);
}

#[test]
fn cue_echo_stripping_handles_model_artifacts() {
    assert_eq!(
        strip_cue_echo("...prompt...\n\nYour response: sounds fun!", "Maya"),
        "sounds fun!"
    );
    assert_eq!(
        strip_cue_echo("Your response: Maya: \"omg yes\"", "Maya"),
        "omg yes"
    );
    assert_eq!(strip_cue_echo("  plain reply  ", "Maya"), "plain reply");
    assert_eq!(strip_cue_echo("", "Maya"), "");
}
