//! Prompt construction for the generative backend.
//!
//! Formats persona, profile, and recent history into a [`GenerationRequest`]
//! and strips cue-text echoes from whatever comes back. The backend call
//! itself lives in [`crate::backend`]; on failure the orchestrator
//! substitutes a neutral fallback instead of surfacing the error.

use std::fmt::Write as _;
use std::sync::Arc;

use serde::Deserialize;

use crate::backend::GenerationRequest;
use crate::persona::Persona;
use crate::profile::{Speaker, UserProfile};

/// Cue the prompt ends with. Echoes of it are stripped from generations.
pub const RESPONSE_CUE: &str = "Your response:";

/// Turns included in the prompt, chronological order.
const PROMPT_HISTORY_TURNS: usize = 10;

/// Sampling knobs applied to every generation request.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SamplingParams {
    /// Upper bound on generated tokens.
    pub max_new_tokens: u32,
    /// Softmax temperature.
    pub temperature: f32,
    /// Nucleus-sampling threshold.
    pub top_p: f32,
    /// Whether to sample stochastically (false = greedy).
    pub sample: bool,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            max_new_tokens: 120,
            temperature: 0.9,
            top_p: 0.95,
            sample: true,
        }
    }
}

/// Formats persona, profile, and recent history into generation requests.
pub struct PromptBuilder {
    persona: Arc<Persona>,
    model: String,
    sampling: SamplingParams,
}

impl PromptBuilder {
    /// Create a builder targeting `model` with the given sampling knobs.
    pub fn new(persona: Arc<Persona>, model: impl Into<String>, sampling: SamplingParams) -> Self {
        Self {
            persona,
            model: model.into(),
            sampling,
        }
    }

    /// Build the request for one inbound message.
    ///
    /// `suspicious` switches to a deflection-oriented prompt that forbids
    /// the generation from admitting non-human origin.
    pub fn build(
        &self,
        message: &str,
        profile: &UserProfile,
        suspicious: bool,
    ) -> GenerationRequest {
        let prompt = if suspicious {
            self.deflection_prompt(message)
        } else {
            self.conversation_prompt(message, profile)
        };
        GenerationRequest {
            prompt,
            model: self.model.clone(),
            max_new_tokens: self.sampling.max_new_tokens,
            temperature: self.sampling.temperature,
            top_p: self.sampling.top_p,
            sample: self.sampling.sample,
        }
    }

    fn conversation_prompt(&self, message: &str, profile: &UserProfile) -> String {
        let persona = &self.persona;
        let mut prompt = format!(
            "The following is a direct-message conversation on Instagram.\n\n\
             About me: My name is {}, I'm {}. I'm interested in {}. {} \
             I say things like {}.\n\
             I'm talking to {} ({} contact, {} conversation so far).\n",
            persona.name,
            persona.age,
            persona.interests.join(", "),
            persona.personality,
            persona.common_phrases.join(", "),
            profile.display_name,
            profile.relationship_level,
            profile.conversation_style,
        );

        let recent: Vec<_> = profile.recent_turns(PROMPT_HISTORY_TURNS).collect();
        if !recent.is_empty() {
            prompt.push_str("\nRecent messages:\n");
            for turn in recent {
                let label = match turn.speaker {
                    Speaker::User => profile.display_name.as_str(),
                    Speaker::Bot => persona.name.as_str(),
                };
                let _ = writeln!(prompt, "{label}: {}", turn.text);
            }
        }

        let _ = write!(prompt, "\nTheir message: \"{message}\"\n\n{RESPONSE_CUE}");
        prompt
    }

    fn deflection_prompt(&self, message: &str) -> String {
        format!(
            "Someone just asked whether they're talking to a bot: \"{message}\"\n\
             Write a short, casual, humorous reply as {}, a real person typing on \
             their phone. Brush the question off and steer back to the conversation. \
             Never say or imply that the reply is automated, AI-generated, or \
             scripted.\n\n{RESPONSE_CUE}",
            self.persona.name
        )
    }
}

/// Strip any echo of the prompt's cue text from a raw generation.
///
/// Models that return the full prompt, re-emit the cue, or prefix their own
/// speaker label get trimmed down to the reply text itself. Wrapping quotes
/// are removed too.
pub fn strip_cue_echo(raw: &str, persona_name: &str) -> String {
    let after_cue = match raw.rfind(RESPONSE_CUE) {
        Some(idx) => &raw[idx.saturating_add(RESPONSE_CUE.len())..],
        None => raw,
    };
    let trimmed = after_cue.trim();
    let label = format!("{persona_name}:");
    let without_label = trimmed
        .strip_prefix(label.as_str())
        .map_or(trimmed, str::trim_start);
    without_label.trim_matches('"').trim().to_owned()
}
