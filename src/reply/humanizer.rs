//! Stylistic perturbation applied to every candidate reply.
//!
//! Whatever produced the candidate — canned set or generative backend — it
//! passes through a [`Humanize`] strategy before delivery, so the
//! perturbation is never skipped. Two strategies exist:
//!
//! - [`PerturbationHumanizer`] — the canonical chain: typo injection, emoji
//!   append, phrase injection, capitalization drift, in that fixed order.
//! - [`ShorthandHumanizer`] — naive substring replacement toward texting
//!   shorthand.
//!
//! Each step is independently probabilistic and must be a no-op (never an
//! error) when its preconditions fail: empty text, single short word, no
//! configured phrases or emoji.

use std::sync::Arc;

use serde::Deserialize;

use crate::persona::{CapitalizationStyle, Persona};
use crate::rng::RandomSource;

/// Glyphs that already close a message expressively. The emoji step skips
/// appending after one of these to avoid doubling.
const EXPRESSIVE_ENDINGS: &[char] = &['😂', '😅', '😊', '😍', '🙌', '✨', '🔥', '❤', '👀'];

/// Step probabilities for the perturbation chain.
///
/// Defaults match the majority variant in the wild; the phrase probability
/// in particular differs across deployments, so every knob is configurable.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HumanizerTuning {
    /// Chance the typo-injection step fires.
    pub typo_probability: f64,
    /// Chance a typo is followed by a `*word` correction token.
    pub correction_probability: f64,
    /// Chance of appending an emoji (when the persona uses them).
    pub emoji_probability: f64,
    /// Chance of weaving in a persona phrase.
    pub phrase_probability: f64,
    /// Chance of lowercasing the first letter (inconsistent-caps personas).
    pub drift_probability: f64,
}

impl Default for HumanizerTuning {
    fn default() -> Self {
        Self {
            typo_probability: 0.2,
            correction_probability: 0.5,
            emoji_probability: 0.7,
            phrase_probability: 0.2,
            drift_probability: 0.3,
        }
    }
}

/// A stylistic-perturbation strategy.
pub trait Humanize: Send + Sync {
    /// Perturb `text`. Never fails; steps whose preconditions are unmet are
    /// skipped.
    fn humanize(&self, text: &str, rng: &mut dyn RandomSource) -> String;
}

/// Canonical strategy: typo injection, emoji append, phrase injection,
/// capitalization drift — in that order. Each step is order-sensitive;
/// phrase injection sees the post-typo text.
pub struct PerturbationHumanizer {
    persona: Arc<Persona>,
    tuning: HumanizerTuning,
}

impl PerturbationHumanizer {
    /// Create the canonical humanizer for a persona.
    pub fn new(persona: Arc<Persona>, tuning: HumanizerTuning) -> Self {
        Self { persona, tuning }
    }
}

impl Humanize for PerturbationHumanizer {
    fn humanize(&self, text: &str, rng: &mut dyn RandomSource) -> String {
        let mut text = text.to_owned();
        if rng.chance(self.tuning.typo_probability) {
            text = inject_typo(&text, self.tuning.correction_probability, rng);
        }
        if self.persona.use_emoji && rng.chance(self.tuning.emoji_probability) {
            text = append_emoji(&text, &self.persona.frequent_emojis, rng);
        }
        if rng.chance(self.tuning.phrase_probability) {
            text = inject_phrase(&text, &self.persona.common_phrases, rng);
        }
        if self.persona.capitalization == CapitalizationStyle::Inconsistent
            && rng.chance(self.tuning.drift_probability)
        {
            text = lowercase_first(&text);
        }
        text
    }
}

/// Pick one word and swap two adjacent interior characters, mimicking a
/// fat-finger typo, optionally followed by a `*word` self-correction.
///
/// Words of length 3 or less are left alone; the swap never touches the
/// first character and preserves the word's length.
fn inject_typo(text: &str, correction_probability: f64, rng: &mut dyn RandomSource) -> String {
    let mut words: Vec<String> = text.split_whitespace().map(str::to_owned).collect();
    if words.is_empty() {
        return text.to_owned();
    }
    let idx = rng.next_index(words.len());
    let original = words[idx].clone();
    let mut chars: Vec<char> = original.chars().collect();
    if chars.len() > 3 {
        let interior = chars.len().saturating_sub(2);
        let pos = rng.next_index(interior).saturating_add(1);
        chars.swap(pos, pos.saturating_add(1));
        words[idx] = chars.into_iter().collect();
        if rng.chance(correction_probability) {
            let corrected: String = original.chars().filter(|c| c.is_alphanumeric()).collect();
            if !corrected.is_empty() {
                words.push(format!("*{corrected}"));
            }
        }
    }
    words.join(" ")
}

/// Append one persona emoji unless the text already ends expressively.
fn append_emoji(text: &str, emojis: &[String], rng: &mut dyn RandomSource) -> String {
    if text.is_empty() || emojis.is_empty() {
        return text.to_owned();
    }
    if text
        .chars()
        .last()
        .is_some_and(|last| EXPRESSIVE_ENDINGS.contains(&last))
    {
        return text.to_owned();
    }
    let glyph = &emojis[rng.next_index(emojis.len())];
    format!("{text} {glyph}")
}

/// Weave in one persona phrase, half the time as a lead-in, half as a tail.
fn inject_phrase(text: &str, phrases: &[String], rng: &mut dyn RandomSource) -> String {
    if phrases.is_empty() {
        return text.to_owned();
    }
    let phrase = &phrases[rng.next_index(phrases.len())];
    if rng.chance(0.5) {
        format!("{phrase}, {text}")
    } else {
        format!("{text} {phrase}")
    }
}

fn lowercase_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => {
            let mut out = String::new();
            out.extend(first.to_lowercase());
            out.push_str(chars.as_str());
            out
        }
        None => String::new(),
    }
}

/// Naive variant: fixed substring replacements toward texting shorthand,
/// each applied with probability 0.5 when its pattern is present.
pub struct ShorthandHumanizer;

const SHORTHAND_RULES: &[(&str, &str)] = &[
    ("you are", "you're"),
    ("I am", "I'm"),
    ("going to", "gonna"),
    ("want to", "wanna"),
    ("kind of", "kinda"),
];

impl Humanize for ShorthandHumanizer {
    fn humanize(&self, text: &str, rng: &mut dyn RandomSource) -> String {
        let mut out = text.to_owned();
        for (from, to) in SHORTHAND_RULES {
            if out.contains(from) && rng.chance(0.5) {
                out = out.replace(from, to);
            }
        }
        out
    }
}
