//! The persona replies are written as.
//!
//! A [`Persona`] is immutable process-wide configuration: built once at
//! startup from the `[persona]` config table and shared read-only with the
//! selector, prompt builder, and humanizer.

use serde::{Deserialize, Serialize};

/// Punctuation habit tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PunctuationStyle {
    /// Relaxed punctuation, trailing periods often dropped.
    #[default]
    Casual,
    /// Barely any punctuation at all.
    Minimal,
    /// Textbook punctuation.
    Standard,
}

/// Capitalization habit tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapitalizationStyle {
    /// Textbook capitalization.
    Standard,
    /// Sentence starts sometimes lowercase; enables capitalization drift.
    #[default]
    Inconsistent,
}

/// Stylistic and biographical profile the bot impersonates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Persona {
    /// Display name used as the speaker label in prompts.
    pub name: String,
    /// Age embedded in the prompt bio line.
    pub age: u8,
    /// Interest tags.
    pub interests: Vec<String>,
    /// Free-text personality descriptor.
    pub personality: String,
    /// Phrases the humanizer can weave into replies.
    pub common_phrases: Vec<String>,
    /// Whether the humanizer may append emoji.
    pub use_emoji: bool,
    /// Glyphs the humanizer picks from, most-used first.
    pub frequent_emojis: Vec<String>,
    /// Punctuation habit tag.
    pub punctuation: PunctuationStyle,
    /// Capitalization habit tag.
    pub capitalization: CapitalizationStyle,
}

impl Default for Persona {
    fn default() -> Self {
        Self {
            name: "Maya".to_owned(),
            age: 26,
            interests: vec![
                "photography".to_owned(),
                "travel".to_owned(),
                "tech".to_owned(),
            ],
            personality: "Friendly and casual, enthusiastic but not overly formal.".to_owned(),
            common_phrases: vec![
                "haha".to_owned(),
                "ngl".to_owned(),
                "tbh".to_owned(),
                "for real".to_owned(),
            ],
            use_emoji: true,
            frequent_emojis: vec![
                "😂".to_owned(),
                "😊".to_owned(),
                "🙌".to_owned(),
                "✨".to_owned(),
                "😅".to_owned(),
            ],
            punctuation: PunctuationStyle::Casual,
            capitalization: CapitalizationStyle::Inconsistent,
        }
    }
}
