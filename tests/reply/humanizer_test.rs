//! Integration tests for the humanizer strategies.
//!
//! Scripted draws follow the chain's fixed consumption order:
//! typo chance → [word idx, swap pos, correction chance] → emoji chance →
//! [emoji idx] → phrase chance → [phrase idx, side chance] → drift chance.

use std::sync::Arc;

use standin::persona::{CapitalizationStyle, Persona};
use standin::reply::humanizer::{
    Humanize, HumanizerTuning, PerturbationHumanizer, ShorthandHumanizer,
};
use standin::rng::ScriptedRandom;

fn test_persona() -> Persona {
    Persona {
        common_phrases: vec!["ngl".to_owned(), "tbh".to_owned()],
        frequent_emojis: vec!["😂".to_owned(), "✨".to_owned()],
        use_emoji: true,
        capitalization: CapitalizationStyle::Inconsistent,
        ..Persona::default()
    }
}

fn tuning_off() -> HumanizerTuning {
    HumanizerTuning {
        typo_probability: 0.0,
        correction_probability: 0.0,
        emoji_probability: 0.0,
        phrase_probability: 0.0,
        drift_probability: 0.0,
    }
}

#[test]
fn all_steps_disabled_is_identity() {
    let humanizer = PerturbationHumanizer::new(Arc::new(test_persona()), tuning_off());
    let mut rng = ScriptedRandom::new(&[]);
    assert_eq!(
        humanizer.humanize("Sounds good, see you then!", &mut rng),
        "Sounds good, see you then!"
    );
}

#[test]
fn typo_swap_preserves_word_length() {
    let tuning = HumanizerTuning {
        typo_probability: 1.0,
        ..tuning_off()
    };
    let humanizer = PerturbationHumanizer::new(Arc::new(test_persona()), tuning);
    // typo chance, word idx -> "omelette", pos, correction chance.
    let mut rng = ScriptedRandom::new(&[0.0, 0.9, 0.4, 0.9]);
    let out = humanizer.humanize("incredible omelette", &mut rng);

    let words: Vec<&str> = out.split_whitespace().collect();
    assert_eq!(words.len(), 2);
    assert_eq!(words[0], "incredible");
    assert_eq!(words[1].chars().count(), "omelette".chars().count());
    assert_ne!(words[1], "omelette");
    // First character never swaps.
    assert!(words[1].starts_with('o'));
}

#[test]
fn typo_correction_appends_trailing_token() {
    let tuning = HumanizerTuning {
        typo_probability: 1.0,
        correction_probability: 1.0,
        ..tuning_off()
    };
    let humanizer = PerturbationHumanizer::new(Arc::new(test_persona()), tuning);
    let mut rng = ScriptedRandom::new(&[0.0, 0.0, 0.0, 0.0]);
    let out = humanizer.humanize("tomorrow works", &mut rng);
    assert_eq!(out, "tmoorrow works *tomorrow");
}

#[test]
fn full_chain_applies_in_fixed_order() {
    let tuning = HumanizerTuning {
        typo_probability: 1.0,
        correction_probability: 0.0,
        emoji_probability: 1.0,
        phrase_probability: 1.0,
        drift_probability: 1.0,
    };
    let humanizer = PerturbationHumanizer::new(Arc::new(test_persona()), tuning);
    // typo: word 0 "Sounds" -> "Suonds"; emoji idx 0 -> 😂;
    // phrase idx 0 -> "ngl", side 0.9 -> append; drift lowercases.
    let mut rng = ScriptedRandom::new(&[0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.9, 0.0]);
    let out = humanizer.humanize("Sounds good friend", &mut rng);
    assert_eq!(out, "suonds good friend 😂 ngl");
}

#[test]
fn emoji_not_doubled_after_expressive_ending() {
    let tuning = HumanizerTuning {
        emoji_probability: 1.0,
        ..tuning_off()
    };
    let humanizer = PerturbationHumanizer::new(Arc::new(test_persona()), tuning);
    let mut rng = ScriptedRandom::new(&[]);
    assert_eq!(humanizer.humanize("love that 😂", &mut rng), "love that 😂");
}

#[test]
fn emoji_skipped_when_persona_disables_it() {
    let mut persona = test_persona();
    persona.use_emoji = false;
    let tuning = HumanizerTuning {
        emoji_probability: 1.0,
        ..tuning_off()
    };
    let humanizer = PerturbationHumanizer::new(Arc::new(persona), tuning);
    let mut rng = ScriptedRandom::new(&[]);
    assert_eq!(humanizer.humanize("love that", &mut rng), "love that");
}

#[test]
fn phrase_injection_prepends_with_comma() {
    let tuning = HumanizerTuning {
        phrase_probability: 1.0,
        ..tuning_off()
    };
    let mut persona = test_persona();
    persona.use_emoji = false;
    let humanizer = PerturbationHumanizer::new(Arc::new(persona), tuning);
    // typo chance, phrase chance, phrase idx 1 -> "tbh", side 0.2 -> prepend.
    let mut rng = ScriptedRandom::new(&[0.9, 0.0, 0.6, 0.2]);
    assert_eq!(humanizer.humanize("sounds fun", &mut rng), "tbh, sounds fun");
}

#[test]
fn drift_only_fires_for_inconsistent_capitalization() {
    let tuning = HumanizerTuning {
        drift_probability: 1.0,
        ..tuning_off()
    };
    let mut persona = test_persona();
    persona.use_emoji = false;
    persona.capitalization = CapitalizationStyle::Standard;
    let humanizer = PerturbationHumanizer::new(Arc::new(persona), tuning);
    let mut rng = ScriptedRandom::new(&[]);
    assert_eq!(humanizer.humanize("Hello there", &mut rng), "Hello there");
}

#[test]
fn empty_text_never_panics() {
    let tuning = HumanizerTuning {
        typo_probability: 1.0,
        correction_probability: 1.0,
        emoji_probability: 1.0,
        phrase_probability: 1.0,
        drift_probability: 1.0,
    };
    let humanizer = PerturbationHumanizer::new(Arc::new(test_persona()), tuning);
    let mut rng = ScriptedRandom::new(&[]);
    let out = humanizer.humanize("", &mut rng);
    // Phrase injection still applies; the other steps are no-ops.
    assert_eq!(out, "ngl, ");
}

#[test]
fn shorthand_replaces_known_patterns() {
    let humanizer = ShorthandHumanizer;
    // One 0.0 draw per matched rule passes its coin flip.
    let mut rng = ScriptedRandom::new(&[]);
    let out = humanizer.humanize("I am going to be late", &mut rng);
    assert_eq!(out, "I'm gonna be late");
}

#[test]
fn shorthand_keeps_unmatched_text() {
    let humanizer = ShorthandHumanizer;
    let mut rng = ScriptedRandom::new(&[]);
    assert_eq!(humanizer.humanize("see you at 8", &mut rng), "see you at 8");
}
