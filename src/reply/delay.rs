//! Simulated typing delay.
//!
//! Longer replies "take longer to type". The orchestrator sleeps for the
//! computed duration before calling the send API; the sleep is cooperative,
//! so other inbound deliveries are not starved.

use std::time::Duration;

use crate::rng::RandomSource;

/// Milliseconds added to every delay.
const BASE_MS: f64 = 1000.0;
/// Milliseconds per whitespace-separated word.
const PER_WORD_MS: f64 = 500.0;
/// Upper clamp in milliseconds.
const MAX_MS: f64 = 8000.0;
/// Typing-speed factor range.
const FACTOR_LOW: f64 = 0.7;
const FACTOR_HIGH: f64 = 1.3;

/// Computes how long to "type" before a reply is sent.
#[derive(Debug, Clone, Copy, Default)]
pub struct DelayModel;

impl DelayModel {
    /// Delay for `message`: 1000 ms baseline plus 500 ms per word scaled by
    /// a uniform factor in [0.7, 1.3], capped at 8000 ms. An empty message
    /// yields exactly the baseline.
    pub fn typing_delay(&self, message: &str, rng: &mut dyn RandomSource) -> Duration {
        let words = u32::try_from(message.split_whitespace().count()).unwrap_or(u32::MAX);
        let factor = rng.uniform(FACTOR_LOW, FACTOR_HIGH);
        let raw = BASE_MS + f64::from(words) * PER_WORD_MS * factor;
        Duration::from_secs_f64(raw.min(MAX_MS) / 1000.0)
    }
}
