//! Injectable randomness for the reply pipeline.
//!
//! Every probabilistic decision — canned-reply choice, humanization steps,
//! typing-delay factor — draws from a [`RandomSource`] handed in by the
//! caller, so tests can script exact value sequences and assert which
//! branch was taken.

use std::collections::VecDeque;

use rand::Rng;

/// A uniform random source.
///
/// Implementations must be `Send` so a source can be held across the
/// pipeline's await points.
pub trait RandomSource: Send {
    /// Next uniform float in `[0, 1)`.
    fn next_f64(&mut self) -> f64;

    /// Uniform index in `[0, bound)`. Returns 0 when `bound` is 0.
    fn next_index(&mut self, bound: usize) -> usize;

    /// Bernoulli trial: true with the given probability.
    fn chance(&mut self, probability: f64) -> bool {
        self.next_f64() < probability
    }

    /// Uniform float in `[low, high)`.
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        low + self.next_f64() * (high - low)
    }
}

/// Production source backed by the thread-local generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_f64(&mut self) -> f64 {
        rand::thread_rng().gen()
    }

    fn next_index(&mut self, bound: usize) -> usize {
        if bound == 0 {
            return 0;
        }
        rand::thread_rng().gen_range(0..bound)
    }
}

/// Deterministic source replaying a fixed sequence, for tests.
///
/// Values are consumed front to back. Once exhausted, every draw yields
/// 0.0 — which fails every `chance` check with probability 0 and picks the
/// first entry of any set — so scripts only need to cover the draws they
/// care about.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    values: VecDeque<f64>,
}

impl ScriptedRandom {
    /// Build a source that replays `values` in order.
    pub fn new(values: &[f64]) -> Self {
        Self {
            values: values.iter().copied().collect(),
        }
    }
}

impl RandomSource for ScriptedRandom {
    fn next_f64(&mut self) -> f64 {
        self.values.pop_front().unwrap_or(0.0)
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    fn next_index(&mut self, bound: usize) -> usize {
        if bound == 0 {
            return 0;
        }
        let scaled = (self.next_f64() * bound as f64).floor() as usize;
        scaled.min(bound.saturating_sub(1))
    }
}
