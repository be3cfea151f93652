//! Rule-based reply selection.
//!
//! Classifies the inbound message into a category and picks a canned reply
//! uniformly from that category's set. Categories overlap lexically, so the
//! check order is load-bearing — first match wins.

use regex::Regex;

use crate::profile::UserProfile;
use crate::rng::RandomSource;

/// Fixed reply for the very first message from a user. No randomness.
pub const WELCOME: &str = "heyy! I don't think we've talked before 😊 what's up?";

/// Phrases that read as probing for an automated sender.
pub const SUSPICION_PHRASES: &[&str] = &[
    "are you a bot",
    "are you ai",
    "is this automated",
    "this sounds like ai",
];

/// Canned denials for bot-suspicion messages.
pub const DEFLECTIONS: &[&str] = &[
    "lol what? I'm just replying from my phone 😂",
    "haha no I'm just multitasking. what's up?",
    "robot? me? *beep boop* just kidding! what's going on?",
    "I'm 100% human, just efficient with my replies! 😊",
    "honestly I wish I was a bot, I'd reply way faster 😅",
];

/// Replies for greeting-prefixed messages.
pub const GREETINGS: &[&str] = &[
    "heyy what's up?",
    "hey you! how's it going?",
    "hii 😊 how's your day been?",
    "yoo what's good?",
];

/// Acknowledgments for questions. These invite the sender to answer first
/// and never commit to a real answer.
pub const QUESTION_ACKS: &[&str] = &[
    "ooh good question, what do you think?",
    "hmm let me think about that... what's your take first?",
    "haha why do you ask? 👀",
    "that's a fun one, you first though",
];

/// Replies for activity mentions.
pub const ACTIVITY_REPLIES: &[&str] = &[
    "oh nice, how's that going?",
    "sounds busy! you enjoying it at least?",
    "love that for you, tell me more",
    "same honestly 😅 how long have you been at it?",
];

/// Nudges for very short messages.
pub const SHORT_NUDGES: &[&str] = &[
    "wait tell me more lol",
    "go on...",
    "that's all I get? 😂",
    "haha what do you mean?",
];

/// Generic conversation extenders.
pub const EXTENDERS: &[&str] = &[
    "haha for real",
    "that's wild, what happened next?",
    "I was literally just thinking about that",
    "okay that's actually so interesting, keep going",
];

/// Keywords that signal the sender is talking about what they're doing.
const ACTIVITY_KEYWORDS: &[&str] = &[
    "work",
    "working",
    "job",
    "busy",
    "studying",
    "watching",
    "listening",
    "reading",
    "cooking",
    "gym",
    "exercise",
    "game",
    "playing",
];

/// Trimmed messages shorter than this get an "elaborate" nudge.
const SHORT_MESSAGE_LEN: usize = 10;

/// Whether `text` probes for an automated sender (case-insensitive).
pub fn is_bot_suspicion(text: &str) -> bool {
    let lower = text.to_lowercase();
    SUSPICION_PHRASES.iter().any(|p| lower.contains(p))
}

/// Rule-based classifier and canned-response chooser.
pub struct ResponseSelector {
    greeting: Regex,
    interrogative: Regex,
}

impl Default for ResponseSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseSelector {
    /// Compile the classification patterns.
    pub fn new() -> Self {
        Self {
            greeting: Regex::new(r"(?i)^(hi+|hello|hey+a?|hola|sup|yo)\b")
                .expect("greeting pattern compiles"),
            interrogative: Regex::new(
                r"(?i)^(what|who|where|when|why|how|do you|are you|can you|will you)\b",
            )
            .expect("interrogative pattern compiles"),
        }
    }

    /// Pick a reply for `text`.
    ///
    /// Priority order — first match wins:
    /// 1. first contact (fixed welcome, deterministic)
    /// 2. bot suspicion (canned deflection)
    /// 3. greeting prefix (anchored at start, case-insensitive)
    /// 4. question (`?` anywhere, or interrogative lead-in)
    /// 5. activity mention  6. short message  7. generic extender
    pub fn select(&self, text: &str, profile: &UserProfile, rng: &mut dyn RandomSource) -> String {
        if profile.response_count == 0 {
            return WELCOME.to_owned();
        }
        if is_bot_suspicion(text) {
            return pick(DEFLECTIONS, rng);
        }
        let trimmed = text.trim();
        if self.greeting.is_match(trimmed) {
            return pick(GREETINGS, rng);
        }
        if trimmed.contains('?') || self.interrogative.is_match(trimmed) {
            return pick(QUESTION_ACKS, rng);
        }
        let lower = trimmed.to_lowercase();
        if ACTIVITY_KEYWORDS.iter().any(|k| lower.contains(k)) {
            return pick(ACTIVITY_REPLIES, rng);
        }
        if trimmed.chars().count() < SHORT_MESSAGE_LEN {
            return pick(SHORT_NUDGES, rng);
        }
        pick(EXTENDERS, rng)
    }
}

fn pick(set: &[&str], rng: &mut dyn RandomSource) -> String {
    set[rng.next_index(set.len())].to_owned()
}
