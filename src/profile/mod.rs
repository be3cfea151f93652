//! Per-user conversation profiles and the store capability.
//!
//! A [`UserProfile`] is the whole persisted state for one conversation
//! partner: identity tags, a sliding-window turn history, and the response
//! counter the first-contact rule keys off. Profiles are read-modify-written
//! as whole documents through a [`ProfileStore`]; concurrent events for the
//! same user tolerate last-writer-wins.
//!
//! Three store backends exist behind the same trait:
//! - [`sqlite::SqliteProfileStore`] — JSON document rows, production default
//! - [`json_file::JsonFileStore`] — one JSON map file on disk
//! - [`memory::MemoryProfileStore`] — tests and the one-shot CLI

pub mod json_file;
pub mod memory;
pub mod sqlite;

use std::collections::VecDeque;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum turns kept per user. Oldest turns are evicted first.
pub const MAX_HISTORY_TURNS: usize = 20;

/// Who authored a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    /// The conversation partner.
    User,
    /// This service.
    Bot,
}

/// One exchanged message. Immutable once appended; insertion order is
/// chronological order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    /// Turn author.
    pub speaker: Speaker,
    /// Message text.
    pub text: String,
    /// When the turn was recorded.
    pub timestamp: DateTime<Utc>,
}

/// Persisted per-user state.
///
/// Created with defaults on the first message from an unseen user id,
/// mutated on every inbound and outbound turn, never explicitly deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Platform user identifier — the store key.
    pub user_id: String,
    /// Name used when addressing the user in prompts.
    pub display_name: String,
    /// Conversation-style tag (e.g. "casual").
    pub conversation_style: String,
    /// Relationship-level tag (e.g. "new").
    pub relationship_level: String,
    /// Topics the user has brought up.
    pub topics: Vec<String>,
    /// Sliding window of recent turns, oldest first.
    pub history: VecDeque<ConversationTurn>,
    /// Last time either side sent a message.
    pub last_interaction: DateTime<Utc>,
    /// Bot-authored turns so far. Zero means first contact.
    pub response_count: u64,
}

impl UserProfile {
    /// Fresh profile for a previously-unseen user.
    pub fn new(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_owned(),
            display_name: user_id.to_owned(),
            conversation_style: "casual".to_owned(),
            relationship_level: "new".to_owned(),
            topics: Vec::new(),
            history: VecDeque::new(),
            last_interaction: Utc::now(),
            response_count: 0,
        }
    }

    /// Append a turn, evicting the oldest past [`MAX_HISTORY_TURNS`].
    ///
    /// Bot turns bump the response counter; both kinds refresh the
    /// last-interaction timestamp.
    pub fn record_turn(&mut self, speaker: Speaker, text: &str) {
        let turn = ConversationTurn {
            speaker,
            text: text.to_owned(),
            timestamp: Utc::now(),
        };
        if self.history.len() >= MAX_HISTORY_TURNS {
            self.history.pop_front();
        }
        self.last_interaction = turn.timestamp;
        if speaker == Speaker::Bot {
            self.response_count = self.response_count.saturating_add(1);
        }
        self.history.push_back(turn);
    }

    /// Up to the `limit` most recent turns, oldest first.
    pub fn recent_turns(&self, limit: usize) -> impl Iterator<Item = &ConversationTurn> {
        let skip = self.history.len().saturating_sub(limit);
        self.history.iter().skip(skip)
    }
}

/// Errors from profile store backends.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// SQLite query or connection failure.
    #[error("profile database error: {0}")]
    Database(#[from] sqlx::Error),
    /// File store I/O failure.
    #[error("profile file error: {0}")]
    Io(#[from] std::io::Error),
    /// Profile document failed to encode.
    #[error("profile encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Keyed whole-document persistence for user profiles.
///
/// `get` never fails on a malformed stored document — backends log it and
/// return `None` so the caller re-initializes a default profile.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Fetch the profile for `user_id`, or `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on backend I/O failure.
    async fn get(&self, user_id: &str) -> Result<Option<UserProfile>, StoreError>;

    /// Write the whole profile document, replacing any previous version.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on backend I/O or encode failure.
    async fn put(&self, profile: &UserProfile) -> Result<(), StoreError>;
}
