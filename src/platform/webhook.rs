//! Inbound webhook payload shapes and subscription verification.
//!
//! Mirrors the Meta messaging webhook JSON:
//!
//! ```json
//! {
//!   "object": "instagram",
//!   "entry": [
//!     { "messaging": [ { "sender": {"id": "123"},
//!                        "message": {"text": "hey"} } ] }
//!   ]
//! }
//! ```
//!
//! Items without text (attachments, likes, read receipts) and envelopes for
//! a different platform object are skipped, not errors.

use serde::Deserialize;

/// Query parameters of the `GET /webhook` verification handshake.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VerifyParams {
    /// `hub.mode` — must be `subscribe`.
    #[serde(rename = "hub.mode")]
    pub mode: Option<String>,
    /// `hub.verify_token` — must match the configured token.
    #[serde(rename = "hub.verify_token")]
    pub verify_token: Option<String>,
    /// `hub.challenge` — echoed back on success.
    #[serde(rename = "hub.challenge")]
    pub challenge: Option<String>,
}

/// Evaluate the verification handshake.
///
/// Returns the challenge to echo when the mode is `subscribe` and the token
/// matches; `None` otherwise.
pub fn verify_subscription(params: &VerifyParams, expected_token: &str) -> Option<String> {
    if params.mode.as_deref() != Some("subscribe") {
        return None;
    }
    if params.verify_token.as_deref() != Some(expected_token) {
        return None;
    }
    params.challenge.clone()
}

/// Top-level webhook event envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEnvelope {
    /// Platform object the event belongs to (e.g. `instagram`).
    pub object: String,
    /// Batched entries.
    #[serde(default)]
    pub entry: Vec<WebhookEntry>,
}

/// One webhook entry carrying messaging items.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEntry {
    /// Messaging events in this entry.
    #[serde(default)]
    pub messaging: Vec<MessagingItem>,
}

/// A single messaging event.
#[derive(Debug, Clone, Deserialize)]
pub struct MessagingItem {
    /// Sending party.
    pub sender: Party,
    /// Message payload; absent for delivery/read events.
    #[serde(default)]
    pub message: Option<InboundMessage>,
}

/// A webhook party reference.
#[derive(Debug, Clone, Deserialize)]
pub struct Party {
    /// Platform-scoped user identifier.
    pub id: String,
}

/// An inbound message payload.
#[derive(Debug, Clone, Deserialize)]
pub struct InboundMessage {
    /// Text content; absent for attachments and likes.
    #[serde(default)]
    pub text: Option<String>,
}

impl WebhookEnvelope {
    /// Extract `(sender_id, text)` pairs for `expected_object`, skipping
    /// non-text items and foreign objects.
    pub fn text_messages(&self, expected_object: &str) -> Vec<(String, String)> {
        if self.object != expected_object {
            return Vec::new();
        }
        let mut messages = Vec::new();
        for entry in &self.entry {
            for item in &entry.messaging {
                if let Some(text) = item.message.as_ref().and_then(|m| m.text.as_ref()) {
                    messages.push((item.sender.id.clone(), text.clone()));
                }
            }
        }
        messages
    }
}
