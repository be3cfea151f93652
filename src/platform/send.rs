//! Outbound send-message API client.
//!
//! The orchestrator delivers through the [`MessageSender`] capability; in
//! production that is [`GraphSendClient`], which posts to the Graph API
//! `/me/messages` endpoint with the page access token.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::PlatformError;

/// Default Graph API base.
pub const DEFAULT_GRAPH_BASE: &str = "https://graph.facebook.com/v18.0";

/// HTTP connect timeout for the reqwest client.
const CONNECT_TIMEOUT_SECS: u64 = 5;

/// HTTP request timeout for send calls.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Cap on error-body characters kept for logs and errors.
const MAX_ERROR_BODY_CHARS: usize = 256;

/// Delivery capability the orchestrator sends through.
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Deliver `text` to `recipient_id`.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] on transport failure or non-success status.
    async fn send(&self, recipient_id: &str, text: &str) -> Result<(), PlatformError>;
}

// ---------------------------------------------------------------------------
// Wire types (pub for integration testing)
// ---------------------------------------------------------------------------

/// Send-message request body.
#[doc(hidden)]
#[derive(Debug, Serialize)]
pub struct SendRequest<'a> {
    /// Target recipient.
    pub recipient: PartyRef<'a>,
    /// Outbound message.
    pub message: OutboundText<'a>,
    /// Messaging type — always `RESPONSE` for replies.
    pub messaging_type: &'a str,
}

/// A party reference in the request body.
#[doc(hidden)]
#[derive(Debug, Serialize)]
pub struct PartyRef<'a> {
    /// Platform-scoped user identifier.
    pub id: &'a str,
}

/// Outbound text payload.
#[doc(hidden)]
#[derive(Debug, Serialize)]
pub struct OutboundText<'a> {
    /// Message text.
    pub text: &'a str,
}

/// Receipt returned by the Graph API on success.
#[doc(hidden)]
#[derive(Debug, Deserialize)]
pub struct SendReceipt {
    /// Recipient the message was delivered to.
    pub recipient_id: Option<String>,
    /// Platform-assigned message identifier.
    pub message_id: Option<String>,
}

/// Build the send-message request body for a recipient and text.
#[doc(hidden)]
pub fn build_request<'a>(recipient_id: &'a str, text: &'a str) -> SendRequest<'a> {
    SendRequest {
        recipient: PartyRef { id: recipient_id },
        message: OutboundText { text },
        messaging_type: "RESPONSE",
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Graph API send-message client.
pub struct GraphSendClient {
    client: reqwest::Client,
    base_url: String,
    access_token: String,
}

impl GraphSendClient {
    /// Create a client for `base_url` authenticated with the page token.
    pub fn new(base_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "failed to build HTTP client with timeouts, using default");
                reqwest::Client::default()
            });
        Self {
            client,
            base_url: base_url.into(),
            access_token: access_token.into(),
        }
    }
}

impl std::fmt::Debug for GraphSendClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphSendClient")
            .field("base_url", &self.base_url)
            .field("access_token", &"__REDACTED__")
            .finish()
    }
}

#[async_trait]
impl MessageSender for GraphSendClient {
    async fn send(&self, recipient_id: &str, text: &str) -> Result<(), PlatformError> {
        let url = format!("{}/me/messages", self.base_url);
        let body = build_request(recipient_id, text);

        let response = self
            .client
            .post(&url)
            .query(&[("access_token", self.access_token.as_str())])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let payload = response.text().await?;
        if !status.is_success() {
            return Err(PlatformError::HttpStatus {
                status: status.as_u16(),
                body: truncate_body(&payload),
            });
        }

        match serde_json::from_str::<SendReceipt>(&payload) {
            Ok(receipt) => debug!(
                recipient_id,
                message_id = receipt.message_id.as_deref().unwrap_or("-"),
                "message delivered"
            ),
            Err(_) => debug!(recipient_id, "message delivered (unrecognized receipt)"),
        }
        Ok(())
    }
}

fn truncate_body(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() > MAX_ERROR_BODY_CHARS {
        let head: String = collapsed.chars().take(MAX_ERROR_BODY_CHARS).collect();
        format!("{head}...[truncated]")
    } else {
        collapsed
    }
}
