//! Messaging-platform boundary.
//!
//! Inbound: the Meta-style webhook payload shapes and the subscription
//! verification handshake ([`webhook`]). Outbound: the Graph send-message
//! API behind the [`send::MessageSender`] capability trait.

pub mod send;
pub mod webhook;

/// Errors from the messaging-platform boundary.
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    /// HTTP transport failure.
    #[error("platform request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// Send API responded with an error status.
    #[error("send API returned status {status}: {body}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// Truncated response body.
        body: String,
    },
}
