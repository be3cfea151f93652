//! Generative-text backend abstraction.
//!
//! Defines the [`ReplyBackend`] trait and the request type shared by the
//! implementations:
//! - [`huggingface::HuggingFaceBackend`] — Hugging Face Inference API
//!   `/models/{id}` text generation
//! - [`openai::OpenAiBackend`] — any `/v1/chat/completions`-compatible
//!   server
//!
//! Backend failures never reach the end user: the orchestrator substitutes
//! a neutral fallback reply instead.

use async_trait::async_trait;
use regex::Regex;

pub mod huggingface;
pub mod openai;

// ---------------------------------------------------------------------------
// Request type
// ---------------------------------------------------------------------------

/// One generation call's worth of parameters.
///
/// Built fresh per inbound message and discarded after use; never persisted.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Fully-formatted prompt text.
    pub prompt: String,
    /// Target model identifier.
    pub model: String,
    /// Upper bound on generated tokens.
    pub max_new_tokens: u32,
    /// Softmax temperature.
    pub temperature: f32,
    /// Nucleus-sampling threshold.
    pub top_p: f32,
    /// Whether to sample stochastically (false = greedy).
    pub sample: bool,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors returned by generation backends.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// HTTP transport failure.
    #[error("backend request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// Response did not match the expected schema.
    #[error("backend response parse error: {0}")]
    Parse(String),
    /// Upstream responded with an error status.
    #[error("backend returned non-success status {status}: {body}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// Sanitized, truncated response body.
        body: String,
    },
}

// ---------------------------------------------------------------------------
// HTTP helpers shared by the backends
// ---------------------------------------------------------------------------

/// Check HTTP response status and return the body text or a structured
/// error with a sanitized body.
///
/// # Errors
///
/// Returns `BackendError::Request` on transport failure,
/// `BackendError::HttpStatus` on non-2xx.
pub async fn check_http_response(response: reqwest::Response) -> Result<String, BackendError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(BackendError::HttpStatus {
            status: status.as_u16(),
            body: sanitize_http_error_body(&body),
        });
    }
    Ok(body)
}

fn sanitize_http_error_body(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");

    let mut sanitized = collapsed;
    for pattern in [
        r"hf_[A-Za-z0-9]{20,}",
        r"sk-[A-Za-z0-9_\-]{20,}",
        r"EAA[A-Za-z0-9]{20,}",
        r"Bearer [A-Za-z0-9_\-\.]{16,}",
    ] {
        if let Ok(regex) = Regex::new(pattern) {
            sanitized = regex.replace_all(&sanitized, "[REDACTED]").into_owned();
        }
    }

    const MAX_ERROR_BODY_CHARS: usize = 256;
    if sanitized.chars().count() > MAX_ERROR_BODY_CHARS {
        let shortened = sanitized
            .chars()
            .take(MAX_ERROR_BODY_CHARS)
            .collect::<String>();
        return format!("{shortened}...[truncated]");
    }

    sanitized
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// A text-generation backend.
///
/// Implementations must be `Send + Sync`; the orchestrator shares one
/// behind an `Arc` across concurrent webhook tasks.
#[async_trait]
pub trait ReplyBackend: Send + Sync {
    /// Generate raw reply text for the request.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] on API, network, or parse failure.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, BackendError>;

    /// The model identifier this backend is configured for.
    fn model_id(&self) -> &str;
}
