//! OpenAI-compatible chat completions backend.
//!
//! Works against any server exposing `/v1/chat/completions`. The whole
//! prompt travels as a single user message; the first choice's text is the
//! generation.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{check_http_response, BackendError, GenerationRequest, ReplyBackend};

/// Default API base.
pub const DEFAULT_API_BASE: &str = "https://api.openai.com";

/// HTTP connect timeout for the reqwest client.
const CONNECT_TIMEOUT_SECS: u64 = 5;

/// HTTP request timeout.
const REQUEST_TIMEOUT_SECS: u64 = 60;

// ---------------------------------------------------------------------------
// Wire types (pub for integration testing)
// ---------------------------------------------------------------------------

/// Chat completions request body.
#[doc(hidden)]
#[derive(Debug, Serialize)]
pub struct OpenAiRequest {
    /// Model identifier.
    pub model: String,
    /// Conversation messages.
    pub messages: Vec<OpenAiMessage>,
    /// Maximum completion tokens.
    pub max_tokens: u32,
    /// Softmax temperature.
    pub temperature: f32,
    /// Nucleus-sampling threshold.
    pub top_p: f32,
}

/// A message in chat format.
#[doc(hidden)]
#[derive(Debug, Serialize)]
pub struct OpenAiMessage {
    /// Role (`user` here).
    pub role: String,
    /// Message text.
    pub content: String,
}

/// Chat completions response body.
#[doc(hidden)]
#[derive(Debug, Deserialize)]
pub struct OpenAiResponse {
    /// Response choices.
    pub choices: Vec<OpenAiChoice>,
}

/// A response choice.
#[doc(hidden)]
#[derive(Debug, Deserialize)]
pub struct OpenAiChoice {
    /// Assistant message for this choice.
    pub message: OpenAiResponseMessage,
}

/// Assistant message payload.
#[doc(hidden)]
#[derive(Debug, Deserialize)]
pub struct OpenAiResponseMessage {
    /// Text content, absent for refusals.
    pub content: Option<String>,
}

// ---------------------------------------------------------------------------
// Request / Response builders (pub for integration testing)
// ---------------------------------------------------------------------------

/// Build the wire request for a generation call.
///
/// When the request disables sampling, temperature is forced to 0 so the
/// completion is effectively greedy.
#[doc(hidden)]
pub fn build_request(request: &GenerationRequest) -> OpenAiRequest {
    let temperature = if request.sample {
        request.temperature
    } else {
        0.0
    };
    OpenAiRequest {
        model: request.model.clone(),
        messages: vec![OpenAiMessage {
            role: "user".to_owned(),
            content: request.prompt.clone(),
        }],
        max_tokens: request.max_new_tokens,
        temperature,
        top_p: request.top_p,
    }
}

/// Parse a chat completions response into the generated text.
///
/// # Errors
///
/// Returns `BackendError::Parse` if the body cannot be deserialized or the
/// first choice carries no text.
#[doc(hidden)]
pub fn parse_response(body: &str) -> Result<String, BackendError> {
    let resp: OpenAiResponse =
        serde_json::from_str(body).map_err(|e| BackendError::Parse(e.to_string()))?;
    resp.choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| BackendError::Parse("missing choices[0].message.content".to_owned()))
}

// ---------------------------------------------------------------------------
// Backend
// ---------------------------------------------------------------------------

/// OpenAI-compatible chat completions backend.
pub struct OpenAiBackend {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiBackend {
    /// Create a backend for `model` authenticated with `api_key`.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
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
            api_key: api_key.into(),
            model: model.into(),
        }
    }
}

#[async_trait::async_trait]
impl ReplyBackend for OpenAiBackend {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, BackendError> {
        let api_request = build_request(request);
        let url = format!("{}/v1/chat/completions", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .header("authorization", format!("Bearer {}", self.api_key))
            .json(&api_request)
            .send()
            .await?;

        let payload = check_http_response(response).await?;
        parse_response(&payload)
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}
