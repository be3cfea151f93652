//! Hugging Face Inference API backend.
//!
//! Text generation via `POST {base}/models/{model}` with the prompt as
//! `inputs` and sampling knobs under `parameters`. The response is an array
//! of generations; only the first is used.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{check_http_response, BackendError, GenerationRequest, ReplyBackend};

/// Default public inference endpoint.
pub const DEFAULT_API_BASE: &str = "https://api-inference.huggingface.co";

/// HTTP connect timeout for the reqwest client.
const CONNECT_TIMEOUT_SECS: u64 = 5;

/// HTTP request timeout. Cold models can take a while to spin up.
const REQUEST_TIMEOUT_SECS: u64 = 60;

// ---------------------------------------------------------------------------
// Wire types (pub for integration testing)
// ---------------------------------------------------------------------------

/// Inference API request body.
#[doc(hidden)]
#[derive(Debug, Serialize)]
pub struct HfRequest {
    /// Prompt text.
    pub inputs: String,
    /// Generation parameters.
    pub parameters: HfParameters,
}

/// Generation parameters in Hugging Face format.
#[doc(hidden)]
#[derive(Debug, Serialize)]
pub struct HfParameters {
    /// Upper bound on generated tokens.
    pub max_new_tokens: u32,
    /// Softmax temperature.
    pub temperature: f32,
    /// Nucleus-sampling threshold.
    pub top_p: f32,
    /// Whether to sample stochastically.
    pub do_sample: bool,
    /// Whether to echo the prompt back. Always false here.
    pub return_full_text: bool,
}

/// One generated candidate.
#[doc(hidden)]
#[derive(Debug, Deserialize)]
pub struct HfGeneration {
    /// The generated text.
    pub generated_text: String,
}

// ---------------------------------------------------------------------------
// Request / Response builders (pub for integration testing)
// ---------------------------------------------------------------------------

/// Build the wire request for a generation call.
#[doc(hidden)]
pub fn build_request(request: &GenerationRequest) -> HfRequest {
    HfRequest {
        inputs: request.prompt.clone(),
        parameters: HfParameters {
            max_new_tokens: request.max_new_tokens,
            temperature: request.temperature,
            top_p: request.top_p,
            do_sample: request.sample,
            return_full_text: false,
        },
    }
}

/// Parse the `[{"generated_text": ...}]` response body.
///
/// # Errors
///
/// Returns `BackendError::Parse` if the body cannot be deserialized or the
/// generations array is empty.
#[doc(hidden)]
pub fn parse_response(body: &str) -> Result<String, BackendError> {
    let generations: Vec<HfGeneration> =
        serde_json::from_str(body).map_err(|e| BackendError::Parse(e.to_string()))?;
    generations
        .into_iter()
        .next()
        .map(|g| g.generated_text)
        .ok_or_else(|| BackendError::Parse("empty generations array".to_owned()))
}

// ---------------------------------------------------------------------------
// Backend
// ---------------------------------------------------------------------------

/// Hugging Face Inference API backend.
pub struct HuggingFaceBackend {
    client: reqwest::Client,
    base_url: String,
    api_token: String,
    model: String,
}

impl HuggingFaceBackend {
    /// Create a backend for `model` authenticated with `api_token`.
    pub fn new(
        base_url: impl Into<String>,
        api_token: impl Into<String>,
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
            api_token: api_token.into(),
            model: model.into(),
        }
    }
}

#[async_trait::async_trait]
impl ReplyBackend for HuggingFaceBackend {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, BackendError> {
        let api_request = build_request(request);
        let url = format!("{}/models/{}", self.base_url, request.model);

        let response = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .header("authorization", format!("Bearer {}", self.api_token))
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
