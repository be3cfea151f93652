//! Webhook HTTP surface.
//!
//! # Routes
//!
//! - `GET  /health`  — liveness probe
//! - `GET  /webhook` — Meta subscription verification handshake
//! - `POST /webhook` — inbound message events; acknowledged with 200
//!   immediately, processed on spawned tasks

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::orchestrator::Orchestrator;
use crate::platform::webhook::{verify_subscription, VerifyParams, WebhookEnvelope};
use crate::rng::ThreadRandom;

/// Shared state for the webhook server.
#[derive(Clone)]
pub struct AppState {
    /// The reply pipeline.
    pub orchestrator: Arc<Orchestrator>,
    /// Token the platform must present during verification.
    pub verify_token: String,
    /// Webhook `object` value accepted (e.g. `instagram`).
    pub platform_object: String,
}

/// Build the axum router with all routes.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/webhook", get(verify_handler).post(webhook_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health — liveness probe.
async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "standin",
    }))
}

/// GET /webhook — subscription verification handshake. Echoes the challenge
/// for a matching token, 400 otherwise.
async fn verify_handler(
    State(state): State<AppState>,
    Query(params): Query<VerifyParams>,
) -> impl IntoResponse {
    match verify_subscription(&params, &state.verify_token) {
        Some(challenge) => {
            info!("webhook subscription verified");
            (StatusCode::OK, challenge)
        }
        None => {
            debug!("webhook verification rejected");
            (StatusCode::BAD_REQUEST, String::new())
        }
    }
}

/// POST /webhook — inbound events. Always 200; reply work is spawned so the
/// platform is acknowledged before any generation or delay happens.
async fn webhook_handler(
    State(state): State<AppState>,
    Json(envelope): Json<WebhookEnvelope>,
) -> StatusCode {
    let messages = envelope.text_messages(&state.platform_object);
    debug!(count = messages.len(), "webhook delivery received");

    for (sender_id, text) in messages {
        let orchestrator = Arc::clone(&state.orchestrator);
        tokio::spawn(async move {
            let mut rng = ThreadRandom;
            orchestrator.handle_message(&sender_id, &text, &mut rng).await;
        });
    }

    StatusCode::OK
}
