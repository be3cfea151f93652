#![allow(missing_docs)]

//! standin — persona-driven DM auto-reply service.
//!
//! Single Rust binary that receives message webhooks from the platform,
//! produces a persona-voiced reply, humanizes it, and sends it back at a
//! human typing pace.

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use standin::backend::huggingface::HuggingFaceBackend;
use standin::backend::openai::OpenAiBackend;
use standin::backend::ReplyBackend;
use standin::config::{BackendConfig, HumanizerStrategy, StandinConfig, StoreBackend};
use standin::logging;
use standin::orchestrator::{GenerativePath, Orchestrator};
use standin::persona::Persona;
use standin::platform::send::{GraphSendClient, MessageSender};
use standin::platform::PlatformError;
use standin::profile::json_file::JsonFileStore;
use standin::profile::memory::MemoryProfileStore;
use standin::profile::sqlite::SqliteProfileStore;
use standin::profile::{ProfileStore, UserProfile};
use standin::reply::humanizer::{Humanize, PerturbationHumanizer, ShorthandHumanizer};
use standin::reply::prompt::PromptBuilder;
use standin::rng::ThreadRandom;
use standin::server::{app_router, AppState};

#[derive(Parser)]
#[command(name = "standin", about = "Persona-driven DM auto-reply service", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the webhook server.
    Start,
    /// Run the pipeline once for a single message and print the reply.
    Reply {
        /// Sender identifier to attribute the message to.
        #[arg(long, default_value = "local")]
        user: String,
        /// The inbound message text.
        text: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = StandinConfig::load().context("failed to load configuration")?;

    match cli.command {
        Command::Start => {
            let _guard = logging::init_production(Path::new("logs"), &config.server.log_level)?;
            run_server(config).await
        }
        Command::Reply { user, text } => {
            logging::init_cli();
            run_one_shot(config, &user, &text).await
        }
    }
}

/// Run the webhook server until ctrl-c.
async fn run_server(config: StandinConfig) -> Result<()> {
    info!(version = env!("CARGO_PKG_VERSION"), "standin starting");

    let Some(verify_token) = config.platform.verify_token.clone() else {
        bail!("verify token required; set STANDIN_VERIFY_TOKEN or [platform].verify_token");
    };
    let Some(access_token) = config.platform.access_token.clone() else {
        bail!("access token required; set STANDIN_ACCESS_TOKEN or [platform].access_token");
    };

    let store = build_store(&config).await?;
    let sender: Arc<dyn MessageSender> = Arc::new(GraphSendClient::new(
        config.platform.graph_base.clone(),
        access_token,
    ));
    let orchestrator = Arc::new(build_orchestrator(&config, store, sender));

    let state = AppState {
        orchestrator,
        verify_token,
        platform_object: config.platform.object.clone(),
    };

    let addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "listening for webhook events");

    axum::serve(listener, app_router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("received shutdown signal");
        })
        .await
        .context("server error")?;

    info!("standin shut down cleanly");
    Ok(())
}

/// Run the pipeline for one message against an in-memory store, printing
/// the reply instead of calling the send API.
async fn run_one_shot(config: StandinConfig, user: &str, text: &str) -> Result<()> {
    let store: Arc<dyn ProfileStore> = Arc::new(MemoryProfileStore::new());

    // The first-contact welcome would otherwise shadow every one-shot run.
    let mut profile = UserProfile::new(user);
    profile.response_count = 1;
    store
        .put(&profile)
        .await
        .context("failed to seed profile")?;

    let sender: Arc<dyn MessageSender> = Arc::new(ConsoleSender);
    let orchestrator = build_orchestrator(&config, store, sender);

    let mut rng = ThreadRandom;
    orchestrator.handle_message(user, text, &mut rng).await;
    Ok(())
}

fn build_orchestrator(
    config: &StandinConfig,
    store: Arc<dyn ProfileStore>,
    sender: Arc<dyn MessageSender>,
) -> Orchestrator {
    let persona = Arc::new(config.persona.clone());
    let humanizer = build_humanizer(config, Arc::clone(&persona));
    let generative = resolve_backend(&config.backend).map(|(backend, model)| GenerativePath {
        prompts: PromptBuilder::new(Arc::clone(&persona), model, config.backend.sampling.clone()),
        backend,
    });
    Orchestrator::new(persona, generative, humanizer, store, sender)
}

fn build_humanizer(config: &StandinConfig, persona: Arc<Persona>) -> Box<dyn Humanize> {
    match config.humanizer.strategy {
        HumanizerStrategy::Perturb => Box::new(PerturbationHumanizer::new(
            persona,
            config.humanizer.tuning.clone(),
        )),
        HumanizerStrategy::Shorthand => Box::new(ShorthandHumanizer),
    }
}

/// Resolve the configured generative backend, preferring Hugging Face.
fn resolve_backend(backend: &BackendConfig) -> Option<(Arc<dyn ReplyBackend>, String)> {
    if let Some(hf) = &backend.huggingface {
        info!(model = %hf.model, "replies will use the Hugging Face backend");
        let built = HuggingFaceBackend::new(
            hf.base_url.clone(),
            hf.api_token.clone(),
            hf.model.clone(),
        );
        return Some((Arc::new(built), hf.model.clone()));
    }
    if let Some(oa) = &backend.openai {
        info!(model = %oa.model, "replies will use the OpenAI-compatible backend");
        let built = OpenAiBackend::new(oa.base_url.clone(), oa.api_key.clone(), oa.model.clone());
        return Some((Arc::new(built), oa.model.clone()));
    }
    info!("no generative backend configured, using canned replies");
    None
}

async fn build_store(config: &StandinConfig) -> Result<Arc<dyn ProfileStore>> {
    Ok(match config.store.backend {
        StoreBackend::Sqlite => {
            info!(path = %config.store.path, "using SQLite profile store");
            Arc::new(
                SqliteProfileStore::open(&config.store.path)
                    .await
                    .context("failed to open profile database")?,
            )
        }
        StoreBackend::Json => {
            info!(path = %config.store.path, "using JSON-file profile store");
            Arc::new(JsonFileStore::new(config.store.path.clone()))
        }
        StoreBackend::Memory => {
            warn!("using in-memory profile store; profiles will not survive restarts");
            Arc::new(MemoryProfileStore::new())
        }
    })
}

/// Sender used by the one-shot `reply` subcommand: prints instead of
/// calling the platform.
struct ConsoleSender;

#[async_trait::async_trait]
impl MessageSender for ConsoleSender {
    async fn send(&self, recipient_id: &str, text: &str) -> Result<(), PlatformError> {
        println!("[to {recipient_id}] {text}");
        Ok(())
    }
}
