//! Configuration loading and management.
//!
//! Loads configuration from `./standin.toml` (or `$STANDIN_CONFIG_PATH`).
//! Environment variables override file values; file values override
//! defaults.
//!
//! Precedence: env vars > config file > defaults.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::backend::{huggingface, openai};
use crate::persona::Persona;
use crate::platform::send::DEFAULT_GRAPH_BASE;
use crate::reply::humanizer::HumanizerTuning;
use crate::reply::prompt::SamplingParams;

// ── Top-level config ────────────────────────────────────────────

/// Top-level configuration loaded from TOML.
///
/// Path: `./standin.toml` or `$STANDIN_CONFIG_PATH`.
/// Env vars override file values; file values override defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StandinConfig {
    /// HTTP server settings (`[server]`).
    pub server: ServerConfig,
    /// Messaging-platform settings (`[platform]`).
    pub platform: PlatformConfig,
    /// Generative-backend settings (`[backend]`).
    pub backend: BackendConfig,
    /// Profile persistence settings (`[store]`).
    pub store: StoreConfig,
    /// The persona replies are written as (`[persona]`).
    pub persona: Persona,
    /// Humanizer strategy and step probabilities (`[humanizer]`).
    pub humanizer: HumanizerConfig,
}

impl StandinConfig {
    /// Load configuration with precedence: env vars > TOML file > defaults.
    ///
    /// If the config file does not exist, defaults are used.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from_file()?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load from the TOML file only, no env overrides.
    fn load_from_file() -> Result<Self> {
        let path = Self::config_path_with(|key| std::env::var(key).ok());
        match std::fs::read_to_string(&path) {
            Ok(contents) => {
                tracing::info!(path = %path.display(), "loading config from file");
                let config: StandinConfig =
                    toml::from_str(&contents).context("failed to parse config TOML")?;
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("no config file found, using defaults");
                Ok(StandinConfig::default())
            }
            Err(e) => Err(anyhow::anyhow!("failed to read config file: {e}")),
        }
    }

    /// Resolve the config path using a custom env resolver (for testing).
    fn config_path_with(env: impl Fn(&str) -> Option<String>) -> PathBuf {
        match env("STANDIN_CONFIG_PATH") {
            Some(p) => PathBuf::from(p),
            None => PathBuf::from("standin.toml"),
        }
    }

    /// Apply environment variable overrides (env > config > defaults).
    ///
    /// Takes a resolver function for testability.
    fn apply_overrides(&mut self, env: impl Fn(&str) -> Option<String>) {
        // Server.
        if let Some(v) = env("STANDIN_PORT") {
            match v.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!(
                    var = "STANDIN_PORT",
                    value = %v,
                    "ignoring invalid env override"
                ),
            }
        }
        if let Some(v) = env("STANDIN_LOG_LEVEL") {
            self.server.log_level = v;
        }

        // Platform.
        if let Some(v) = env("STANDIN_VERIFY_TOKEN") {
            self.platform.verify_token = Some(v);
        }
        if let Some(v) = env("STANDIN_ACCESS_TOKEN") {
            self.platform.access_token = Some(v);
        }
        if let Some(v) = env("STANDIN_GRAPH_BASE") {
            self.platform.graph_base = v;
        }

        // Backend — Hugging Face (env var presence creates the backend).
        if let Some(token) = env("STANDIN_HF_TOKEN") {
            let model = env("STANDIN_HF_MODEL").unwrap_or_else(|| {
                self.backend
                    .huggingface
                    .as_ref()
                    .map(|c| c.model.clone())
                    .unwrap_or_else(default_hf_model)
            });
            let base_url = self
                .backend
                .huggingface
                .as_ref()
                .map(|c| c.base_url.clone())
                .unwrap_or_else(default_hf_base);
            self.backend.huggingface = Some(HuggingFaceConfig {
                api_token: token,
                model,
                base_url,
            });
        }

        // Backend — OpenAI-compatible.
        if let Some(key) = env("STANDIN_OPENAI_API_KEY") {
            let model = env("STANDIN_OPENAI_MODEL").unwrap_or_else(|| {
                self.backend
                    .openai
                    .as_ref()
                    .map(|c| c.model.clone())
                    .unwrap_or_else(default_openai_model)
            });
            let base_url = self
                .backend
                .openai
                .as_ref()
                .map(|c| c.base_url.clone())
                .unwrap_or_else(default_openai_base);
            self.backend.openai = Some(OpenAiConfig {
                api_key: key,
                model,
                base_url,
            });
        }

        // Store.
        if let Some(v) = env("STANDIN_STORE_PATH") {
            self.store.path = v;
        }
        if let Some(v) = env("STANDIN_STORE_BACKEND") {
            match v.as_str() {
                "sqlite" => self.store.backend = StoreBackend::Sqlite,
                "json" => self.store.backend = StoreBackend::Json,
                "memory" => self.store.backend = StoreBackend::Memory,
                _ => tracing::warn!(
                    var = "STANDIN_STORE_BACKEND",
                    value = %v,
                    "ignoring invalid env override"
                ),
            }
        }
    }

    /// Parse a TOML string into config (for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: StandinConfig =
            toml::from_str(toml_str).context("failed to parse config TOML")?;
        Ok(config)
    }
}

// ── Server config ───────────────────────────────────────────────

/// HTTP server settings (`[server]`).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Port the webhook server listens on.
    pub port: u16,
    /// Tracing log level filter.
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            log_level: "info".to_owned(),
        }
    }
}

// ── Platform config ─────────────────────────────────────────────

/// Messaging-platform settings (`[platform]`).
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    /// Webhook `object` value accepted.
    pub object: String,
    /// Graph API base URL.
    pub graph_base: String,
    /// Webhook verification token.
    pub verify_token: Option<String>,
    /// Page access token for the send API.
    pub access_token: Option<String>,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            object: "instagram".to_owned(),
            graph_base: DEFAULT_GRAPH_BASE.to_owned(),
            verify_token: None,
            access_token: None,
        }
    }
}

impl std::fmt::Debug for PlatformConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlatformConfig")
            .field("object", &self.object)
            .field("graph_base", &self.graph_base)
            .field(
                "verify_token",
                &self.verify_token.as_ref().map(|_| "__REDACTED__"),
            )
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "__REDACTED__"),
            )
            .finish()
    }
}

// ── Backend config ──────────────────────────────────────────────

/// Generative-backend settings (`[backend]`).
///
/// With neither backend configured, every reply comes from the rule-based
/// selector.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Hugging Face Inference API backend (`[backend.huggingface]`).
    pub huggingface: Option<HuggingFaceConfig>,
    /// OpenAI-compatible backend (`[backend.openai]`).
    pub openai: Option<OpenAiConfig>,
    /// Sampling knobs applied to every request (`[backend.sampling]`).
    pub sampling: SamplingParams,
}

/// Hugging Face backend config.
#[derive(Clone, Deserialize)]
pub struct HuggingFaceConfig {
    /// API token.
    pub api_token: String,
    /// Model identifier.
    #[serde(default = "default_hf_model")]
    pub model: String,
    /// API base URL.
    #[serde(default = "default_hf_base")]
    pub base_url: String,
}

impl std::fmt::Debug for HuggingFaceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HuggingFaceConfig")
            .field("api_token", &"__REDACTED__")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

fn default_hf_model() -> String {
    "HuggingFaceH4/zephyr-7b-beta".to_owned()
}

fn default_hf_base() -> String {
    huggingface::DEFAULT_API_BASE.to_owned()
}

/// OpenAI-compatible backend config.
#[derive(Clone, Deserialize)]
pub struct OpenAiConfig {
    /// API key.
    pub api_key: String,
    /// Model identifier.
    #[serde(default = "default_openai_model")]
    pub model: String,
    /// API base URL.
    #[serde(default = "default_openai_base")]
    pub base_url: String,
}

impl std::fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiConfig")
            .field("api_key", &"__REDACTED__")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

fn default_openai_model() -> String {
    "gpt-4o-mini".to_owned()
}

fn default_openai_base() -> String {
    openai::DEFAULT_API_BASE.to_owned()
}

// ── Store config ────────────────────────────────────────────────

/// Profile store backend selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// SQLite document rows (production default).
    #[default]
    Sqlite,
    /// Single JSON map file.
    Json,
    /// In-memory, nothing survives a restart.
    Memory,
}

/// Profile persistence settings (`[store]`).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Which backend persists profiles.
    pub backend: StoreBackend,
    /// Database or file path, depending on the backend.
    pub path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Sqlite,
            path: "/tmp/standin-profiles.db".to_owned(),
        }
    }
}

// ── Humanizer config ────────────────────────────────────────────

/// Humanizer strategy selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HumanizerStrategy {
    /// Canonical word-swap + emoji + phrase + capitalization chain.
    #[default]
    Perturb,
    /// Naive substring-replacement variant.
    Shorthand,
}

/// Humanizer settings (`[humanizer]`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HumanizerConfig {
    /// Which strategy perturbs replies.
    pub strategy: HumanizerStrategy,
    /// Step probabilities for the perturbation chain
    /// (`[humanizer.tuning]`).
    pub tuning: HumanizerTuning,
}

// ── Tests ───────────────────────────────────────────────────────
