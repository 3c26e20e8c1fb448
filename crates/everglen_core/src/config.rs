//! Layered configuration.
//!
//! Sources, lowest precedence first:
//! - Bundled defaults (include_str! from everglen.toml)
//! - `~/.config/everglen/everglen.toml`
//! - `./everglen.toml`, or an explicit path
//! - `EVERGLEN__SECTION__KEY` environment variables

use everglen_error::{ConfigError, EverglenError, EverglenResult};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, instrument};

const DEFAULT_CONFIG: &str = include_str!("../../../everglen.toml");

/// Completion endpoint settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    /// Chat completions URL
    pub url: String,
    /// Model identifier
    pub model: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Upper bound on generated tokens
    pub max_tokens: u32,
    /// Nucleus sampling mass
    pub top_p: f32,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            url: "https://api.groq.com/openai/v1/chat/completions".to_string(),
            model: "llama-3.3-70b-versatile".to_string(),
            api_key_env: "GROQ_API_KEY".to_string(),
            max_tokens: 1024,
            top_p: 1.0,
        }
    }
}

/// Retry policy settings applied to every completion call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Attempts after the first; 0 disables retrying
    pub max_retries: usize,
    /// First backoff delay in milliseconds
    pub initial_backoff_ms: u64,
    /// Cap on a single backoff delay in seconds
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            initial_backoff_ms: 500,
            max_delay_secs: 30,
        }
    }
}

/// Sampling temperature per call site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    /// Story outline generation
    pub generate_story: f32,
    /// Plot expansion into prose
    pub expand_plot: f32,
    /// Character extraction
    pub extract_characters: f32,
    /// Humanizing rewrite
    pub humanize: f32,
    /// Title for a humanized story
    pub title: f32,
    /// Plot summary
    pub summarize: f32,
    /// Location inference
    pub locate: f32,
    /// Plot-hole detection
    pub plot_holes: f32,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            generate_story: 0.8,
            expand_plot: 0.7,
            extract_characters: 0.8,
            humanize: 0.8,
            title: 0.8,
            summarize: 0.8,
            locate: 0.8,
            plot_holes: 0.7,
        }
    }
}

/// Defaults for optional prompt parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Output language
    pub language: String,
    /// Continuity mode for continuations
    pub continuity: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            language: "English".to_string(),
            continuity: "usual".to_string(),
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to bind
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:5000".to_string(),
        }
    }
}

/// Persistence settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// PostgreSQL URL; the in-memory store is used when unset
    pub url: Option<String>,
}

/// Complete configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EverglenConfig {
    /// Completion endpoint
    pub completion: CompletionConfig,
    /// Retry policy
    pub retry: RetryConfig,
    /// Per-call temperatures
    pub sampling: SamplingConfig,
    /// Prompt defaults
    pub defaults: DefaultsConfig,
    /// HTTP server
    pub server: ServerConfig,
    /// Persistence
    pub database: DatabaseConfig,
}

impl EverglenConfig {
    /// Load configuration from the standard locations, replacing
    /// `./everglen.toml` with `path` when given.
    ///
    /// An explicit path must exist.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a present source is malformed.
    #[instrument(fields(path = ?path))]
    pub fn load_with(path: Option<&Path>) -> EverglenResult<Self> {
        debug!("Loading configuration with precedence: env > local file > home dir > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/everglen/everglen.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = match path {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::with_name("everglen").required(false)),
        };

        builder = builder.add_source(Environment::with_prefix("EVERGLEN").separator("__"));

        builder
            .build()
            .map_err(|e| {
                EverglenError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                EverglenError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }

    /// Parse the bundled defaults only.
    pub fn bundled() -> EverglenResult<Self> {
        Self::from_toml(DEFAULT_CONFIG)
    }

    /// Parse a TOML document on top of the built-in defaults.
    pub fn from_toml(toml: &str) -> EverglenResult<Self> {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .and_then(Config::try_deserialize)
            .map_err(|e| {
                EverglenError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }
}
