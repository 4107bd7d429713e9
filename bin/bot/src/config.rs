//! Centralized bot configuration.
//!
//! Strongly-typed configuration loaded via the `config` crate from
//! environment variables with a `__` separator, e.g. `TELEGRAM__BOT_TOKEN`,
//! `OPENAI__API_KEY`, `DIALOGUE__WINDOW_SIZE`.
//!
//! The two credentials are required; the process must not start serving
//! without them.

use careline_ai::CompletionOptions;
use serde::Deserialize;
use std::time::Duration;

/// Bot configuration composed from per-concern sections.
#[derive(Debug, Deserialize)]
pub struct BotConfig {
    /// Telegram transport configuration.
    pub telegram: TelegramConfig,

    /// Completion service configuration.
    pub openai: OpenAiConfig,

    /// Dialogue configuration.
    #[serde(default)]
    pub dialogue: DialogueConfig,
}

/// Telegram transport configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramConfig {
    /// Bot API token. Required.
    pub bot_token: String,
}

/// Completion service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiConfig {
    /// API key. Required.
    pub api_key: String,

    /// Model identifier.
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature in [0, 1].
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Upper bound on reply length in tokens.
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    /// Maximum wall-clock seconds to await a completion.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

/// Dialogue configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DialogueConfig {
    /// Number of turns visible to the model per call.
    #[serde(default = "default_window_size")]
    pub window_size: usize,

    /// Overrides the built-in system directive when set.
    #[serde(default)]
    pub system_directive: Option<String>,
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_output_tokens() -> u32 {
    400
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_window_size() -> usize {
    10
}

impl Default for DialogueConfig {
    fn default() -> Self {
        Self {
            window_size: default_window_size(),
            system_directive: None,
        }
    }
}

impl OpenAiConfig {
    /// Builds the fixed per-call completion options.
    #[must_use]
    pub fn completion_options(&self) -> CompletionOptions {
        CompletionOptions::default()
            .with_model(self.model.clone())
            .with_temperature(self.temperature)
            .with_max_output_tokens(self.max_output_tokens)
            .with_timeout(Duration::from_secs(self.timeout_seconds))
    }
}

impl BotConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if either required credential is missing or a value
    /// fails to parse. This is a fatal startup condition.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(
                config::Environment::default()
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
