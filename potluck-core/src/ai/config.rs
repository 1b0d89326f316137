//! Completion service configuration from environment variables.

use std::env;
use std::sync::Arc;
use thiserror::Error;

use super::claude::{ClaudeClient, DEFAULT_CLAUDE_BASE_URL};
use super::client::{AiClient, OpenRouterClient};
use super::fake::FakeAiClient;
use super::types::{CompletionParams, DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};

/// Default Claude model.
pub const DEFAULT_CLAUDE_MODEL: &str = "claude-3-5-sonnet-20241022";

/// Default OpenRouter base URL.
pub const DEFAULT_OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Default OpenRouter model.
pub const DEFAULT_OPENROUTER_MODEL: &str = "anthropic/claude-3.5-sonnet";

/// What the fake provider answers with: the smallest recipe that passes
/// validation.
pub const FAKE_RECIPE_RESPONSE: &str = r#"{
  "title": "Placeholder Recipe",
  "description": null,
  "prep_time": null,
  "cook_time": null,
  "servings": null,
  "ingredients": [],
  "instructions": [],
  "suggested_tags": [],
  "notes": {"tips": [], "substitutions": [], "storage": [], "technique": []}
}"#;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {var}: {value}")]
    InvalidValue { var: String, value: String },
}

/// Which completion service to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiProvider {
    Claude,
    OpenRouter,
    /// Answers every prompt with [`FAKE_RECIPE_RESPONSE`]; for local runs
    /// without an API key.
    Fake,
}

impl AiProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            AiProvider::Claude => "claude",
            AiProvider::OpenRouter => "openrouter",
            AiProvider::Fake => "fake",
        }
    }
}

impl std::str::FromStr for AiProvider {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "claude" | "anthropic" => Ok(AiProvider::Claude),
            "openrouter" | "openai" => Ok(AiProvider::OpenRouter),
            "fake" => Ok(AiProvider::Fake),
            _ => Err(()),
        }
    }
}

/// Completion service configuration.
#[derive(Debug, Clone)]
pub struct AiConfig {
    pub provider: AiProvider,
    /// API key for the selected provider. Empty for `Fake`.
    pub api_key: String,
    /// Model identifier.
    pub model: String,
    /// Base URL for the API.
    pub base_url: String,
    /// Sampling parameters for recipe import calls.
    pub params: CompletionParams,
}

impl AiConfig {
    /// Load configuration from environment variables.
    ///
    /// - `POTLUCK_AI_PROVIDER`: "claude" (default), "openrouter" or "fake"
    /// - `ANTHROPIC_API_KEY`: required for claude
    /// - `OPENROUTER_API_KEY`: required for openrouter
    /// - `POTLUCK_AI_MODEL`: model id (default depends on provider)
    /// - `POTLUCK_AI_BASE_URL`: API base URL (default depends on provider)
    /// - `POTLUCK_AI_MAX_TOKENS`: completion budget (default: 4096)
    /// - `POTLUCK_AI_TEMPERATURE`: sampling temperature (default: 0.2)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let provider = match var("POTLUCK_AI_PROVIDER") {
            Some(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
                var: "POTLUCK_AI_PROVIDER".to_string(),
                value,
            })?,
            None => AiProvider::Claude,
        };

        let (key_var, default_model, default_base_url) = match provider {
            AiProvider::Claude => (
                Some("ANTHROPIC_API_KEY"),
                DEFAULT_CLAUDE_MODEL,
                DEFAULT_CLAUDE_BASE_URL,
            ),
            AiProvider::OpenRouter => (
                Some("OPENROUTER_API_KEY"),
                DEFAULT_OPENROUTER_MODEL,
                DEFAULT_OPENROUTER_BASE_URL,
            ),
            AiProvider::Fake => (None, "fake-model", ""),
        };

        let api_key = match key_var {
            Some(name) => var(name).ok_or_else(|| ConfigError::MissingEnvVar(name.to_string()))?,
            None => String::new(),
        };

        let model = var("POTLUCK_AI_MODEL").unwrap_or_else(|| default_model.to_string());
        let base_url = var("POTLUCK_AI_BASE_URL").unwrap_or_else(|| default_base_url.to_string());

        let max_tokens = parse_var(&var, "POTLUCK_AI_MAX_TOKENS")?.unwrap_or(DEFAULT_MAX_TOKENS);
        let temperature =
            parse_var(&var, "POTLUCK_AI_TEMPERATURE")?.unwrap_or(DEFAULT_TEMPERATURE);

        Ok(Self {
            provider,
            api_key,
            model,
            base_url,
            params: CompletionParams {
                max_tokens,
                temperature,
            },
        })
    }

    /// Construct the client for the configured provider.
    pub fn build_client(&self) -> Arc<dyn AiClient> {
        match self.provider {
            AiProvider::Claude => Arc::new(ClaudeClient::with_base_url(
                self.api_key.clone(),
                self.model.clone(),
                self.base_url.clone(),
            )),
            AiProvider::OpenRouter => Arc::new(OpenRouterClient::new(
                &self.api_key,
                &self.base_url,
                self.model.clone(),
            )),
            AiProvider::Fake => {
                Arc::new(FakeAiClient::new().with_default_response(FAKE_RECIPE_RESPONSE))
            }
        }
    }
}

pub(crate) fn parse_var<T, F>(var: &F, name: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match var(name) {
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue {
                var: name.to_string(),
                value,
            }),
        None => Ok(None),
    }
}
