//! Server configuration from environment variables.

use anyhow::Context;
use potluck_core::ai::AiConfig;
use potluck_core::{BrowserClientBuilder, EmptyContentPolicy, RecipeImporter};
use std::env;
use std::sync::Arc;

/// Default listen address.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

pub struct ServerConfig {
    pub bind_addr: String,
    pub ai: AiConfig,
    pub fetch: BrowserClientBuilder,
    pub empty_content: EmptyContentPolicy,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// - `POTLUCK_BIND_ADDR`: listen address (default: "0.0.0.0:3000")
    /// - `POTLUCK_AI_*`, `ANTHROPIC_API_KEY`, `OPENROUTER_API_KEY`: see `AiConfig`
    /// - `POTLUCK_FETCH_USER_AGENT`, `POTLUCK_FETCH_TIMEOUT_SECS`: page fetching
    /// - `POTLUCK_REJECT_EMPTY_CONTENT`: fail imports of pages with no article
    pub fn from_env() -> anyhow::Result<Self> {
        let bind_addr = env::var("POTLUCK_BIND_ADDR")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());

        let ai = AiConfig::from_env().context("Invalid completion service configuration")?;
        let fetch = BrowserClientBuilder::from_env().context("Invalid page fetch configuration")?;

        Ok(Self {
            bind_addr,
            ai,
            fetch,
            empty_content: EmptyContentPolicy::from_env(),
        })
    }

    /// Construct the shared importer.
    pub fn build_importer(&self) -> anyhow::Result<RecipeImporter> {
        let http = self
            .fetch
            .clone()
            .build()
            .context("Failed to build HTTP client")?;

        Ok(RecipeImporter::new(Arc::new(http), self.ai.build_client())
            .with_completion_params(self.ai.params)
            .with_empty_content_policy(self.empty_content))
    }
}
