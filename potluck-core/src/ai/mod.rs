//! Completion service integration.
//!
//! This module provides:
//! - `AiClient` trait for abstracting completion providers
//! - `ClaudeClient` (Anthropic Messages API) and `OpenRouterClient`
//!   (OpenAI-compatible) implementations
//! - `FakeAiClient` for tests and offline runs
//! - Configuration via environment variables
//! - The recipe import prompt
//!
//! # Configuration
//!
//! - `POTLUCK_AI_PROVIDER` (optional): "claude" (default), "openrouter" or "fake"
//! - `ANTHROPIC_API_KEY` / `OPENROUTER_API_KEY`: key for the chosen provider
//! - `POTLUCK_AI_MODEL` (optional): model id
//! - `POTLUCK_AI_BASE_URL` (optional): API base URL
//! - `POTLUCK_AI_MAX_TOKENS`, `POTLUCK_AI_TEMPERATURE` (optional): sampling
//!
//! # Example
//!
//! ```ignore
//! use potluck_core::ai::{AiConfig, ChatMessage, ChatRequest};
//!
//! let client = AiConfig::from_env()?.build_client();
//!
//! let request = ChatRequest {
//!     messages: vec![ChatMessage::user("Hello!")],
//!     ..Default::default()
//! };
//!
//! let response = client.complete("test", request).await?;
//! println!("Response: {}", response.content);
//! ```

mod claude;
mod client;
pub(crate) mod config;
mod fake;
pub mod prompts;
mod recipe_import;
mod types;

pub use claude::{ClaudeClient, DEFAULT_CLAUDE_BASE_URL};
pub use client::{AiClient, AiError, OpenRouterClient};
pub use config::{
    AiConfig, AiProvider, ConfigError, DEFAULT_CLAUDE_MODEL, DEFAULT_OPENROUTER_BASE_URL,
    DEFAULT_OPENROUTER_MODEL, FAKE_RECIPE_RESPONSE,
};
pub use fake::FakeAiClient;
pub use recipe_import::request_recipe_json;
pub use types::{
    ChatMessage, ChatRequest, ChatResponse, CompletionParams, Role, Usage, DEFAULT_MAX_TOKENS,
    DEFAULT_TEMPERATURE,
};
