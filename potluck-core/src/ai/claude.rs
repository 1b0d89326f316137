//! Anthropic Messages API client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::client::{AiClient, AiError};
use super::types::{ChatRequest, ChatResponse, Role, Usage, DEFAULT_MAX_TOKENS};

/// Default Anthropic API base URL.
pub const DEFAULT_CLAUDE_BASE_URL: &str = "https://api.anthropic.com";

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Claude API client.
#[derive(Debug)]
pub struct ClaudeClient {
    api_key: String,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl ClaudeClient {
    /// Create a new ClaudeClient with the given API key and model.
    pub fn new(api_key: String, model: String) -> Self {
        Self::with_base_url(api_key, model, DEFAULT_CLAUDE_BASE_URL.to_string())
    }

    pub fn with_base_url(api_key: String, model: String, base_url: String) -> Self {
        Self {
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Claude takes the system prompt as a top-level field, not a message.
    fn build_request(&self, request: ChatRequest) -> ClaudeRequest {
        let mut system = Vec::new();
        let mut messages = Vec::new();
        for msg in request.messages {
            match msg.role {
                Role::System => system.push(msg.content),
                Role::User => messages.push(ClaudeMessage {
                    role: "user",
                    content: msg.content,
                }),
                Role::Assistant => messages.push(ClaudeMessage {
                    role: "assistant",
                    content: msg.content,
                }),
            }
        }

        ClaudeRequest {
            model: self.model.clone(),
            max_tokens: request.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            temperature: request.temperature,
            system: (!system.is_empty()).then(|| system.join("\n\n")),
            messages,
        }
    }
}

/// Claude API request format.
#[derive(Debug, Serialize)]
struct ClaudeRequest {
    model: String,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<ClaudeMessage>,
}

#[derive(Debug, Serialize)]
struct ClaudeMessage {
    role: &'static str,
    content: String,
}

/// Claude API response format.
#[derive(Debug, Deserialize)]
struct ClaudeResponse {
    content: Vec<ClaudeContent>,
    #[serde(default)]
    usage: Option<ClaudeUsage>,
}

#[derive(Debug, Deserialize)]
struct ClaudeContent {
    #[serde(rename = "type")]
    content_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ClaudeUsage {
    input_tokens: u32,
    output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ClaudeApiError {
    message: String,
}

/// Error response from Claude API.
#[derive(Debug, Deserialize)]
struct ClaudeErrorResponse {
    error: ClaudeApiError,
}

fn parse_success_body(body: &str) -> Result<ChatResponse, AiError> {
    let response: ClaudeResponse =
        serde_json::from_str(body).map_err(|e| AiError::ParseError(e.to_string()))?;

    let usage = response
        .usage
        .map(|u| Usage {
            prompt_tokens: u.input_tokens,
            completion_tokens: u.output_tokens,
            total_tokens: u.input_tokens + u.output_tokens,
        })
        .unwrap_or_default();

    // First text block wins
    let content = response
        .content
        .into_iter()
        .find_map(|c| {
            if c.content_type == "text" {
                c.text
            } else {
                None
            }
        })
        .ok_or_else(|| AiError::ParseError("No text content in response".to_string()))?;

    Ok(ChatResponse { content, usage })
}

fn parse_error_body(status: u16, body: String) -> AiError {
    match serde_json::from_str::<ClaudeErrorResponse>(&body) {
        Ok(error_response) => AiError::ApiStatus {
            status,
            message: error_response.error.message,
        },
        Err(_) => AiError::ApiStatus {
            status,
            message: body,
        },
    }
}

#[async_trait]
impl AiClient for ClaudeClient {
    async fn complete(
        &self,
        prompt_name: &str,
        request: ChatRequest,
    ) -> Result<ChatResponse, AiError> {
        let request = self.build_request(request);

        tracing::debug!(prompt_name, model = %self.model, "Calling Claude API");

        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| AiError::Api(e.to_string()))?;

        let status = response.status().as_u16();

        if status == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            return Err(AiError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| AiError::Api(e.to_string()))?;

        if status != 200 {
            return Err(parse_error_body(status, body));
        }

        parse_success_body(&body)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
