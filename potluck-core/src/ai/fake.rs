//! Fake completion client for testing.
//!
//! Returns deterministic responses based on prompt matching, so tests run
//! without network access or API costs.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use super::client::{AiClient, AiError};
use super::types::{ChatRequest, ChatResponse, Usage};

/// A fake completion client for testing.
///
/// Responses are matched by checking whether the prompt contains a registered
/// substring (case-insensitive), in registration order. If nothing matches the
/// default response is returned, or an error when there is none.
#[derive(Debug, Default)]
pub struct FakeAiClient {
    responses: Vec<(String, String)>,
    default_response: Option<String>,
    failure: Option<String>,
    calls: AtomicUsize,
    last_request: Mutex<Option<ChatRequest>>,
}

impl FakeAiClient {
    /// Create a FakeAiClient with no registered responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Respond with `response` when the prompt contains `prompt_contains`.
    pub fn with_response(mut self, prompt_contains: &str, response: &str) -> Self {
        self.responses
            .push((prompt_contains.to_lowercase(), response.to_string()));
        self
    }

    /// Set the response returned when no pattern matches.
    pub fn with_default_response(mut self, response: &str) -> Self {
        self.default_response = Some(response.to_string());
        self
    }

    /// Fail every call with an API error.
    pub fn failing(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    /// Number of completions requested so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The most recent request, if any.
    pub fn last_request(&self) -> Option<ChatRequest> {
        self.last_request
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl AiClient for FakeAiClient {
    async fn complete(
        &self,
        _prompt_name: &str,
        request: ChatRequest,
    ) -> Result<ChatResponse, AiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let prompt = request
            .messages
            .iter()
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        *self
            .last_request
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(request);

        if let Some(message) = &self.failure {
            return Err(AiError::Api(message.clone()));
        }

        let prompt_lower = prompt.to_lowercase();
        let content = self
            .responses
            .iter()
            .find(|(pattern, _)| prompt_lower.contains(pattern))
            .map(|(_, response)| response.clone())
            .or_else(|| self.default_response.clone())
            .ok_or_else(|| {
                let preview: String = prompt.chars().take(100).collect();
                AiError::Api(format!(
                    "FakeAiClient: No response configured for prompt (first 100 chars): {}",
                    preview
                ))
            })?;

        Ok(ChatResponse {
            content,
            usage: Usage::default(),
        })
    }

    fn model_name(&self) -> &str {
        "fake-model"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::ChatMessage;

    fn request(prompt: &str) -> ChatRequest {
        ChatRequest {
            messages: vec![ChatMessage::user(prompt)],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_matching_is_case_insensitive() {
        let client = FakeAiClient::new().with_response("HELLO", "world");
        let result = client.complete("t", request("hello there")).await.unwrap();
        assert_eq!(result.content, "world");
    }

    #[tokio::test]
    async fn test_first_registered_match_wins() {
        let client = FakeAiClient::new()
            .with_response("soup", "first")
            .with_response("tomato", "second");
        let result = client.complete("t", request("tomato soup")).await.unwrap();
        assert_eq!(result.content, "first");
    }

    #[tokio::test]
    async fn test_no_match_without_default_is_error() {
        let client = FakeAiClient::new();
        assert!(client.complete("t", request("random")).await.is_err());
        assert_eq!(client.call_count(), 1);
    }

    #[tokio::test]
    async fn test_default_response() {
        let client = FakeAiClient::new().with_default_response("default");
        let result = client.complete("t", request("random")).await.unwrap();
        assert_eq!(result.content, "default");
    }

    #[tokio::test]
    async fn test_failing_records_request() {
        let client = FakeAiClient::new()
            .with_default_response("unused")
            .failing("boom");
        let err = client.complete("t", request("payload")).await.unwrap_err();
        assert!(matches!(err, AiError::Api(ref m) if m == "boom"));

        let last = client.last_request().unwrap();
        assert_eq!(last.messages[0].content, "payload");
    }
}
