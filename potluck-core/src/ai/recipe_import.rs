//! Ask the completion service for recipe JSON.

use crate::ai::prompts::recipe_import::{render_recipe_import_prompt, RECIPE_IMPORT_PROMPT_NAME};
use crate::ai::{AiClient, AiError, ChatMessage, ChatRequest, CompletionParams};
use crate::types::ExtractedContent;

/// Send the extracted content to the model and return its raw text reply.
///
/// The reply is untrusted; callers sanitize and validate it.
pub async fn request_recipe_json(
    ai_client: &dyn AiClient,
    extracted: &ExtractedContent,
    params: &CompletionParams,
) -> Result<String, AiError> {
    let prompt = render_recipe_import_prompt(&extracted.content, extracted.content_type);
    let request = ChatRequest {
        messages: vec![ChatMessage::user(prompt)],
        json_response: true,
        max_tokens: Some(params.max_tokens),
        temperature: Some(params.temperature),
    };

    let response = ai_client
        .complete(RECIPE_IMPORT_PROMPT_NAME, request)
        .await?;

    tracing::debug!(
        model = ai_client.model_name(),
        prompt_tokens = response.usage.prompt_tokens,
        completion_tokens = response.usage.completion_tokens,
        "recipe completion received"
    );

    Ok(response.content)
}
