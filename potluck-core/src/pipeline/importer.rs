//! The recipe import pipeline: fetch, extract, prompt, validate.

use std::sync::Arc;
use std::time::Instant;

use tracing::{info_span, Instrument};
use url::Url;

use crate::ai::{request_recipe_json, AiClient, CompletionParams};
use crate::error::ImportError;
use crate::extract::extract_article;
use crate::http::HttpClient;
use crate::pipeline::{EmptyContentPolicy, ImportStage};
use crate::schema::parse_recipe_response;
use crate::types::RecipeDraft;

/// Imports a recipe from a URL.
///
/// Holds only shared, immutable collaborators, so one importer can serve any
/// number of concurrent requests.
#[derive(Clone)]
pub struct RecipeImporter {
    http: Arc<dyn HttpClient>,
    ai: Arc<dyn AiClient>,
    params: CompletionParams,
    empty_content: EmptyContentPolicy,
}

impl RecipeImporter {
    pub fn new(http: Arc<dyn HttpClient>, ai: Arc<dyn AiClient>) -> Self {
        Self {
            http,
            ai,
            params: CompletionParams::default(),
            empty_content: EmptyContentPolicy::default(),
        }
    }

    pub fn with_completion_params(mut self, params: CompletionParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_empty_content_policy(mut self, policy: EmptyContentPolicy) -> Self {
        self.empty_content = policy;
        self
    }

    pub fn empty_content_policy(&self) -> EmptyContentPolicy {
        self.empty_content
    }

    /// Model identifier used for completions.
    pub fn model_name(&self) -> &str {
        self.ai.model_name()
    }

    /// Run the whole pipeline for one URL.
    ///
    /// The URL is validated before any network call. On success the draft's
    /// provenance is set from `url`, whatever the model said.
    pub async fn import(&self, url: &str) -> Result<RecipeDraft, ImportError> {
        let start = Instant::now();
        let result = self.run(url).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        match &result {
            Ok(draft) => tracing::info!(
                url,
                stage = %ImportStage::Succeeded,
                title = %draft.title,
                ingredients = draft.ingredients.len(),
                instructions = draft.instructions.len(),
                duration_ms,
                "recipe imported"
            ),
            Err(e) => tracing::warn!(
                url,
                stage = %ImportStage::Failed,
                failed_at = %e.stage(),
                details = e.details().as_deref().unwrap_or(""),
                duration_ms,
                "recipe import failed: {}",
                e
            ),
        }

        result
    }

    async fn run(&self, url: &str) -> Result<RecipeDraft, ImportError> {
        validate_url(url)?;

        let html = self
            .http
            .fetch_html(url)
            .instrument(stage_span(ImportStage::Fetching))
            .await
            .map_err(ImportError::FetchFailed)?;

        let extracted = {
            let _span = stage_span(ImportStage::Extracting).entered();
            let extracted = extract_article(&html, Some(url));
            if extracted.is_empty() {
                match self.empty_content {
                    EmptyContentPolicy::Reject => return Err(ImportError::ExtractionEmpty),
                    EmptyContentPolicy::Permissive => tracing::warn!(
                        url,
                        page_title = extracted.page_title.as_deref().unwrap_or(""),
                        "no article content found, prompting with empty content"
                    ),
                }
            } else {
                tracing::debug!(
                    chars = extracted.content.len(),
                    page_title = extracted.page_title.as_deref().unwrap_or(""),
                    "article extracted"
                );
            }
            extracted
        };

        let raw = request_recipe_json(self.ai.as_ref(), &extracted, &self.params)
            .instrument(stage_span(ImportStage::Prompting))
            .await
            .map_err(ImportError::ModelCallFailed)?;

        let mut draft = {
            let _span = stage_span(ImportStage::Validating).entered();
            parse_recipe_response(&raw)?
        };

        draft.attach_source(url);
        Ok(draft)
    }
}

fn stage_span(stage: ImportStage) -> tracing::Span {
    info_span!("import_stage", stage = %stage)
}

/// Accept only absolute http(s) URLs.
fn validate_url(url: &str) -> Result<Url, ImportError> {
    let parsed = Url::parse(url).map_err(|e| ImportError::InvalidUrl(e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" if parsed.host_str().is_some() => Ok(parsed),
        "http" | "https" => Err(ImportError::InvalidUrl("URL has no host".to_string())),
        scheme => Err(ImportError::InvalidUrl(format!(
            "unsupported scheme '{}'",
            scheme
        ))),
    }
}
