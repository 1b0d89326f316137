//! End-to-end pipeline tests with the page fetch and the model substituted.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use potluck_core::ai::{AiError, CompletionParams, FakeAiClient};
use potluck_core::{
    EmptyContentPolicy, FetchError, ImportError, MockClient, RecipeImporter, SourceType,
    ViolationKind,
};

const SOUP_URL: &str = "https://weeknight.example.com/recipes/tomato-soup";

fn fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e))
}

fn importer(http: &Arc<MockClient>, ai: &Arc<FakeAiClient>) -> RecipeImporter {
    RecipeImporter::new(http.clone(), ai.clone())
}

#[tokio::test]
async fn imports_tomato_soup_end_to_end() {
    let http = Arc::new(MockClient::new().with_html(SOUP_URL, &fixture("tomato_soup.html")));
    let ai = Arc::new(
        FakeAiClient::new().with_response("Tomato Soup", &fixture("tomato_soup_response.txt")),
    );

    let draft = importer(&http, &ai).import(SOUP_URL).await.unwrap();

    assert_eq!(draft.title, "Tomato Soup");
    assert_eq!(draft.ingredients.len(), 3);
    assert_eq!(draft.instructions.len(), 4);
    assert_eq!(draft.servings, Some(4));
    assert_eq!(draft.prep_time, Some(10.0));
    assert_eq!(draft.ingredients[1].unit, None);
    assert_eq!(draft.suggested_tags, vec!["soup", "vegetarian", "weeknight"]);
    assert_eq!(draft.notes.storage.len(), 1);

    // Provenance comes from the request, never from the model
    assert_eq!(draft.source_url.as_deref(), Some(SOUP_URL));
    assert_eq!(draft.source_type, Some(SourceType::Import));

    assert_eq!(http.fetch_count(), 1);
    assert_eq!(ai.call_count(), 1);

    // The model saw the article, not the page chrome
    let prompt = &ai.last_request().unwrap().messages[0].content;
    assert!(prompt.contains("<li>2 lb ripe tomatoes, halved</li>"));
    assert!(prompt.contains("Content type: article"));
    assert!(!prompt.contains("dataLayer"));
    assert!(!prompt.contains("Five-bean chili"));
}

#[tokio::test]
async fn serialized_draft_reports_import_source() {
    let http = Arc::new(MockClient::new().with_html(SOUP_URL, &fixture("tomato_soup.html")));
    let ai = Arc::new(FakeAiClient::new().with_default_response(&fixture("tomato_soup_response.txt")));

    let draft = importer(&http, &ai).import(SOUP_URL).await.unwrap();
    let json = serde_json::to_value(&draft).unwrap();

    assert_eq!(json["source_type"], "import");
    assert_eq!(json["source_url"], SOUP_URL);
    assert_eq!(json["instructions"][3]["step_number"], 4);
}

#[tokio::test]
async fn invalid_url_is_rejected_without_fetching() {
    let http = Arc::new(MockClient::new());
    let ai = Arc::new(FakeAiClient::new().with_default_response("{}"));

    for url in ["not a url", "ftp://example.com/soup", ""] {
        let err = importer(&http, &ai).import(url).await.unwrap_err();
        assert!(matches!(err, ImportError::InvalidUrl(_)), "{url}: {err:?}");
    }

    assert_eq!(http.fetch_count(), 0);
    assert_eq!(ai.call_count(), 0);
}

#[tokio::test]
async fn missing_title_is_a_schema_violation() {
    let response = fixture("tomato_soup_response.txt")
        .replace(r#""title": "Tomato Soup","#, "");
    let http = Arc::new(MockClient::new().with_html(SOUP_URL, &fixture("tomato_soup.html")));
    let ai = Arc::new(FakeAiClient::new().with_default_response(&response));

    let err = importer(&http, &ai).import(SOUP_URL).await.unwrap_err();

    match err {
        ImportError::SchemaViolation(violations) => {
            assert!(violations
                .iter()
                .any(|v| v.path == "title" && v.kind == ViolationKind::Missing));
        }
        other => panic!("expected schema violation, got {other:?}"),
    }
}

#[tokio::test]
async fn prose_only_response_is_malformed() {
    let http = Arc::new(MockClient::new().with_html(SOUP_URL, &fixture("tomato_soup.html")));
    let ai = Arc::new(FakeAiClient::new().with_default_response("Sorry, I can't find a recipe."));

    let err = importer(&http, &ai).import(SOUP_URL).await.unwrap_err();
    assert!(matches!(err, ImportError::MalformedResponse(_)));
    assert_eq!(err.to_payload().error, "Failed to parse recipe data");
}

#[tokio::test]
async fn empty_article_with_reject_policy_skips_model() {
    let url = "https://spa.example.com/recipe/1";
    let http = Arc::new(MockClient::new().with_html(
        url,
        "<html><body><div id=\"root\"></div><script>boot()</script></body></html>",
    ));
    let ai = Arc::new(FakeAiClient::new().with_default_response("{}"));

    let err = importer(&http, &ai)
        .with_empty_content_policy(EmptyContentPolicy::Reject)
        .import(url)
        .await
        .unwrap_err();

    assert!(matches!(err, ImportError::ExtractionEmpty));
    assert_eq!(http.fetch_count(), 1);
    assert_eq!(ai.call_count(), 0);
}

#[tokio::test]
async fn empty_article_with_permissive_policy_still_prompts() {
    let url = "https://spa.example.com/recipe/1";
    let http = Arc::new(MockClient::new().with_html(url, "<html><body></body></html>"));
    let ai = Arc::new(FakeAiClient::new().with_default_response(&fixture("tomato_soup_response.txt")));

    let draft = importer(&http, &ai).import(url).await.unwrap();

    assert_eq!(ai.call_count(), 1);
    assert_eq!(draft.source_url.as_deref(), Some(url));
    let prompt = &ai.last_request().unwrap().messages[0].content;
    assert!(prompt.contains("Content to parse:\n\n"));
}

#[tokio::test]
async fn fetch_failures_are_generic() {
    let http = Arc::new(
        MockClient::new()
            .with_status("https://example.com/forbidden", 403)
            .with_error("https://example.com/down", "connection refused"),
    );
    let ai = Arc::new(FakeAiClient::new().with_default_response("{}"));

    for url in ["https://example.com/forbidden", "https://example.com/down"] {
        let err = importer(&http, &ai).import(url).await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to extract recipe content");
        assert!(matches!(err, ImportError::FetchFailed(_)));
    }

    let err = importer(&http, &ai)
        .import("https://example.com/forbidden")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ImportError::FetchFailed(FetchError::BadStatus { status: 403, .. })
    ));
    assert_eq!(ai.call_count(), 0);
}

#[tokio::test]
async fn model_failure_is_not_retried() {
    let http = Arc::new(MockClient::new().with_html(SOUP_URL, &fixture("tomato_soup.html")));
    let ai = Arc::new(FakeAiClient::new().failing("overloaded"));

    let err = importer(&http, &ai).import(SOUP_URL).await.unwrap_err();

    assert!(matches!(err, ImportError::ModelCallFailed(AiError::Api(_))));
    assert_eq!(err.to_payload().details.as_deref(), Some("API error: overloaded"));
    assert_eq!(ai.call_count(), 1);
}

#[tokio::test]
async fn completion_params_are_forwarded() {
    let http = Arc::new(MockClient::new().with_html(SOUP_URL, &fixture("tomato_soup.html")));
    let ai = Arc::new(FakeAiClient::new().with_default_response(&fixture("tomato_soup_response.txt")));

    importer(&http, &ai)
        .with_completion_params(CompletionParams {
            max_tokens: 1024,
            temperature: 0.0,
        })
        .import(SOUP_URL)
        .await
        .unwrap();

    let request = ai.last_request().unwrap();
    assert_eq!(request.max_tokens, Some(1024));
    assert_eq!(request.temperature, Some(0.0));
}
