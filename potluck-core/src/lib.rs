//! Recipe import from a URL: fetch the page, reduce it to its article body,
//! ask a language model for structured recipe JSON, and validate the result
//! into a [`RecipeDraft`].

pub mod ai;
pub mod error;
pub mod extract;
pub mod http;
pub mod pipeline;
pub mod sanitize;
pub mod schema;
pub mod types;

pub use error::{FetchError, ImportError};
pub use extract::extract_article;
pub use http::{BrowserClient, BrowserClientBuilder, HttpClient, MockClient, MockResponse};
pub use pipeline::{EmptyContentPolicy, ImportStage, RecipeImporter};
pub use sanitize::sanitize_model_response;
pub use schema::{parse_recipe_response, validate_recipe, FieldViolation, ViolationKind};
pub use types::{
    ContentType, DraftIngredient, DraftInstruction, ErrorPayload, ExtractedContent, RecipeDraft,
    RecipeNotes, SourceType,
};
