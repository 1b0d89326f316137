use crate::api::ErrorResponse;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use potluck_core::{DraftIngredient, DraftInstruction, ImportError, RecipeDraft, RecipeNotes};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request body for importing a recipe
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ImportRecipeRequest {
    /// Absolute http(s) URL of the recipe page
    pub url: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ImportedIngredient {
    pub amount: Option<f64>,
    pub unit: Option<String>,
    pub name: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ImportedInstruction {
    /// Not guaranteed to be contiguous
    pub step_number: u32,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ImportedNotes {
    pub tips: Vec<String>,
    pub substitutions: Vec<String>,
    pub storage: Vec<String>,
    pub technique: Vec<String>,
}

/// Structured recipe draft (mirrors potluck_core::RecipeDraft)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ImportedRecipe {
    pub title: String,
    pub description: Option<String>,
    /// Minutes
    pub prep_time: Option<f64>,
    /// Minutes
    pub cook_time: Option<f64>,
    pub servings: Option<u32>,
    pub ingredients: Vec<ImportedIngredient>,
    pub instructions: Vec<ImportedInstruction>,
    /// Advisory free-text tag suggestions
    pub suggested_tags: Vec<String>,
    pub notes: ImportedNotes,
    pub source_url: Option<String>,
    /// Always "import"
    pub source_type: Option<String>,
}

impl From<DraftIngredient> for ImportedIngredient {
    fn from(i: DraftIngredient) -> Self {
        Self {
            amount: i.amount,
            unit: i.unit,
            name: i.name,
            notes: i.notes,
        }
    }
}

impl From<DraftInstruction> for ImportedInstruction {
    fn from(i: DraftInstruction) -> Self {
        Self {
            step_number: i.step_number,
            description: i.description,
        }
    }
}

impl From<RecipeNotes> for ImportedNotes {
    fn from(n: RecipeNotes) -> Self {
        Self {
            tips: n.tips,
            substitutions: n.substitutions,
            storage: n.storage,
            technique: n.technique,
        }
    }
}

impl From<RecipeDraft> for ImportedRecipe {
    fn from(draft: RecipeDraft) -> Self {
        Self {
            title: draft.title,
            description: draft.description,
            prep_time: draft.prep_time,
            cook_time: draft.cook_time,
            servings: draft.servings,
            ingredients: draft.ingredients.into_iter().map(Into::into).collect(),
            instructions: draft.instructions.into_iter().map(Into::into).collect(),
            suggested_tags: draft.suggested_tags,
            notes: draft.notes.into(),
            source_url: draft.source_url,
            source_type: draft.source_type.map(|_| "import".to_string()),
        }
    }
}

/// HTTP status for each terminal import failure.
pub fn status_for(error: &ImportError) -> StatusCode {
    match error {
        ImportError::InvalidUrl(_) => StatusCode::BAD_REQUEST,
        ImportError::ExtractionEmpty => StatusCode::UNPROCESSABLE_ENTITY,
        ImportError::FetchFailed(_)
        | ImportError::ModelCallFailed(_)
        | ImportError::MalformedResponse(_)
        | ImportError::SchemaViolation(_) => StatusCode::BAD_GATEWAY,
    }
}

#[utoipa::path(
    post,
    path = "/api/recipes/import",
    tag = "recipes",
    request_body = ImportRecipeRequest,
    responses(
        (status = 200, description = "Recipe draft extracted from the page", body = ImportedRecipe),
        (status = 400, description = "Invalid request or URL", body = ErrorResponse),
        (status = 422, description = "Page has no readable article content", body = ErrorResponse),
        (status = 502, description = "Fetch, model call or response validation failed", body = ErrorResponse)
    )
)]
pub async fn import_recipe(
    State(importer): State<AppState>,
    request: Result<Json<ImportRecipeRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match request {
        Ok(r) => r,
        Err(rejection) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "Invalid request body".to_string(),
                    details: Some(rejection.body_text()),
                }),
            )
                .into_response();
        }
    };

    match importer.import(&request.url).await {
        Ok(draft) => (StatusCode::OK, Json(ImportedRecipe::from(draft))).into_response(),
        Err(e) => {
            let status = status_for(&e);
            if status.is_server_error() {
                tracing::error!(url = %request.url, stage = %e.stage(), "Failed to import recipe: {}", e);
            }
            (status, Json(ErrorResponse::from(e.to_payload()))).into_response()
        }
    }
}
