pub mod import;

use crate::AppState;
use axum::routing::post;
use axum::Router;
use utoipa::OpenApi;

/// Returns the router for /api/recipes endpoints (mounted at /api/recipes)
pub fn router() -> Router<AppState> {
    Router::new().route("/import", post(import::import_recipe))
}

#[derive(OpenApi)]
#[openapi(
    paths(import::import_recipe),
    components(schemas(
        import::ImportRecipeRequest,
        import::ImportedRecipe,
        import::ImportedIngredient,
        import::ImportedInstruction,
        import::ImportedNotes,
    ))
)]
pub struct ApiDoc;
