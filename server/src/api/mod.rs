pub mod recipes;
pub mod testing;

use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

/// Shared error response used by all endpoints
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    /// Diagnostic detail (underlying cause or schema violations)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl From<potluck_core::ErrorPayload> for ErrorResponse {
    fn from(payload: potluck_core::ErrorPayload) -> Self {
        Self {
            error: payload.error,
            details: payload.details,
        }
    }
}

/// Generate the complete OpenAPI spec by merging all module specs
pub fn openapi() -> utoipa::openapi::OpenApi {
    #[derive(OpenApi)]
    #[openapi(
        info(title = "potluck", description = "Recipe import from a URL"),
        components(schemas(ErrorResponse))
    )]
    struct BaseApi;

    let mut spec = BaseApi::openapi();

    let modules: Vec<utoipa::openapi::OpenApi> =
        vec![testing::ApiDoc::openapi(), recipes::ApiDoc::openapi()];

    for module_spec in modules {
        // Merge paths
        spec.paths.paths.extend(module_spec.paths.paths);

        // Merge components (schemas)
        if let Some(module_components) = module_spec.components {
            if let Some(spec_components) = spec.components.as_mut() {
                spec_components.schemas.extend(module_components.schemas);
            }
        }
    }

    spec
}
