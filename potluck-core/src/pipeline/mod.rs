//! Recipe import pipeline.
//!
//! Strictly sequential per request: Fetch → Extract → Prompt → Validate.
//! Each stage runs inside an `import_stage` tracing span.

mod importer;
mod stage;

pub use importer::RecipeImporter;
pub use stage::{EmptyContentPolicy, ImportStage};
