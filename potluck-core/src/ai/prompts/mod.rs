//! Prompt templates.

pub mod recipe_import;

pub use recipe_import::{render_recipe_import_prompt, RECIPE_IMPORT_PROMPT_NAME};
