//! Schema validation for model-produced recipe JSON.
//!
//! Validation runs in two passes. A structural walk over the parsed
//! `serde_json::Value` records every missing or mistyped field so the caller
//! gets the full list rather than the first failure. Only when the walk is
//! clean is the value deserialized into typed structs.

use std::fmt;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::ImportError;
use crate::sanitize::sanitize_model_response;
use crate::types::{DraftIngredient, DraftInstruction, RecipeDraft, RecipeNotes};

/// What was wrong with a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationKind {
    /// Key absent. Nullable fields must still be present with `null`.
    Missing,
    WrongType {
        expected: &'static str,
        found: &'static str,
    },
    Empty,
    Invalid { reason: String },
}

/// A single schema violation, addressed by a JSON path like `ingredients[2].name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub path: String,
    pub kind: ViolationKind,
}

impl FieldViolation {
    pub fn new(path: impl Into<String>, kind: ViolationKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ViolationKind::Missing => write!(f, "{}: missing", self.path),
            ViolationKind::WrongType { expected, found } => {
                write!(f, "{}: expected {}, found {}", self.path, expected, found)
            }
            ViolationKind::Empty => write!(f, "{}: must not be empty", self.path),
            ViolationKind::Invalid { reason } => write!(f, "{}: {}", self.path, reason),
        }
    }
}

/// The recipe exactly as the model is asked to produce it. Provenance fields
/// are intentionally absent: whatever the model sends for them is dropped.
#[derive(Debug, Deserialize)]
struct ModelRecipe {
    title: String,
    description: Option<String>,
    prep_time: Option<f64>,
    cook_time: Option<f64>,
    servings: Option<u32>,
    ingredients: Vec<DraftIngredient>,
    instructions: Vec<DraftInstruction>,
    #[serde(default)]
    suggested_tags: Vec<String>,
    notes: RecipeNotes,
}

impl From<ModelRecipe> for RecipeDraft {
    fn from(recipe: ModelRecipe) -> Self {
        RecipeDraft {
            title: recipe.title,
            description: recipe.description,
            prep_time: recipe.prep_time,
            cook_time: recipe.cook_time,
            servings: recipe.servings,
            ingredients: recipe.ingredients,
            instructions: recipe.instructions,
            suggested_tags: recipe.suggested_tags,
            notes: recipe.notes,
            source_url: None,
            source_type: None,
        }
    }
}

const NOTE_BUCKETS: [&str; 4] = ["tips", "substitutions", "storage", "technique"];

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn join_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", parent, key)
    }
}

/// Collects violations while walking the document.
#[derive(Default)]
struct Walker {
    violations: Vec<FieldViolation>,
}

impl Walker {
    fn push(&mut self, path: String, kind: ViolationKind) {
        self.violations.push(FieldViolation::new(path, kind));
    }

    fn wrong_type(&mut self, path: String, expected: &'static str, value: &Value) {
        self.push(
            path,
            ViolationKind::WrongType {
                expected,
                found: json_type(value),
            },
        );
    }

    /// Look up a key that must be present (possibly as `null`).
    fn present<'v>(
        &mut self,
        obj: &'v Map<String, Value>,
        parent: &str,
        key: &str,
    ) -> Option<&'v Value> {
        let value = obj.get(key);
        if value.is_none() {
            self.push(join_path(parent, key), ViolationKind::Missing);
        }
        value
    }

    fn string(&mut self, obj: &Map<String, Value>, parent: &str, key: &str, non_empty: bool) {
        let Some(value) = self.present(obj, parent, key) else {
            return;
        };
        match value.as_str() {
            Some(s) if non_empty && s.trim().is_empty() => {
                self.push(join_path(parent, key), ViolationKind::Empty)
            }
            Some(_) => {}
            None => self.wrong_type(join_path(parent, key), "string", value),
        }
    }

    fn nullable_string(&mut self, obj: &Map<String, Value>, parent: &str, key: &str) {
        if let Some(value) = self.present(obj, parent, key) {
            if !(value.is_null() || value.is_string()) {
                self.wrong_type(join_path(parent, key), "string or null", value);
            }
        }
    }

    fn nullable_number(&mut self, obj: &Map<String, Value>, parent: &str, key: &str) {
        if let Some(value) = self.present(obj, parent, key) {
            if !(value.is_null() || value.is_number()) {
                self.wrong_type(join_path(parent, key), "number or null", value);
            }
        }
    }

    fn check_count(&mut self, path: String, value: &Value, nullable: bool) {
        if nullable && value.is_null() {
            return;
        }
        match value.as_u64() {
            Some(n) if n <= u64::from(u32::MAX) => {}
            Some(_) => self.push(
                path,
                ViolationKind::Invalid {
                    reason: "integer out of range".to_string(),
                },
            ),
            None => {
                let expected = if nullable {
                    "non-negative integer or null"
                } else {
                    "non-negative integer"
                };
                self.wrong_type(path, expected, value)
            }
        }
    }

    fn string_array(&mut self, path: String, value: &Value) {
        let Some(items) = value.as_array() else {
            self.wrong_type(path, "array", value);
            return;
        };
        for (i, item) in items.iter().enumerate() {
            if !item.is_string() {
                self.wrong_type(format!("{}[{}]", path, i), "string", item);
            }
        }
    }

    fn object_array<'v>(
        &mut self,
        obj: &'v Map<String, Value>,
        key: &str,
    ) -> Vec<(String, &'v Map<String, Value>)> {
        let Some(value) = self.present(obj, "", key) else {
            return vec![];
        };
        let Some(items) = value.as_array() else {
            self.wrong_type(key.to_string(), "array", value);
            return vec![];
        };
        let mut objects = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            let path = format!("{}[{}]", key, i);
            match item.as_object() {
                Some(o) => objects.push((path, o)),
                None => self.wrong_type(path, "object", item),
            }
        }
        objects
    }

    fn recipe(&mut self, root: &Value) {
        let Some(obj) = root.as_object() else {
            self.wrong_type("$".to_string(), "object", root);
            return;
        };

        self.string(obj, "", "title", true);
        self.nullable_string(obj, "", "description");
        self.nullable_number(obj, "", "prep_time");
        self.nullable_number(obj, "", "cook_time");
        if let Some(servings) = self.present(obj, "", "servings") {
            self.check_count("servings".to_string(), servings, true);
        }

        for (path, ingredient) in self.object_array(obj, "ingredients") {
            self.nullable_number(ingredient, &path, "amount");
            self.nullable_string(ingredient, &path, "unit");
            self.string(ingredient, &path, "name", false);
            self.nullable_string(ingredient, &path, "notes");
        }

        for (path, instruction) in self.object_array(obj, "instructions") {
            if let Some(step) = self.present(instruction, &path, "step_number") {
                self.check_count(join_path(&path, "step_number"), step, false);
            }
            self.string(instruction, &path, "description", false);
        }

        // Optional: absent means no suggestions, but null is not accepted.
        if let Some(tags) = obj.get("suggested_tags") {
            self.string_array("suggested_tags".to_string(), tags);
        }

        if let Some(notes) = self.present(obj, "", "notes") {
            match notes.as_object() {
                Some(buckets) => {
                    for bucket in NOTE_BUCKETS {
                        if let Some(value) = self.present(buckets, "notes", bucket) {
                            self.string_array(join_path("notes", bucket), value);
                        }
                    }
                }
                None => self.wrong_type("notes".to_string(), "object", notes),
            }
        }
    }
}

/// Validate a parsed model response against the recipe schema.
///
/// Returns every violation found; no partial draft is ever produced. The
/// returned draft has no provenance attached.
pub fn validate_recipe(value: &Value) -> Result<RecipeDraft, Vec<FieldViolation>> {
    let mut walker = Walker::default();
    walker.recipe(value);
    if !walker.violations.is_empty() {
        return Err(walker.violations);
    }

    serde_json::from_value::<ModelRecipe>(value.clone())
        .map(RecipeDraft::from)
        .map_err(|e| {
            vec![FieldViolation::new(
                "$",
                ViolationKind::Invalid {
                    reason: e.to_string(),
                },
            )]
        })
}

/// Sanitize, parse and validate a raw completion into a draft.
pub fn parse_recipe_response(raw: &str) -> Result<RecipeDraft, ImportError> {
    let sanitized = sanitize_model_response(raw);
    let value: Value = serde_json::from_str(&sanitized).map_err(ImportError::MalformedResponse)?;
    validate_recipe(&value).map_err(ImportError::SchemaViolation)
}
