use serde::{Deserialize, Serialize};

/// Label describing what kind of content was handed to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Article,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Article => "article",
        }
    }
}

/// Readable content reduced from a fetched page. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedContent {
    /// Simplified article HTML, or empty if no article body was found
    pub content: String,
    pub content_type: ContentType,
    /// Page `<title>`, kept for logging
    pub page_title: Option<String>,
}

impl ExtractedContent {
    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }
}

/// Provenance of a draft. Always set by the pipeline, never by the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    Import,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftIngredient {
    pub amount: Option<f64>,
    pub unit: Option<String>,
    pub name: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftInstruction {
    /// Not guaranteed contiguous; see `RecipeDraft::resequence_instructions`
    pub step_number: u32,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeNotes {
    pub tips: Vec<String>,
    pub substitutions: Vec<String>,
    pub storage: Vec<String>,
    pub technique: Vec<String>,
}

/// A schema-validated recipe, ready to hand to persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeDraft {
    pub title: String,
    pub description: Option<String>,
    /// Minutes
    pub prep_time: Option<f64>,
    /// Minutes
    pub cook_time: Option<f64>,
    pub servings: Option<u32>,
    pub ingredients: Vec<DraftIngredient>,
    pub instructions: Vec<DraftInstruction>,
    /// Free-text suggestions; may not match any existing tag
    #[serde(default)]
    pub suggested_tags: Vec<String>,
    pub notes: RecipeNotes,
    pub source_url: Option<String>,
    pub source_type: Option<SourceType>,
}

impl RecipeDraft {
    /// Stamp provenance onto the draft, replacing whatever was there.
    pub fn attach_source(&mut self, url: &str) {
        self.source_url = Some(url.to_string());
        self.source_type = Some(SourceType::Import);
    }

    /// Renumber instructions 1..=n, keeping their order.
    pub fn resequence_instructions(&mut self) {
        for (i, instruction) in self.instructions.iter_mut().enumerate() {
            instruction.step_number = i as u32 + 1;
        }
    }
}

/// The single error shape returned to callers of the import operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft_with_steps(steps: &[u32]) -> RecipeDraft {
        RecipeDraft {
            title: "Soup".to_string(),
            description: None,
            prep_time: None,
            cook_time: None,
            servings: None,
            ingredients: vec![],
            instructions: steps
                .iter()
                .map(|n| DraftInstruction {
                    step_number: *n,
                    description: format!("step {}", n),
                })
                .collect(),
            suggested_tags: vec![],
            notes: RecipeNotes::default(),
            source_url: None,
            source_type: None,
        }
    }

    #[test]
    fn resequence_fills_gaps_in_order() {
        let mut draft = draft_with_steps(&[1, 3, 7]);
        draft.resequence_instructions();

        let numbers: Vec<u32> = draft.instructions.iter().map(|i| i.step_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(draft.instructions[2].description, "step 7");
    }

    #[test]
    fn attach_source_overwrites_previous_values() {
        let mut draft = draft_with_steps(&[1]);
        draft.source_url = Some("https://elsewhere.example".to_string());
        draft.attach_source("https://example.com/soup");

        assert_eq!(draft.source_url.as_deref(), Some("https://example.com/soup"));
        assert_eq!(draft.source_type, Some(SourceType::Import));
    }

    #[test]
    fn source_type_serializes_as_import() {
        let json = serde_json::to_value(SourceType::Import).unwrap();
        assert_eq!(json, serde_json::json!("import"));
    }

    #[test]
    fn error_payload_omits_missing_details() {
        let payload = ErrorPayload {
            error: "Invalid URL: nope".to_string(),
            details: None,
        };
        let json = serde_json::to_string(&payload).unwrap();
        assert_eq!(json, r#"{"error":"Invalid URL: nope"}"#);
    }
}
