//! Import lifecycle stages and the empty-content decision.

use std::fmt;

/// Where an import request is in its lifecycle.
///
/// Received → Fetching → Extracting → Prompting → Validating → Succeeded,
/// or Failed from any stage. Nothing moves backwards and nothing is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImportStage {
    Received,
    Fetching,
    Extracting,
    Prompting,
    Validating,
    Succeeded,
    Failed,
}

impl ImportStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportStage::Received => "received",
            ImportStage::Fetching => "fetching",
            ImportStage::Extracting => "extracting",
            ImportStage::Prompting => "prompting",
            ImportStage::Validating => "validating",
            ImportStage::Succeeded => "succeeded",
            ImportStage::Failed => "failed",
        }
    }
}

impl fmt::Display for ImportStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What to do when the page has no readable article body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyContentPolicy {
    /// Log a warning and prompt the model with empty content anyway.
    #[default]
    Permissive,
    /// Stop with `ImportError::ExtractionEmpty` before calling the model.
    Reject,
}

impl EmptyContentPolicy {
    /// `POTLUCK_REJECT_EMPTY_CONTENT=true|1` selects `Reject`.
    pub fn from_env() -> Self {
        Self::from_flag(std::env::var("POTLUCK_REJECT_EMPTY_CONTENT").ok().as_deref())
    }

    fn from_flag(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()) {
            Some(v) if v == "true" || v == "1" => EmptyContentPolicy::Reject,
            _ => EmptyContentPolicy::Permissive,
        }
    }
}
