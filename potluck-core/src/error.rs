use thiserror::Error;

use crate::ai::AiError;
use crate::pipeline::ImportStage;
use crate::schema::FieldViolation;
use crate::types::ErrorPayload;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    BadStatus { status: u16, url: String },

    #[error("Non-text response ({0})")]
    NonTextResponse(String),

    #[error("Transport error: {0}")]
    Transport(String),
}

/// Terminal failure of a recipe import. None of these are retried.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Transport-level details stay in the source; the message is deliberately generic.
    #[error("Failed to extract recipe content")]
    FetchFailed(#[source] FetchError),

    #[error("No article content found on the page")]
    ExtractionEmpty,

    #[error("Language model request failed")]
    ModelCallFailed(#[source] AiError),

    #[error("Failed to parse recipe data")]
    MalformedResponse(#[source] serde_json::Error),

    #[error("Recipe data does not match the expected schema")]
    SchemaViolation(Vec<FieldViolation>),
}

impl ImportError {
    /// The pipeline stage that was running when this error was raised.
    pub fn stage(&self) -> ImportStage {
        match self {
            ImportError::InvalidUrl(_) => ImportStage::Received,
            ImportError::FetchFailed(_) => ImportStage::Fetching,
            ImportError::ExtractionEmpty => ImportStage::Extracting,
            ImportError::ModelCallFailed(_) => ImportStage::Prompting,
            ImportError::MalformedResponse(_) | ImportError::SchemaViolation(_) => {
                ImportStage::Validating
            }
        }
    }

    /// Diagnostic detail for debugging, if any.
    pub fn details(&self) -> Option<String> {
        match self {
            ImportError::InvalidUrl(_) | ImportError::ExtractionEmpty => None,
            ImportError::FetchFailed(e) => Some(e.to_string()),
            ImportError::ModelCallFailed(e) => Some(e.to_string()),
            ImportError::MalformedResponse(e) => Some(e.to_string()),
            ImportError::SchemaViolation(violations) => Some(
                violations
                    .iter()
                    .map(|v| v.to_string())
                    .collect::<Vec<_>>()
                    .join("; "),
            ),
        }
    }

    /// Collapse into the single user-facing error shape.
    pub fn to_payload(&self) -> ErrorPayload {
        ErrorPayload {
            error: self.to_string(),
            details: self.details(),
        }
    }
}
