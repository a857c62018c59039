//! Error types for the Big Five survey engine

use thiserror::Error;
use uuid::Uuid;

/// Validation failures raised while scoring a set of responses.
///
/// Every variant is scoped to a single submission; nothing is persisted
/// before scoring succeeds.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoringError {
    #[error("No personality items are registered.")]
    EmptyCatalog,

    #[error("Missing response for item {code}.")]
    MissingResponse { code: String },

    #[error("Invalid response for item {code}.")]
    InvalidResponse { code: String },

    #[error("Response for item {code} must be between 1 and 5 (got {value}).")]
    OutOfRange { code: String, value: i64 },

    #[error("Missing responses: {}", codes.join(", "))]
    MissingResponses { codes: Vec<String> },

    #[error("Unknown item codes in responses: {}", codes.join(", "))]
    UnknownCodes { codes: Vec<String> },
}

/// Errors surfaced by the catalog, store, configuration and CLI layers
#[derive(Debug, Error)]
pub enum SurveyError {
    #[error(transparent)]
    Scoring(#[from] ScoringError),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid TOML: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid item catalog: {0}")]
    InvalidCatalog(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Memo must be at most {max} characters (got {length})")]
    MemoTooLong { length: usize, max: usize },

    #[error("Survey result not found: {0}")]
    NotFound(Uuid),

    #[error("Survey result already exists: {0}")]
    DuplicateResult(Uuid),
}
