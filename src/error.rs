//! Error types for Scholar Triage

use thiserror::Error;

/// Errors that can occur during an assessment.
///
/// Each variant identifies the pipeline stage that failed so callers can
/// distinguish schema, feature, and classification failures.
#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("Unknown feature name: {0}")]
    UnknownFeature(String),

    #[error("Duplicate feature name in schema: {0}")]
    DuplicateFeature(String),

    #[error("Feature schema is empty")]
    EmptySchema,

    #[error("Schema requires feature '{0}' but the record does not supply it")]
    MissingFeature(String),

    #[error("Invalid risk bands: {0}")]
    InvalidBands(String),

    #[error("Text classifier failed: {0}")]
    TextModel(String),

    #[error("Tabular classifier failed: {0}")]
    TabularModel(String),

    #[error("Classifier returned probability outside [0,1]: {0}")]
    InvalidProbability(f64),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),
}
