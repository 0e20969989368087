//! Error types for the AQI prediction crate

use thiserror::Error;

use crate::prediction::ModelId;

/// Per-request failures. Each one is rendered to the caller as a message.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AqiError {
    /// A required Part A feature was not supplied
    #[error("Missing value for '{field}'")]
    MissingField { field: String },

    /// A Part A feature could not be read as a number
    #[error("Invalid numeric value for '{field}': '{value}'")]
    Parse { field: String, value: String },

    /// Request parameters that cannot name a valid station hour
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No data for selected station & time.")]
    NoBaseData,

    /// `hours` is how far back the missing lag row lies
    #[error("Lag data unavailable for this time.")]
    NoLagData { hours: i64 },

    #[error("The {model} model expects {expected} features but received {actual}")]
    SchemaMismatch {
        model: ModelId,
        expected: usize,
        actual: usize,
    },
}

/// Failures while loading the historical table
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing column: {0}")]
    MissingColumn(String),
}

/// Failures while loading or validating a model artifact
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid model artifact: {0}")]
    Invalid(String),

    #[error("Feature names do not match: expected {expected:?}, found {found:?}")]
    FeatureMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },
}
