//! Error types for trigger relabeling

use thiserror::Error;

/// Errors that abort a relabeling pass or its surrounding I/O
#[derive(Debug, Error)]
pub enum RelabelError {
    #[error("Trigger/trial alignment error: {0}")]
    Alignment(String),

    #[error("Trial count mismatch: {primes} prime triggers but {rows} trial log rows")]
    TrialCountMismatch { primes: usize, rows: usize },

    #[error("Label not found in taxonomy: {0}")]
    UnknownLabel(String),

    #[error("Invalid value {value:?} for field '{field}' in trial row {row}")]
    InvalidTrialField {
        row: usize,
        field: &'static str,
        value: String,
    },

    #[error("Duplicate label in taxonomy: {0}")]
    DuplicateLabel(String),

    #[error("Duplicate code {code} in taxonomy (label {label})")]
    DuplicateCode { code: u32, label: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to parse input: {0}")]
    ParseError(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),
}
