//! Error types for the driftwatch crate

use thiserror::Error;

/// Result type alias for drift operations
pub type Result<T> = std::result::Result<T, DriftError>;

/// Main error type for drift detection and scoring
#[derive(Error, Debug)]
pub enum DriftError {
    #[error("Invalid weights: {0}")]
    InvalidWeights(String),

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Unsupported metric outcome: {0}")]
    UnsupportedOutcome(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
