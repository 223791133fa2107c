use thiserror::Error;

use crate::models::input::RangeViolation;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("missing required field: {0}")]
    MissingField(String),

    #[error("value out of range: {0}")]
    OutOfRange(#[from] RangeViolation),

    #[error("invalid timestamp '{value}': {reason}")]
    InvalidTimestamp { value: String, reason: String },

    #[error("unknown risk level: {0}")]
    UnknownRiskLevel(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
