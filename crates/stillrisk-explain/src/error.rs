use thiserror::Error;

/// Failures of a remote explanation service. These never leave the
/// composer; the deterministic strategy takes over instead.
#[derive(Debug, Error)]
pub enum ExplainError {
    #[error("API key not set (expected in ${0})")]
    MissingApiKey(String),

    #[error("explanation request failed: {0}")]
    Request(String),

    #[error("explanation response parsing failed: {0}")]
    ResponseParse(String),

    #[error("explanation response was empty")]
    EmptyResponse,

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<ureq::Error> for ExplainError {
    fn from(e: ureq::Error) -> Self {
        ExplainError::Request(e.to_string())
    }
}
