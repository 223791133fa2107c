use thiserror::Error;

use stillrisk_core::error::CoreError;
use stillrisk_model::error::ModelError;

/// Why a single assessment did not produce a result.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The input record was rejected before scoring.
    #[error("invalid input: {0}")]
    Validation(String),

    /// The trained model or its manifest could not be used.
    #[error("model unavailable: {0}")]
    ModelUnavailable(String),

    /// The manifest and the trained model disagree. A deployment defect.
    #[error("feature mismatch: {0}")]
    FeatureMismatch(String),
}

impl PipelineError {
    pub fn is_deployment_defect(&self) -> bool {
        matches!(self, PipelineError::FeatureMismatch(_))
    }
}

impl From<CoreError> for PipelineError {
    fn from(e: CoreError) -> Self {
        PipelineError::Validation(e.to_string())
    }
}

impl From<ModelError> for PipelineError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::Unavailable { .. }
            | ModelError::Unsupported(_)
            | ModelError::InvalidManifest(_) => PipelineError::ModelUnavailable(e.to_string()),
            ModelError::FeatureMismatch(_) | ModelError::UnresolvedFeature(_) => {
                PipelineError::FeatureMismatch(e.to_string())
            }
            ModelError::UnrecognizedFlag { .. } => PipelineError::Validation(e.to_string()),
        }
    }
}
