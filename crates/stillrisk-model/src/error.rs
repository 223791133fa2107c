use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model artifact unavailable ({path}): {reason}")]
    Unavailable { path: String, reason: String },

    #[error("unsupported model: {0}")]
    Unsupported(String),

    #[error("invalid feature manifest: {0}")]
    InvalidManifest(String),

    #[error("feature mismatch: {0}")]
    FeatureMismatch(String),

    #[error("manifest feature '{0}' cannot be produced from the input record")]
    UnresolvedFeature(String),

    #[error("unrecognized value '{value}' for flag '{field}'")]
    UnrecognizedFlag { field: String, value: String },
}

impl ModelError {
    pub(crate) fn unavailable(path: impl Into<String>, reason: impl ToString) -> Self {
        ModelError::Unavailable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
