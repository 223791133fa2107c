use std::sync::Arc;

use tracing::debug;

use crate::error::ModelError;
use crate::manifest::FeatureManifest;
use crate::normalize::FeatureVector;

/// A trained binary classifier over a fixed feature layout.
///
/// Class 1 is the live-birth outcome. Implementations must be safe to share
/// between concurrent assessments.
pub trait RiskModel: Send + Sync + std::fmt::Debug {
    /// Number of input columns the model was trained on.
    fn feature_count(&self) -> usize;

    /// Column names recorded with the model, if it carries any.
    fn feature_names(&self) -> Option<&[String]>;

    /// Class probabilities `[P(class 0), P(class 1)]`.
    fn predict_proba(&self, features: &[f64]) -> Result<[f64; 2], ModelError>;
}

/// Binds a model to the manifest it must be fed with.
#[derive(Debug, Clone)]
pub struct RiskScorer {
    model: Arc<dyn RiskModel>,
    manifest: Arc<FeatureManifest>,
}

impl RiskScorer {
    /// Fails with [`ModelError::FeatureMismatch`] when the manifest length or
    /// (where the model records them) its names disagree with the model.
    pub fn new(
        model: Arc<dyn RiskModel>,
        manifest: Arc<FeatureManifest>,
    ) -> Result<Self, ModelError> {
        if model.feature_count() != manifest.len() {
            return Err(ModelError::FeatureMismatch(format!(
                "model has {} features, manifest lists {}",
                model.feature_count(),
                manifest.len()
            )));
        }
        if let Some(names) = model.feature_names() {
            if let Some((i, (expected, listed))) = names
                .iter()
                .zip(manifest.names())
                .enumerate()
                .find(|(_, (a, b))| a != b)
            {
                return Err(ModelError::FeatureMismatch(format!(
                    "column {i}: model expects '{expected}', manifest lists '{listed}'"
                )));
            }
        }
        Ok(Self { model, manifest })
    }

    pub fn manifest(&self) -> &FeatureManifest {
        &self.manifest
    }

    /// Probability of the adverse outcome, `1 − P(class 1)`, in `[0, 1]`.
    pub fn score(&self, features: &FeatureVector) -> Result<f64, ModelError> {
        if features.len() != self.manifest.len() || features.names() != self.manifest.names() {
            return Err(ModelError::FeatureMismatch(format!(
                "feature vector of length {} does not follow the manifest order",
                features.len()
            )));
        }

        let [_, alive] = self.model.predict_proba(features.values())?;
        let adverse = (1.0 - alive).clamp(0.0, 1.0);
        debug!(adverse, "scored feature vector");
        Ok(adverse)
    }
}
