use std::path::Path;
use std::sync::Arc;

use crate::error::ModelError;
use crate::manifest::FeatureManifest;
use crate::normalize::{AlignPolicy, Normalizer};
use crate::scorer::{RiskModel, RiskScorer};
use crate::xgboost::XgbModel;

/// Trained model plus its feature manifest, loaded once at startup and
/// shared read-only by every assessment.
#[derive(Debug, Clone)]
pub struct ModelArtifacts {
    manifest: Arc<FeatureManifest>,
    model: Arc<dyn RiskModel>,
}

impl ModelArtifacts {
    pub fn load(model_path: &Path, manifest_path: &Path) -> Result<Self, ModelError> {
        let manifest = FeatureManifest::load(manifest_path)?;
        let model = XgbModel::load(model_path)?;
        Ok(Self::new(Arc::new(model), manifest))
    }

    pub fn new(model: Arc<dyn RiskModel>, manifest: FeatureManifest) -> Self {
        Self {
            manifest: Arc::new(manifest),
            model,
        }
    }

    pub fn manifest(&self) -> &Arc<FeatureManifest> {
        &self.manifest
    }

    /// Verifies the model and manifest agree before handing out a scorer.
    pub fn scorer(&self) -> Result<RiskScorer, ModelError> {
        RiskScorer::new(Arc::clone(&self.model), Arc::clone(&self.manifest))
    }

    pub fn normalizer(&self, policy: AlignPolicy, default_year: i64) -> Normalizer {
        Normalizer::new(Arc::clone(&self.manifest), policy, default_year)
    }
}
