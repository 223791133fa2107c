//! One assessment, end to end: validate, normalize, score, classify,
//! explain.

use std::path::Path;

use tracing::{error, info, warn};
use uuid::Uuid;

use stillrisk_core::error::CoreError;
use stillrisk_core::i18n::Language;
use stillrisk_core::models::assessment::AssessmentRecord;
use stillrisk_core::models::history::{HistoryEntry, Session};
use stillrisk_core::models::input::ClinicalInput;
use stillrisk_explain::{compose, Explainer, ExplanationRequest};
use stillrisk_model::artifacts::ModelArtifacts;
use stillrisk_model::classify::classify;
use stillrisk_model::normalize::{AlignPolicy, Normalizer};
use stillrisk_model::scorer::RiskScorer;

use crate::error::PipelineError;

/// Load the model and manifest, logging failures the same way scoring does.
pub fn load_artifacts(
    model_path: &Path,
    manifest_path: &Path,
) -> Result<ModelArtifacts, PipelineError> {
    ModelArtifacts::load(model_path, manifest_path).map_err(|e| log_failure(e.into()))
}

/// Scores input records against loaded artifacts. Holds no per-assessment
/// state and can be reused for any number of records.
pub struct Assessor {
    normalizer: Normalizer,
    scorer: RiskScorer,
    remote: Option<Box<dyn Explainer>>,
    check_ranges: bool,
}

impl Assessor {
    /// Fails when the manifest disagrees with the model.
    pub fn new(
        artifacts: &ModelArtifacts,
        policy: AlignPolicy,
        default_year: i64,
    ) -> Result<Self, PipelineError> {
        let scorer = artifacts.scorer().map_err(|e| log_failure(e.into()))?;
        Ok(Self {
            normalizer: artifacts.normalizer(policy, default_year),
            scorer,
            remote: None,
            check_ranges: true,
        })
    }

    pub fn with_remote(mut self, explainer: Box<dyn Explainer>) -> Self {
        self.remote = Some(explainer);
        self
    }

    /// Whether declared field ranges are enforced. On by default.
    pub fn with_range_checks(mut self, enabled: bool) -> Self {
        self.check_ranges = enabled;
        self
    }

    pub fn assess(
        &self,
        input: &ClinicalInput,
        language: Language,
        timestamp: jiff::civil::DateTime,
    ) -> Result<AssessmentRecord, PipelineError> {
        self.validate(input).map_err(log_failure)?;

        let features = self
            .normalizer
            .normalize(input)
            .map_err(|e| log_failure(e.into()))?;
        let probability = self
            .scorer
            .score(&features)
            .map_err(|e| log_failure(e.into()))?;
        let assessment = classify(probability);

        let request = ExplanationRequest {
            band: assessment.band,
            percentage: assessment.percentage,
            input,
            language,
        };
        let explanation = compose(self.remote.as_deref(), &request);

        info!(
            patient_id = %input.patient_id,
            percentage = assessment.percentage,
            band = ?assessment.band,
            source = ?explanation.source,
            "assessment complete"
        );

        Ok(AssessmentRecord {
            id: Uuid::new_v4(),
            timestamp,
            patient_id: input.patient_id.trim().to_string(),
            patient_name: input.patient_name.trim().to_string(),
            language,
            assessment,
            explanation: explanation.bullets,
            explanation_source: explanation.source,
            snapshot: input.snapshot(),
        })
    }

    /// Assess and append the result to `session`.
    pub fn assess_into(
        &self,
        session: &mut Session,
        input: &ClinicalInput,
        language: Language,
        timestamp: jiff::civil::DateTime,
    ) -> Result<AssessmentRecord, PipelineError> {
        let record = self.assess(input, language, timestamp)?;
        session.append(HistoryEntry::from(&record));
        Ok(record)
    }

    fn validate(&self, input: &ClinicalInput) -> Result<(), PipelineError> {
        input.require_patient()?;
        if self.check_ranges {
            if let Some(violation) = input.validate_ranges().into_iter().next() {
                return Err(CoreError::from(violation).into());
            }
        }
        Ok(())
    }
}

fn log_failure(e: PipelineError) -> PipelineError {
    match &e {
        PipelineError::FeatureMismatch(reason) => {
            error!(target: "deployment", %reason, "model and feature manifest disagree");
        }
        PipelineError::ModelUnavailable(reason) => error!(%reason, "model unavailable"),
        PipelineError::Validation(reason) => warn!(%reason, "input rejected"),
    }
    e
}
