use stillrisk_core::i18n::Language;
use stillrisk_core::models::assessment::RiskBand;
use stillrisk_core::models::input::ClinicalInput;

use crate::error::ExplainError;

/// Everything an explainer may look at.
#[derive(Debug, Clone, Copy)]
pub struct ExplanationRequest<'a> {
    pub band: RiskBand,
    pub percentage: u8,
    pub input: &'a ClinicalInput,
    pub language: Language,
}

/// A strategy producing explanation bullets for one assessment.
pub trait Explainer: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    fn explain(&self, request: &ExplanationRequest<'_>) -> Result<Vec<String>, ExplainError>;
}
