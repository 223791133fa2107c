//! Deterministic explanation: a banner for the band followed by the
//! clinical checks that fired.

use stillrisk_core::i18n::Text;
use stillrisk_core::models::input::{defaults, ClinicalInput, YES_VALUES};

use crate::error::ExplainError;
use crate::request::{Explainer, ExplanationRequest};

/// Most notes appended after the banner.
pub const MAX_NOTES: usize = 4;

pub const PRETERM_WEEKS: i64 = 34;
pub const LOW_BIRTH_WEIGHT_KG: f64 = 2.5;
pub const SYSTOLIC_LIMIT: i64 = 140;
pub const DIASTOLIC_LIMIT: i64 = 90;
pub const MIN_PRENATAL_VISITS: i64 = 3;
pub const BMI_LIMIT: f64 = 30.0;
pub const MAX_EMERGENCY_VISITS: i64 = 2;
pub const HBA1C_LIMIT: f64 = 6.5;

/// Flags here accept any letter case, unlike the feature encoder.
fn flag_present(raw: Option<&str>) -> bool {
    raw.is_some_and(|value| YES_VALUES.contains(&value.trim().to_lowercase().as_str()))
}

/// Notes for every check the input triggers, in table order, uncapped.
pub fn triggered_notes(input: &ClinicalInput) -> Vec<Text> {
    let weeks = input.gestational_weeks.unwrap_or(defaults::GESTATIONAL_WEEKS);
    let babyweight = input.babyweight.unwrap_or(defaults::BABY_WEIGHT_KG);
    let systolic = input.systolic_bp.unwrap_or(defaults::SYSTOLIC_BP);
    let diastolic = input.diastolic_bp.unwrap_or(defaults::DIASTOLIC_BP);
    let visits = input.prenatal_visits.unwrap_or(defaults::PRENATAL_VISITS);
    let bmi = input.bmi.unwrap_or(defaults::BMI);
    let emergency = input.total_emergency_visits.unwrap_or(0);
    let hba1c = input.hba1c_mean.unwrap_or(0.0);

    let checks = [
        (weeks < PRETERM_WEEKS, Text::NotePreterm),
        (babyweight < LOW_BIRTH_WEIGHT_KG, Text::NoteLowBirthWeight),
        (
            systolic >= SYSTOLIC_LIMIT || diastolic >= DIASTOLIC_LIMIT,
            Text::NoteElevatedBloodPressure,
        ),
        (flag_present(input.diabetes.as_deref()), Text::NoteDiabetes),
        (flag_present(input.hypertension.as_deref()), Text::NoteHypertension),
        (visits < MIN_PRENATAL_VISITS, Text::NoteLimitedPrenatalCare),
        (bmi >= BMI_LIMIT, Text::NoteElevatedBmi),
        (emergency > MAX_EMERGENCY_VISITS, Text::NoteEmergencyVisits),
        (hba1c > HBA1C_LIMIT, Text::NoteElevatedHba1c),
    ];

    checks
        .into_iter()
        .filter_map(|(fired, note)| fired.then_some(note))
        .collect()
}

/// Always available; never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedExplainer;

impl RuleBasedExplainer {
    pub fn bullets(&self, request: &ExplanationRequest<'_>) -> Vec<String> {
        let lang = request.language;
        std::iter::once(request.band.banner_key())
            .chain(triggered_notes(request.input).into_iter().take(MAX_NOTES))
            .map(|key| lang.text(key).to_string())
            .collect()
    }
}

impl Explainer for RuleBasedExplainer {
    fn name(&self) -> &str {
        "rules"
    }

    fn explain(&self, request: &ExplanationRequest<'_>) -> Result<Vec<String>, ExplainError> {
        Ok(self.bullets(request))
    }
}
