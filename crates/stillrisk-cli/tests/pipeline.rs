mod common;

use stillrisk_cli::error::PipelineError;
use stillrisk_cli::config::StillriskConfig;
use stillrisk_cli::pipeline::{load_artifacts, Assessor};
use stillrisk_core::i18n::Language;
use stillrisk_core::models::assessment::{ExplanationSource, RiskBand};
use stillrisk_core::models::history::Session;
use stillrisk_explain::error::ExplainError;
use stillrisk_explain::{Explainer, ExplanationRequest};
use stillrisk_model::artifacts::ModelArtifacts;
use stillrisk_model::normalize::AlignPolicy;

#[derive(Debug)]
struct Unreachable;

impl Explainer for Unreachable {
    fn name(&self) -> &str {
        "unreachable"
    }

    fn explain(&self, _: &ExplanationRequest<'_>) -> Result<Vec<String>, ExplainError> {
        Err(ExplainError::Request("connection refused".to_string()))
    }
}

struct Canned;

impl Explainer for Canned {
    fn name(&self) -> &str {
        "canned"
    }

    fn explain(&self, request: &ExplanationRequest<'_>) -> Result<Vec<String>, ExplainError> {
        Ok(vec![format!("Risk at {}%.", request.percentage)])
    }
}

fn load(features: &[&str]) -> (tempfile::TempDir, ModelArtifacts) {
    let dir = tempfile::tempdir().unwrap();
    let (model, manifest) = common::write_artifacts(dir.path(), features);
    let artifacts = ModelArtifacts::load(&model, &manifest).unwrap();
    (dir, artifacts)
}

fn assessor(policy: AlignPolicy) -> (tempfile::TempDir, Assessor) {
    let (dir, artifacts) = load(&common::FEATURES);
    (dir, Assessor::new(&artifacts, policy, 2025).unwrap())
}

#[test]
fn high_risk_record_end_to_end() {
    let (_dir, assessor) = assessor(AlignPolicy::Strict);
    let record = assessor
        .assess(&common::high_risk_input(), Language::English, common::timestamp())
        .unwrap();

    assert_eq!(record.assessment.percentage, 82);
    assert_eq!(record.assessment.band, RiskBand::High);
    assert_eq!(record.explanation_source, ExplanationSource::RuleBased);
    assert_eq!(
        record.explanation,
        [
            "High risk — increase monitoring.",
            "Preterm pregnancy detected.",
            "Low birth weight detected.",
            "Elevated blood pressure.",
            "Diabetes present.",
        ]
    );
    assert_eq!(record.patient_id, "23-001");
    assert_eq!(record.snapshot.gestational_weeks, 30);
    assert!(record.snapshot.diabetes);
}

#[test]
fn term_record_with_defaults_is_low_risk() {
    let (_dir, assessor) = assessor(AlignPolicy::Strict);
    let record = assessor
        .assess(&common::term_input("23-002", "Mona K."), Language::Arabic, common::timestamp())
        .unwrap();

    assert_eq!(record.assessment.percentage, 9);
    assert_eq!(record.assessment.band, RiskBand::Low);
    assert_eq!(record.language, Language::Arabic);
    assert_eq!(record.explanation.len(), 1);
}

#[test]
fn missing_patient_name_is_rejected() {
    let (_dir, assessor) = assessor(AlignPolicy::Strict);
    let err = assessor
        .assess(&common::term_input("23-003", "   "), Language::English, common::timestamp())
        .unwrap_err();
    assert!(matches!(err, PipelineError::Validation(_)));
    assert!(!err.is_deployment_defect());
}

#[test]
fn out_of_range_input_is_rejected_unless_checks_are_off() {
    let mut input = common::term_input("23-004", "Huda S.");
    input.gestational_weeks = Some(50);

    let (_dir, assessor) = assessor(AlignPolicy::Permissive);
    let err = assessor
        .assess(&input, Language::English, common::timestamp())
        .unwrap_err();
    assert!(matches!(err, PipelineError::Validation(ref m) if m.contains("gestational_weeks")));

    let assessor = assessor.with_range_checks(false);
    assert!(assessor.assess(&input, Language::English, common::timestamp()).is_ok());
}

#[test]
fn unknown_flag_is_rejected_under_strict_policy() {
    let mut input = common::term_input("23-005", "Lina R.");
    input.diabetes = Some("maybe".to_string());

    let (_dir, strict) = assessor(AlignPolicy::Strict);
    assert!(matches!(
        strict.assess(&input, Language::English, common::timestamp()),
        Err(PipelineError::Validation(_))
    ));

    let (_dir, permissive) = assessor(AlignPolicy::Permissive);
    assert!(permissive.assess(&input, Language::English, common::timestamp()).is_ok());
}

#[test]
fn reordered_manifest_is_a_deployment_defect() {
    let mut features = common::FEATURES;
    features.swap(0, 1);
    let (_dir, artifacts) = load(&features);

    let err = Assessor::new(&artifacts, AlignPolicy::Strict, 2025).err().unwrap();
    assert!(matches!(err, PipelineError::FeatureMismatch(_)));
    assert!(err.is_deployment_defect());
}

#[test]
fn short_manifest_is_a_deployment_defect() {
    let (_dir, artifacts) = load(&common::FEATURES[..19]);
    let err = Assessor::new(&artifacts, AlignPolicy::Strict, 2025).err().unwrap();
    assert!(matches!(err, PipelineError::FeatureMismatch(_)));
}

#[test]
fn missing_model_file_is_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let (_, manifest) = common::write_artifacts(dir.path(), &common::FEATURES);
    let err = load_artifacts(&dir.path().join("absent.json"), &manifest).unwrap_err();
    assert!(matches!(err, PipelineError::ModelUnavailable(_)));
    assert!(!err.is_deployment_defect());
}

#[test]
fn corrupt_manifest_is_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let (model, manifest) = common::write_artifacts(dir.path(), &common::FEATURES);
    std::fs::write(&manifest, "feature\n\n").unwrap();
    assert!(matches!(
        load_artifacts(&model, &manifest),
        Err(PipelineError::ModelUnavailable(_))
    ));
}

#[test]
fn default_config_reads_unknown_flag_as_no() {
    let (_dir, artifacts) = load(&common::FEATURES);
    let policy = StillriskConfig::default().align_policy(false);
    let assessor = Assessor::new(&artifacts, policy, 2025).unwrap();

    let mut input = common::term_input("23-006", "Rana T.");
    input.diabetes = Some("Yes".to_string());
    let record = assessor
        .assess(&input, Language::English, common::timestamp())
        .unwrap();

    assert!(!record.snapshot.diabetes);
    assert_eq!(record.assessment.percentage, 9);
}

#[test]
fn extra_manifest_feature_is_zero_under_default_policy() {
    let mut features = common::FEATURES.to_vec();
    features.push("serum_ferritin_mean");
    let dir = tempfile::tempdir().unwrap();
    let (model_path, manifest_path) = common::write_artifacts(dir.path(), &features);
    std::fs::write(&model_path, common::model_json_with(&features).to_string()).unwrap();

    let artifacts = load_artifacts(&model_path, &manifest_path).unwrap();
    let policy = StillriskConfig::default().align_policy(false);
    let permissive = Assessor::new(&artifacts, policy, 2025).unwrap();
    let record = permissive
        .assess(&common::high_risk_input(), Language::English, common::timestamp())
        .unwrap();
    assert_eq!(record.assessment.percentage, 82);

    let strict = Assessor::new(&artifacts, AlignPolicy::Strict, 2025).unwrap();
    assert!(matches!(
        strict.assess(&common::high_risk_input(), Language::English, common::timestamp()),
        Err(PipelineError::FeatureMismatch(_))
    ));
}

#[test]
fn failing_remote_falls_back_to_rules() {
    let (_dir, assessor) = assessor(AlignPolicy::Strict);
    let assessor = assessor.with_remote(Box::new(Unreachable));
    let record = assessor
        .assess(&common::high_risk_input(), Language::English, common::timestamp())
        .unwrap();

    assert_eq!(record.explanation_source, ExplanationSource::RuleBased);
    assert_eq!(record.explanation[0], "High risk — increase monitoring.");
}

#[test]
fn remote_explanation_is_used_when_available() {
    let (_dir, assessor) = assessor(AlignPolicy::Strict);
    let assessor = assessor.with_remote(Box::new(Canned));
    let record = assessor
        .assess(&common::high_risk_input(), Language::English, common::timestamp())
        .unwrap();

    assert_eq!(record.explanation_source, ExplanationSource::Remote);
    assert_eq!(record.explanation, ["Risk at 82%."]);
}

#[test]
fn assessments_accumulate_in_the_session() {
    let (_dir, assessor) = assessor(AlignPolicy::Strict);
    let mut session = Session::new();

    assessor
        .assess_into(
            &mut session,
            &common::high_risk_input(),
            Language::English,
            common::timestamp(),
        )
        .unwrap();
    assessor
        .assess_into(
            &mut session,
            &common::term_input("23-002", "Mona K."),
            Language::English,
            common::timestamp(),
        )
        .unwrap();
    let rejected = assessor.assess_into(
        &mut session,
        &common::term_input("", "Nameless"),
        Language::English,
        common::timestamp(),
    );

    assert!(rejected.is_err());
    assert_eq!(session.len(), 2);

    let stats = session.statistics();
    assert_eq!(stats.total_cases, 2);
    assert_eq!(stats.high_risk, 1);
    assert_eq!(stats.low_risk, 1);
    assert_eq!(stats.avg_score, 45.5);

    assert_eq!(session.search("mona").len(), 1);
}

#[test]
fn assessor_is_reusable_across_records() {
    let (_dir, assessor) = assessor(AlignPolicy::Strict);
    let first = assessor
        .assess(&common::high_risk_input(), Language::English, common::timestamp())
        .unwrap();
    let second = assessor
        .assess(&common::high_risk_input(), Language::English, common::timestamp())
        .unwrap();

    assert_eq!(first.assessment, second.assessment);
    assert_ne!(first.id, second.id);
}
