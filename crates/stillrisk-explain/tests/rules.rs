use stillrisk_core::i18n::{Language, Text};
use stillrisk_core::models::assessment::RiskBand;
use stillrisk_core::models::input::ClinicalInput;
use stillrisk_explain::rules::{triggered_notes, RuleBasedExplainer};
use stillrisk_explain::ExplanationRequest;

fn high_risk_input() -> ClinicalInput {
    ClinicalInput {
        patient_id: "23-001".to_string(),
        patient_name: "Sara A.".to_string(),
        gestational_weeks: Some(30),
        babyweight: Some(2.0),
        prenatal_visits: Some(1),
        height: Some(165.0),
        bmi: Some(32.0),
        systolic_bp: Some(150),
        diastolic_bp: Some(95),
        diabetes: Some("yes".to_string()),
        hypertension: Some("no".to_string()),
        ..Default::default()
    }
}

fn request(input: &ClinicalInput, band: RiskBand, language: Language) -> ExplanationRequest<'_> {
    ExplanationRequest {
        band,
        percentage: 82,
        input,
        language,
    }
}

#[test]
fn banner_then_first_four_notes() {
    let input = high_risk_input();
    let bullets = RuleBasedExplainer.bullets(&request(&input, RiskBand::High, Language::English));

    assert_eq!(
        bullets,
        [
            "High risk — increase monitoring.",
            "Preterm pregnancy detected.",
            "Low birth weight detected.",
            "Elevated blood pressure.",
            "Diabetes present.",
        ]
    );
    // Limited prenatal care and elevated BMI fire too but fall past the cap.
    assert_eq!(
        triggered_notes(&input),
        [
            Text::NotePreterm,
            Text::NoteLowBirthWeight,
            Text::NoteElevatedBloodPressure,
            Text::NoteDiabetes,
            Text::NoteLimitedPrenatalCare,
            Text::NoteElevatedBmi,
        ]
    );
}

#[test]
fn same_input_gives_same_bullets() {
    let input = high_risk_input();
    let req = request(&input, RiskBand::High, Language::English);
    assert_eq!(RuleBasedExplainer.bullets(&req), RuleBasedExplainer.bullets(&req));
}

#[test]
fn defaults_trigger_nothing() {
    let input = ClinicalInput::default();
    let bullets = RuleBasedExplainer.bullets(&request(&input, RiskBand::Low, Language::English));
    assert_eq!(bullets, ["Low risk — continue standard care."]);
}

#[test]
fn every_band_has_its_banner() {
    let input = ClinicalInput::default();
    let banners: Vec<String> = RiskBand::ALL
        .into_iter()
        .map(|band| {
            RuleBasedExplainer.bullets(&request(&input, band, Language::English))[0].clone()
        })
        .collect();
    assert_eq!(
        banners,
        [
            "Low risk — continue standard care.",
            "Moderate risk — tighten follow-up.",
            "High risk — increase monitoring.",
        ]
    );
}

#[test]
fn arabic_bullets() {
    let input = high_risk_input();
    let bullets = RuleBasedExplainer.bullets(&request(&input, RiskBand::High, Language::Arabic));
    assert_eq!(bullets[0], "خطر مرتفع — عزّز المراقبة.");
    assert_eq!(bullets[1], "حمل مبكر.");
    assert_eq!(bullets.len(), 5);
}

#[test]
fn flags_match_any_case() {
    let input = ClinicalInput {
        hypertension: Some("YES".to_string()),
        ..Default::default()
    };
    let bullets =
        RuleBasedExplainer.bullets(&request(&input, RiskBand::Moderate, Language::English));
    assert_eq!(bullets[1], "Hypertension present.");
}

#[test]
fn thresholds_are_exclusive_where_documented() {
    let at_limits = ClinicalInput {
        gestational_weeks: Some(34),
        babyweight: Some(2.5),
        systolic_bp: Some(139),
        diastolic_bp: Some(89),
        prenatal_visits: Some(3),
        bmi: Some(29.9),
        total_emergency_visits: Some(2),
        hba1c_mean: Some(6.5),
        ..Default::default()
    };
    assert!(triggered_notes(&at_limits).is_empty());

    let over = ClinicalInput {
        diastolic_bp: Some(90),
        bmi: Some(30.0),
        total_emergency_visits: Some(3),
        hba1c_mean: Some(6.6),
        ..Default::default()
    };
    let bullets =
        RuleBasedExplainer.bullets(&request(&over, RiskBand::Moderate, Language::English));
    assert_eq!(
        &bullets[1..],
        [
            "Elevated blood pressure.",
            "Elevated BMI.",
            "Multiple emergency visits.",
            "Elevated HbA1c levels.",
        ]
    );
}
