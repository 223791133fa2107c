#![allow(dead_code)]

use std::path::{Path, PathBuf};

use serde_json::{json, Value};

use stillrisk_core::models::input::ClinicalInput;

pub const FEATURES: [&str; 20] = [
    "pregnancyduration",
    "babyweight",
    "visit_pregnancy_clinic",
    "total_emergency_visits",
    "height",
    "bmi",
    "weight",
    "systolic",
    "diastolic",
    "has_diabetes",
    "has_hypertension",
    "Creatinine (Mass/volume) in Serum or Plasma_mean",
    "Hemoglobin A1c/Hemoglobin. Total in Blood_mean",
    "Potassium (Moles/volume) in Serum or Plasma_mean",
    "ferric carboxymaltose_times",
    "metoprolol_times",
    "total_inpatient_visits",
    "twins",
    "deliverytype",
    "year",
];

fn stump(feature: usize, threshold: f64, left: f64, right: f64) -> Value {
    json!({
        "left_children": [1, -1, -1],
        "right_children": [2, -1, -1],
        "split_indices": [feature, 0, 0],
        "split_conditions": [threshold, left, right],
        "default_left": [1, 0, 0],
    })
}

/// Preterm and low birth weight lower the live-birth margin.
pub fn model_json() -> Value {
    model_json_with(&FEATURES)
}

/// The same two trees over a model trained on `features`.
pub fn model_json_with(features: &[&str]) -> Value {
    json!({
        "learner": {
            "feature_names": features,
            "learner_model_param": {
                "base_score": "5E-1",
                "num_feature": features.len().to_string(),
            },
            "gradient_booster": {
                "name": "gbtree",
                "model": { "trees": [stump(0, 34.0, -1.0, 2.0), stump(1, 2.5, -0.5, 0.3)] },
            },
            "objective": { "name": "binary:logistic" },
        }
    })
}

/// Write the model and a manifest listing `features` into `dir`.
pub fn write_artifacts(dir: &Path, features: &[&str]) -> (PathBuf, PathBuf) {
    let model_path = dir.join("xgb_model.json");
    let manifest_path = dir.join("features_used.txt");
    std::fs::write(&model_path, model_json().to_string()).unwrap();
    let mut manifest = String::from("feature\n");
    for name in features {
        manifest.push_str(name);
        manifest.push('\n');
    }
    std::fs::write(&manifest_path, manifest).unwrap();
    (model_path, manifest_path)
}

pub fn high_risk_input() -> ClinicalInput {
    ClinicalInput {
        patient_id: "23-001".to_string(),
        patient_name: "Sara A.".to_string(),
        gestational_weeks: Some(30),
        babyweight: Some(2.0),
        systolic_bp: Some(150),
        diastolic_bp: Some(95),
        prenatal_visits: Some(1),
        bmi: Some(32.0),
        diabetes: Some("yes".to_string()),
        ..Default::default()
    }
}

pub fn term_input(id: &str, name: &str) -> ClinicalInput {
    ClinicalInput {
        patient_id: id.to_string(),
        patient_name: name.to_string(),
        ..Default::default()
    }
}

pub fn timestamp() -> jiff::civil::DateTime {
    jiff::civil::date(2025, 3, 14).at(9, 30, 0, 0)
}
