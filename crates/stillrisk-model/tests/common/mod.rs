#![allow(dead_code)]

use serde_json::{json, Value};

/// Feature names in the order the production manifest lists them.
pub const PRODUCTION_FEATURES: [&str; 20] = [
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

pub fn manifest_text() -> String {
    let mut text = String::from("feature\n");
    for name in PRODUCTION_FEATURES {
        text.push_str(name);
        text.push('\n');
    }
    text
}

/// A depth-one tree: `x[feature] < threshold` goes to `left`, otherwise `right`.
pub fn stump(feature: usize, threshold: f64, left: f64, right: f64) -> Value {
    json!({
        "left_children": [1, -1, -1],
        "right_children": [2, -1, -1],
        "split_indices": [feature, 0, 0],
        "split_conditions": [threshold, left, right],
        "default_left": [1, 0, 0],
    })
}

/// A single-node tree that always returns `value`.
pub fn leaf(value: f64) -> Value {
    json!({
        "left_children": [-1],
        "right_children": [-1],
        "split_indices": [0],
        "split_conditions": [value],
        "default_left": [0],
    })
}

pub fn model_json(trees: Vec<Value>, num_feature: usize, feature_names: Option<&[&str]>) -> Value {
    let mut learner = json!({
        "learner_model_param": { "base_score": "5E-1", "num_feature": num_feature.to_string() },
        "gradient_booster": { "name": "gbtree", "model": { "trees": trees } },
        "objective": { "name": "binary:logistic" },
    });
    if let Some(names) = feature_names {
        learner["feature_names"] = json!(names);
    }
    json!({ "learner": learner })
}

/// Preterm and low birth weight both lower the live-birth margin.
pub fn reference_model() -> Value {
    model_json(
        vec![stump(0, 34.0, -1.0, 2.0), stump(1, 2.5, -0.5, 0.3)],
        PRODUCTION_FEATURES.len(),
        Some(&PRODUCTION_FEATURES[..]),
    )
}
