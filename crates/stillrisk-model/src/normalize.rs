//! Feature Normalizer: clinical input record → ordered feature vector.

use std::sync::Arc;

use tracing::debug;

use stillrisk_core::models::input::{
    defaults, flag_is_recognized, flag_is_set, ClinicalInput, DeliveryType,
};

use crate::error::ModelError;
use crate::manifest::FeatureManifest;

/// Feature names as they appear in the trained model's schema.
pub mod feature {
    pub const PREGNANCY_DURATION: &str = "pregnancyduration";
    pub const BABY_WEIGHT: &str = "babyweight";
    pub const PRENATAL_VISITS: &str = "visit_pregnancy_clinic";
    pub const EMERGENCY_VISITS: &str = "total_emergency_visits";
    pub const HEIGHT: &str = "height";
    pub const BMI: &str = "bmi";
    pub const WEIGHT: &str = "weight";
    pub const SYSTOLIC: &str = "systolic";
    pub const DIASTOLIC: &str = "diastolic";
    pub const HAS_DIABETES: &str = "has_diabetes";
    pub const HAS_HYPERTENSION: &str = "has_hypertension";
    pub const CREATININE: &str = "Creatinine (Mass/volume) in Serum or Plasma_mean";
    pub const HBA1C: &str = "Hemoglobin A1c/Hemoglobin. Total in Blood_mean";
    pub const POTASSIUM: &str = "Potassium (Moles/volume) in Serum or Plasma_mean";
    pub const FERRIC_CARBOXYMALTOSE: &str = "ferric carboxymaltose_times";
    pub const METOPROLOL: &str = "metoprolol_times";
    pub const INPATIENT_VISITS: &str = "total_inpatient_visits";
    pub const TWINS: &str = "twins";
    pub const DELIVERY_TYPE: &str = "deliverytype";
    pub const YEAR: &str = "year";
}

/// How to treat manifest names and flag values the normalizer cannot resolve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AlignPolicy {
    /// Unknown manifest features become 0.0, unknown flag strings count as "no".
    #[default]
    Permissive,
    /// Both cases are errors.
    Strict,
}

/// Ordered, named feature values, aligned to a manifest.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    names: Vec<String>,
    values: Vec<f64>,
}

impl FeatureVector {
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.values[i])
    }
}

/// Body weight reconstructed from BMI and height.
///
/// This is `bmi × height_m²`, an approximation rather than the measured
/// patient weight; the model was trained on this derived value.
pub fn derived_weight(bmi: f64, height_cm: f64) -> f64 {
    let height_m = height_cm / 100.0;
    bmi * height_m.powi(2)
}

/// Every feature the normalizer can produce, in production order.
pub fn derive_features(input: &ClinicalInput, default_year: i64) -> Vec<(&'static str, f64)> {
    let int = |v: Option<i64>, default: i64| v.unwrap_or(default) as f64;
    let flag = |v: &Option<String>| if flag_is_set(v.as_deref()) { 1.0 } else { 0.0 };

    let height = input.height.unwrap_or(defaults::HEIGHT_CM);
    let bmi = input.bmi.unwrap_or(defaults::BMI);
    let delivery = DeliveryType::from_code(input.deliverytype.unwrap_or(1));

    vec![
        (feature::PREGNANCY_DURATION, int(input.gestational_weeks, defaults::GESTATIONAL_WEEKS)),
        (feature::BABY_WEIGHT, input.babyweight.unwrap_or(defaults::BABY_WEIGHT_KG)),
        (feature::PRENATAL_VISITS, int(input.prenatal_visits, defaults::PRENATAL_VISITS)),
        (feature::EMERGENCY_VISITS, int(input.total_emergency_visits, 0)),
        (feature::HEIGHT, height),
        (feature::BMI, bmi),
        (feature::WEIGHT, derived_weight(bmi, height)),
        (feature::SYSTOLIC, int(input.systolic_bp, defaults::SYSTOLIC_BP)),
        (feature::DIASTOLIC, int(input.diastolic_bp, defaults::DIASTOLIC_BP)),
        (feature::HAS_DIABETES, flag(&input.diabetes)),
        (feature::HAS_HYPERTENSION, flag(&input.hypertension)),
        (feature::CREATININE, input.creatinine_mean.unwrap_or(0.0)),
        (feature::HBA1C, input.hba1c_mean.unwrap_or(0.0)),
        (feature::POTASSIUM, input.potassium_mean.unwrap_or(0.0)),
        (feature::FERRIC_CARBOXYMALTOSE, int(input.ferric_carboxymaltose_times, 0)),
        (feature::METOPROLOL, int(input.metoprolol_times, 0)),
        (feature::INPATIENT_VISITS, int(input.total_inpatient_visits, 0)),
        (feature::TWINS, int(input.twins, 0)),
        (feature::DELIVERY_TYPE, delivery.code() as f64),
        (feature::YEAR, int(input.year, default_year)),
    ]
}

/// Maps input records onto the manifest's column order.
#[derive(Debug, Clone)]
pub struct Normalizer {
    manifest: Arc<FeatureManifest>,
    policy: AlignPolicy,
    default_year: i64,
}

impl Normalizer {
    /// `default_year` fills the `year` feature when the record omits it.
    pub fn new(manifest: Arc<FeatureManifest>, policy: AlignPolicy, default_year: i64) -> Self {
        Self {
            manifest,
            policy,
            default_year,
        }
    }

    pub fn manifest(&self) -> &FeatureManifest {
        &self.manifest
    }

    pub fn normalize(&self, input: &ClinicalInput) -> Result<FeatureVector, ModelError> {
        if self.policy == AlignPolicy::Strict {
            check_flag("diabetes", input.diabetes.as_deref())?;
            check_flag("hypertension", input.hypertension.as_deref())?;
        }

        let produced = derive_features(input, self.default_year);
        let mut values = Vec::with_capacity(self.manifest.len());

        for name in self.manifest.names() {
            let value = produced
                .iter()
                .find(|(produced_name, _)| *produced_name == name.as_str())
                .map(|(_, value)| *value);

            match (value, self.policy) {
                (Some(value), _) => values.push(value),
                (None, AlignPolicy::Permissive) => {
                    debug!(feature = %name, "manifest feature not derived from input, using 0");
                    values.push(0.0);
                }
                (None, AlignPolicy::Strict) => {
                    return Err(ModelError::UnresolvedFeature(name.clone()));
                }
            }
        }

        Ok(FeatureVector {
            names: self.manifest.names().to_vec(),
            values,
        })
    }
}

fn check_flag(field: &str, value: Option<&str>) -> Result<(), ModelError> {
    match value {
        Some(raw) if !flag_is_recognized(raw) => Err(ModelError::UnrecognizedFlag {
            field: field.to_string(),
            value: raw.to_string(),
        }),
        _ => Ok(()),
    }
}
