use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::CoreError;

/// Values substituted for clinical fields the caller left out.
pub mod defaults {
    pub const GESTATIONAL_WEEKS: i64 = 39;
    pub const BABY_WEIGHT_KG: f64 = 3.2;
    pub const PRENATAL_VISITS: i64 = 4;
    pub const HEIGHT_CM: f64 = 165.0;
    pub const BMI: f64 = 27.0;
    pub const SYSTOLIC_BP: i64 = 120;
    pub const DIASTOLIC_BP: i64 = 75;
}

/// Affirmative flag spellings. Matching is exact and case-sensitive.
pub const YES_VALUES: [&str; 2] = ["yes", "نعم"];

/// Negative flag spellings.
pub const NO_VALUES: [&str; 2] = ["no", "لا"];

/// Obstetric observation submitted for one assessment.
///
/// Every clinical field is optional; absent fields resolve to the
/// documented defaults in [`defaults`] (or zero for labs and medications).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClinicalInput {
    pub patient_id: String,
    pub patient_name: String,

    pub gestational_weeks: Option<i64>,
    /// Baby weight in kilograms.
    pub babyweight: Option<f64>,
    pub prenatal_visits: Option<i64>,
    pub total_emergency_visits: Option<i64>,
    pub total_inpatient_visits: Option<i64>,
    /// Maternal height in centimetres.
    pub height: Option<f64>,
    pub bmi: Option<f64>,
    pub systolic_bp: Option<i64>,
    pub diastolic_bp: Option<i64>,

    /// "yes" / "no" in English or Arabic.
    pub diabetes: Option<String>,
    pub hypertension: Option<String>,
    /// 1 for a twin gestation, 0 otherwise.
    pub twins: Option<i64>,
    /// 1 = vaginal, 2 = cesarean. Anything else is treated as vaginal.
    pub deliverytype: Option<i64>,

    /// Creatinine (mg/dL). Zero when unmeasured.
    pub creatinine_mean: Option<f64>,
    /// HbA1c (%). Zero when unmeasured.
    pub hba1c_mean: Option<f64>,
    /// Potassium (mmol/L). Zero when unmeasured.
    pub potassium_mean: Option<f64>,

    pub ferric_carboxymaltose_times: Option<i64>,
    pub metoprolol_times: Option<i64>,

    pub year: Option<i64>,
}

/// Delivery type code as the trained model expects it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryType {
    #[default]
    Vaginal,
    Cesarean,
}

impl DeliveryType {
    /// Map an input code, defaulting every unknown value to vaginal.
    pub fn from_code(code: i64) -> Self {
        match code {
            2 => DeliveryType::Cesarean,
            _ => DeliveryType::Vaginal,
        }
    }

    pub fn code(self) -> i64 {
        match self {
            DeliveryType::Vaginal => 1,
            DeliveryType::Cesarean => 2,
        }
    }
}

/// Declared valid range for a numeric input field (inclusive).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldRange {
    pub field: &'static str,
    pub min: f64,
    pub max: f64,
}

impl FieldRange {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Valid ranges enforced by the collecting layer before scoring.
pub const INPUT_RANGES: &[FieldRange] = &[
    FieldRange { field: "gestational_weeks", min: 20.0, max: 42.0 },
    FieldRange { field: "babyweight", min: 0.5, max: 6.0 },
    FieldRange { field: "prenatal_visits", min: 0.0, max: 30.0 },
    FieldRange { field: "total_emergency_visits", min: 0.0, max: 20.0 },
    FieldRange { field: "total_inpatient_visits", min: 0.0, max: 10.0 },
    FieldRange { field: "height", min: 130.0, max: 200.0 },
    FieldRange { field: "bmi", min: 16.0, max: 45.0 },
    FieldRange { field: "systolic_bp", min: 80.0, max: 220.0 },
    FieldRange { field: "diastolic_bp", min: 50.0, max: 140.0 },
    FieldRange { field: "twins", min: 0.0, max: 1.0 },
    FieldRange { field: "creatinine_mean", min: 0.0, max: 5.0 },
    FieldRange { field: "hba1c_mean", min: 0.0, max: 15.0 },
    FieldRange { field: "potassium_mean", min: 0.0, max: 10.0 },
    FieldRange { field: "ferric_carboxymaltose_times", min: 0.0, max: 20.0 },
    FieldRange { field: "metoprolol_times", min: 0.0, max: 50.0 },
    FieldRange { field: "year", min: 2020.0, max: 2100.0 },
];

/// Look up the declared range of a field.
pub fn range_for(field: &str) -> Option<&'static FieldRange> {
    INPUT_RANGES.iter().find(|r| r.field == field)
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("{field} = {value} is outside [{min}, {max}]")]
pub struct RangeViolation {
    pub field: String,
    pub value: f64,
    pub min: f64,
    pub max: f64,
}

impl ClinicalInput {
    /// Check that the patient identifier and name are present.
    ///
    /// Whitespace-only values count as missing.
    pub fn require_patient(&self) -> Result<(), CoreError> {
        if self.patient_id.trim().is_empty() {
            return Err(CoreError::MissingField("patient_id".to_string()));
        }
        if self.patient_name.trim().is_empty() {
            return Err(CoreError::MissingField("patient_name".to_string()));
        }
        Ok(())
    }

    /// Check every present numeric field against [`INPUT_RANGES`].
    pub fn validate_ranges(&self) -> Vec<RangeViolation> {
        self.numeric_fields()
            .into_iter()
            .filter_map(|(field, value)| {
                let value = value?;
                let range = range_for(field)?;
                (!range.contains(value)).then(|| RangeViolation {
                    field: field.to_string(),
                    value,
                    min: range.min,
                    max: range.max,
                })
            })
            .collect()
    }

    /// Present numeric fields by input name, as `f64`.
    pub fn numeric_fields(&self) -> Vec<(&'static str, Option<f64>)> {
        let int = |v: Option<i64>| v.map(|n| n as f64);
        vec![
            ("gestational_weeks", int(self.gestational_weeks)),
            ("babyweight", self.babyweight),
            ("prenatal_visits", int(self.prenatal_visits)),
            ("total_emergency_visits", int(self.total_emergency_visits)),
            ("total_inpatient_visits", int(self.total_inpatient_visits)),
            ("height", self.height),
            ("bmi", self.bmi),
            ("systolic_bp", int(self.systolic_bp)),
            ("diastolic_bp", int(self.diastolic_bp)),
            ("twins", int(self.twins)),
            ("creatinine_mean", self.creatinine_mean),
            ("hba1c_mean", self.hba1c_mean),
            ("potassium_mean", self.potassium_mean),
            ("ferric_carboxymaltose_times", int(self.ferric_carboxymaltose_times)),
            ("metoprolol_times", int(self.metoprolol_times)),
            ("year", int(self.year)),
        ]
    }

    /// Resolve the fields shown in reports and exported in history.
    pub fn snapshot(&self) -> InputSnapshot {
        InputSnapshot {
            gestational_weeks: self.gestational_weeks.unwrap_or(defaults::GESTATIONAL_WEEKS),
            babyweight: self.babyweight.unwrap_or(defaults::BABY_WEIGHT_KG),
            bmi: self.bmi.unwrap_or(defaults::BMI),
            height: self.height.unwrap_or(defaults::HEIGHT_CM),
            systolic_bp: self.systolic_bp.unwrap_or(defaults::SYSTOLIC_BP),
            diastolic_bp: self.diastolic_bp.unwrap_or(defaults::DIASTOLIC_BP),
            prenatal_visits: self.prenatal_visits.unwrap_or(defaults::PRENATAL_VISITS),
            emergency_visits: self.total_emergency_visits.unwrap_or(0),
            inpatient_visits: self.total_inpatient_visits.unwrap_or(0),
            diabetes: flag_is_set(self.diabetes.as_deref()),
            hypertension: flag_is_set(self.hypertension.as_deref()),
            twins: self.twins.unwrap_or(0),
            deliverytype: DeliveryType::from_code(self.deliverytype.unwrap_or(1)),
        }
    }
}

/// Exact-match flag test: only the affirmative vocabulary counts as set.
///
/// Unrecognized strings are treated as "no" without error.
pub fn flag_is_set(raw: Option<&str>) -> bool {
    raw.is_some_and(|value| YES_VALUES.contains(&value))
}

/// Whether a flag string belongs to the known yes/no vocabulary.
pub fn flag_is_recognized(raw: &str) -> bool {
    YES_VALUES.contains(&raw) || NO_VALUES.contains(&raw)
}

/// Resolved view of the inputs echoed in reports and history exports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputSnapshot {
    pub gestational_weeks: i64,
    pub babyweight: f64,
    pub bmi: f64,
    pub height: f64,
    pub systolic_bp: i64,
    pub diastolic_bp: i64,
    pub prenatal_visits: i64,
    pub emergency_visits: i64,
    pub inpatient_visits: i64,
    pub diabetes: bool,
    pub hypertension: bool,
    pub twins: i64,
    pub deliverytype: DeliveryType,
}

impl fmt::Display for DeliveryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
