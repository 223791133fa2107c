//! Risk Classifier: adverse probability → percentage and band.

use stillrisk_core::models::assessment::{RiskAssessment, RiskBand};

/// Round a probability to a whole percentage, half-to-even, clamped to `[0, 100]`.
pub fn to_percentage(probability: f64) -> u8 {
    if probability.is_nan() {
        return 0;
    }
    (probability * 100.0).round_ties_even().clamp(0.0, 100.0) as u8
}

pub fn classify(probability: f64) -> RiskAssessment {
    let percentage = to_percentage(probability);
    RiskAssessment {
        probability: if probability.is_nan() { 0.0 } else { probability.clamp(0.0, 1.0) },
        percentage,
        band: RiskBand::from_percentage(percentage),
    }
}
