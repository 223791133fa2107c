use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;
use crate::i18n::{Language, Text};
use crate::models::input::InputSnapshot;

/// Discretized stillbirth risk classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskBand {
    Low,
    Moderate,
    High,
}

impl RiskBand {
    pub const ALL: [RiskBand; 3] = [RiskBand::Low, RiskBand::Moderate, RiskBand::High];

    /// Highest percentage (inclusive) that still belongs to the band.
    pub fn upper_bound(self) -> u8 {
        match self {
            RiskBand::Low => 33,
            RiskBand::Moderate => 66,
            RiskBand::High => 100,
        }
    }

    /// Band for a whole percentage: ≤33 low, 34–66 moderate, otherwise high.
    pub fn from_percentage(percentage: u8) -> Self {
        Self::ALL
            .into_iter()
            .find(|band| percentage <= band.upper_bound())
            .unwrap_or(RiskBand::High)
    }

    /// Short code used for badge styling.
    pub fn code(self) -> &'static str {
        match self {
            RiskBand::Low => "low",
            RiskBand::Moderate => "mod",
            RiskBand::High => "high",
        }
    }

    pub fn label_key(self) -> Text {
        match self {
            RiskBand::Low => Text::BandLow,
            RiskBand::Moderate => Text::BandModerate,
            RiskBand::High => Text::BandHigh,
        }
    }

    pub fn banner_key(self) -> Text {
        match self {
            RiskBand::Low => Text::BannerLow,
            RiskBand::Moderate => Text::BannerModerate,
            RiskBand::High => Text::BannerHigh,
        }
    }

    pub fn label(self, language: Language) -> &'static str {
        language.text(self.label_key())
    }

    /// Parse a band label written in either language.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL.into_iter().find(|band| {
            Language::ALL
                .iter()
                .any(|lang| band.label(*lang).eq_ignore_ascii_case(label))
        })
    }
}

impl FromStr for RiskBand {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| CoreError::UnknownRiskLevel(s.to_string()))
    }
}

/// Result of scoring one input record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Probability of the adverse outcome, in `[0, 1]`.
    pub probability: f64,
    /// Rounded percentage, in `[0, 100]`.
    pub percentage: u8,
    pub band: RiskBand,
}

/// Where the explanation bullets came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExplanationSource {
    Remote,
    RuleBased,
}

/// A completed assessment: score, explanation and the inputs it was computed from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentRecord {
    pub id: Uuid,
    pub timestamp: jiff::civil::DateTime,
    pub patient_id: String,
    pub patient_name: String,
    pub language: Language,
    pub assessment: RiskAssessment,
    pub explanation: Vec<String>,
    pub explanation_source: ExplanationSource,
    pub snapshot: InputSnapshot,
}
