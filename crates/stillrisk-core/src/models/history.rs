use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::models::assessment::{AssessmentRecord, RiskBand};
use crate::models::input::InputSnapshot;

/// Timestamp layout used in history rows and reports.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Separator between explanation bullets in a history row.
pub const EXPLANATION_SEPARATOR: &str = " | ";

pub fn format_timestamp(timestamp: &jiff::civil::DateTime) -> String {
    timestamp.strftime(TIMESTAMP_FORMAT).to_string()
}

pub fn parse_timestamp(value: &str) -> Result<jiff::civil::DateTime, CoreError> {
    jiff::civil::DateTime::strptime(TIMESTAMP_FORMAT, value.trim()).map_err(|e| {
        CoreError::InvalidTimestamp {
            value: value.to_string(),
            reason: e.to_string(),
        }
    })
}

/// Columns of an exported history row, in export order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HistoryColumn {
    Timestamp,
    PatientId,
    PatientName,
    RiskLevel,
    ScorePct,
    Explanation,
    GestationalWeeks,
    BabyWeight,
    Bmi,
    Height,
    SystolicBp,
    DiastolicBp,
    PrenatalVisits,
    EmergencyVisits,
    InpatientVisits,
    Diabetes,
    Hypertension,
    Twins,
    DeliveryType,
}

impl HistoryColumn {
    pub const ALL: [HistoryColumn; 19] = [
        HistoryColumn::Timestamp,
        HistoryColumn::PatientId,
        HistoryColumn::PatientName,
        HistoryColumn::RiskLevel,
        HistoryColumn::ScorePct,
        HistoryColumn::Explanation,
        HistoryColumn::GestationalWeeks,
        HistoryColumn::BabyWeight,
        HistoryColumn::Bmi,
        HistoryColumn::Height,
        HistoryColumn::SystolicBp,
        HistoryColumn::DiastolicBp,
        HistoryColumn::PrenatalVisits,
        HistoryColumn::EmergencyVisits,
        HistoryColumn::InpatientVisits,
        HistoryColumn::Diabetes,
        HistoryColumn::Hypertension,
        HistoryColumn::Twins,
        HistoryColumn::DeliveryType,
    ];
}

/// One row of the session history log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: jiff::civil::DateTime,
    pub patient_id: String,
    pub patient_name: String,
    pub band: RiskBand,
    pub score_pct: u8,
    pub explanation: Vec<String>,
    pub snapshot: InputSnapshot,
}

impl From<&AssessmentRecord> for HistoryEntry {
    fn from(record: &AssessmentRecord) -> Self {
        Self {
            timestamp: record.timestamp,
            patient_id: record.patient_id.clone(),
            patient_name: record.patient_name.clone(),
            band: record.assessment.band,
            score_pct: record.assessment.percentage,
            explanation: record.explanation.clone(),
            snapshot: record.snapshot.clone(),
        }
    }
}

/// Aggregate counts over a session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SessionStatistics {
    pub total_cases: usize,
    pub low_risk: usize,
    pub moderate_risk: usize,
    pub high_risk: usize,
    /// Mean score rounded to one decimal; zero for an empty session.
    pub avg_score: f64,
}

/// Append-only history of the assessments made during one session.
///
/// Entries cannot be removed; they live until the session is dropped.
#[derive(Debug, Clone, Default)]
pub struct Session {
    entries: Vec<HistoryEntry>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn statistics(&self) -> SessionStatistics {
        let count = |band: RiskBand| self.entries.iter().filter(|e| e.band == band).count();
        let total_cases = self.entries.len();
        let avg_score = if total_cases == 0 {
            0.0
        } else {
            let sum: f64 = self.entries.iter().map(|e| f64::from(e.score_pct)).sum();
            (sum / total_cases as f64 * 10.0).round_ties_even() / 10.0
        };

        SessionStatistics {
            total_cases,
            low_risk: count(RiskBand::Low),
            moderate_risk: count(RiskBand::Moderate),
            high_risk: count(RiskBand::High),
            avg_score,
        }
    }

    /// Entries whose patient id or name contains `query` (case-insensitive),
    /// newest first. Entries sharing a timestamp come latest-appended first.
    /// An empty query matches everything.
    pub fn search(&self, query: &str) -> Vec<&HistoryEntry> {
        let needle = query.trim().to_lowercase();
        let mut matches: Vec<&HistoryEntry> = self
            .entries
            .iter()
            .rev()
            .filter(|e| {
                needle.is_empty()
                    || e.patient_id.to_lowercase().contains(&needle)
                    || e.patient_name.to_lowercase().contains(&needle)
            })
            .collect();
        matches.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        matches
    }
}

impl FromIterator<HistoryEntry> for Session {
    fn from_iter<I: IntoIterator<Item = HistoryEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
