#![allow(dead_code)]

use stillrisk_core::i18n::Language;
use stillrisk_core::models::assessment::RiskBand;
use stillrisk_core::models::history::HistoryEntry;
use stillrisk_core::models::input::{DeliveryType, InputSnapshot};
use stillrisk_export::layout::ReportContent;

pub fn snapshot() -> InputSnapshot {
    InputSnapshot {
        gestational_weeks: 30,
        babyweight: 2.0,
        bmi: 27.0,
        height: 165.0,
        systolic_bp: 150,
        diastolic_bp: 95,
        prenatal_visits: 2,
        emergency_visits: 0,
        inpatient_visits: 1,
        diabetes: true,
        hypertension: false,
        twins: 0,
        deliverytype: DeliveryType::Cesarean,
    }
}

pub fn content(language: Language, percentage: u8, band: RiskBand) -> ReportContent {
    ReportContent {
        language,
        timestamp: "2025-03-14 09:30:00".to_string(),
        patient_id: "23-001".to_string(),
        patient_name: "Sara A.".to_string(),
        percentage,
        band,
        bullets: vec![
            "High risk — increase monitoring.".to_string(),
            "Preterm pregnancy detected.".to_string(),
        ],
        snapshot: snapshot(),
    }
}

pub fn entry(hour: i8, id: &str, name: &str, band: RiskBand, score: u8) -> HistoryEntry {
    HistoryEntry {
        timestamp: jiff::civil::date(2025, 3, 14).at(hour, 0, 0, 0),
        patient_id: id.to_string(),
        patient_name: name.to_string(),
        band,
        score_pct: score,
        explanation: vec![
            "High risk — increase monitoring.".to_string(),
            "Diabetes present, \"controlled\".".to_string(),
        ],
        snapshot: snapshot(),
    }
}
