//! History export and import.
//!
//! Files are UTF-8 with a byte-order mark so spreadsheet tools pick up the
//! Arabic text, and carry a header row in the session language.

use tracing::info;

use stillrisk_core::error::CoreError;
use stillrisk_core::i18n::{reverse_lookup, Language, Text};
use stillrisk_core::models::assessment::RiskBand;
use stillrisk_core::models::history::{
    format_timestamp, parse_timestamp, HistoryColumn, HistoryEntry, Session, EXPLANATION_SEPARATOR,
};
use stillrisk_core::models::input::{DeliveryType, InputSnapshot};

use crate::error::ExportError;
use crate::layout::{decimal, yes_no};

const BOM: &str = "\u{feff}";

fn cell(entry: &HistoryEntry, column: HistoryColumn, language: Language) -> String {
    let s = &entry.snapshot;
    match column {
        HistoryColumn::Timestamp => format_timestamp(&entry.timestamp),
        HistoryColumn::PatientId => entry.patient_id.clone(),
        HistoryColumn::PatientName => entry.patient_name.clone(),
        HistoryColumn::RiskLevel => entry.band.label(language).to_string(),
        HistoryColumn::ScorePct => entry.score_pct.to_string(),
        HistoryColumn::Explanation => entry.explanation.join(EXPLANATION_SEPARATOR),
        HistoryColumn::GestationalWeeks => s.gestational_weeks.to_string(),
        HistoryColumn::BabyWeight => decimal(s.babyweight),
        HistoryColumn::Bmi => decimal(s.bmi),
        HistoryColumn::Height => decimal(s.height),
        HistoryColumn::SystolicBp => s.systolic_bp.to_string(),
        HistoryColumn::DiastolicBp => s.diastolic_bp.to_string(),
        HistoryColumn::PrenatalVisits => s.prenatal_visits.to_string(),
        HistoryColumn::EmergencyVisits => s.emergency_visits.to_string(),
        HistoryColumn::InpatientVisits => s.inpatient_visits.to_string(),
        HistoryColumn::Diabetes => yes_no(s.diabetes, language).to_string(),
        HistoryColumn::Hypertension => yes_no(s.hypertension, language).to_string(),
        HistoryColumn::Twins => s.twins.to_string(),
        HistoryColumn::DeliveryType => s.deliverytype.code().to_string(),
    }
}

/// Serialize the session history, oldest entry first.
pub fn export_history(session: &Session, language: Language) -> Result<Vec<u8>, ExportError> {
    let mut writer = ::csv::Writer::from_writer(BOM.as_bytes().to_vec());

    writer.write_record(
        HistoryColumn::ALL
            .iter()
            .map(|column| language.text(Text::Column(*column))),
    )?;
    for entry in session.entries() {
        writer.write_record(
            HistoryColumn::ALL
                .iter()
                .map(|column| cell(entry, *column, language)),
        )?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Csv(e.to_string()))?;
    info!(rows = session.len(), language = %language, "exported history");
    Ok(bytes)
}

fn column_keys() -> Vec<Text> {
    HistoryColumn::ALL.iter().map(|c| Text::Column(*c)).collect()
}

fn parse_flag(value: &str) -> Option<bool> {
    let value = value.trim();
    Language::ALL.iter().find_map(|lang| {
        if lang.text(Text::Yes).eq_ignore_ascii_case(value) {
            Some(true)
        } else if lang.text(Text::No).eq_ignore_ascii_case(value) {
            Some(false)
        } else {
            None
        }
    })
}

struct Row<'a> {
    record: &'a ::csv::StringRecord,
    positions: &'a [usize],
    number: usize,
}

impl Row<'_> {
    fn get(&self, column: HistoryColumn) -> &str {
        let index = HistoryColumn::ALL
            .iter()
            .position(|c| *c == column)
            .map(|i| self.positions[i]);
        index.and_then(|i| self.record.get(i)).unwrap_or("")
    }

    fn invalid(&self, column: HistoryColumn, reason: &str) -> ExportError {
        ExportError::InvalidRow {
            row: self.number,
            reason: format!(
                "{}: {reason} ('{}')",
                Language::English.text(Text::Column(column)),
                self.get(column)
            ),
        }
    }

    fn parse<T: std::str::FromStr>(&self, column: HistoryColumn) -> Result<T, ExportError> {
        self.get(column)
            .trim()
            .parse()
            .map_err(|_| self.invalid(column, "not a number"))
    }

    fn flag(&self, column: HistoryColumn) -> Result<bool, ExportError> {
        parse_flag(self.get(column)).ok_or_else(|| self.invalid(column, "expected yes or no"))
    }

    fn entry(&self) -> Result<HistoryEntry, ExportError> {
        let timestamp = parse_timestamp(self.get(HistoryColumn::Timestamp)).map_err(|e| {
            ExportError::InvalidRow {
                row: self.number,
                reason: e.to_string(),
            }
        })?;
        let band: RiskBand = self
            .get(HistoryColumn::RiskLevel)
            .parse()
            .map_err(|e: CoreError| ExportError::InvalidRow {
                row: self.number,
                reason: e.to_string(),
            })?;
        let explanation = self
            .get(HistoryColumn::Explanation)
            .split(EXPLANATION_SEPARATOR)
            .filter(|b| !b.is_empty())
            .map(str::to_string)
            .collect();

        Ok(HistoryEntry {
            timestamp,
            patient_id: self.get(HistoryColumn::PatientId).to_string(),
            patient_name: self.get(HistoryColumn::PatientName).to_string(),
            band,
            score_pct: self.parse(HistoryColumn::ScorePct)?,
            explanation,
            snapshot: InputSnapshot {
                gestational_weeks: self.parse(HistoryColumn::GestationalWeeks)?,
                babyweight: self.parse(HistoryColumn::BabyWeight)?,
                bmi: self.parse(HistoryColumn::Bmi)?,
                height: self.parse(HistoryColumn::Height)?,
                systolic_bp: self.parse(HistoryColumn::SystolicBp)?,
                diastolic_bp: self.parse(HistoryColumn::DiastolicBp)?,
                prenatal_visits: self.parse(HistoryColumn::PrenatalVisits)?,
                emergency_visits: self.parse(HistoryColumn::EmergencyVisits)?,
                inpatient_visits: self.parse(HistoryColumn::InpatientVisits)?,
                diabetes: self.flag(HistoryColumn::Diabetes)?,
                hypertension: self.flag(HistoryColumn::Hypertension)?,
                twins: self.parse(HistoryColumn::Twins)?,
                deliverytype: DeliveryType::from_code(self.parse(HistoryColumn::DeliveryType)?),
            },
        })
    }
}

/// Read a history file written by [`export_history`] in either language.
pub fn import_history(bytes: &[u8]) -> Result<Session, ExportError> {
    let bytes = bytes.strip_prefix(BOM.as_bytes()).unwrap_or(bytes);
    let mut reader = ::csv::Reader::from_reader(bytes);

    let keys = column_keys();
    let headers = reader.headers()?.clone();
    let found: Vec<Option<HistoryColumn>> = headers
        .iter()
        .map(|h| match reverse_lookup(h.trim(), &keys) {
            Some(Text::Column(column)) => Some(column),
            _ => None,
        })
        .collect();

    let positions = HistoryColumn::ALL
        .iter()
        .map(|column| {
            found
                .iter()
                .position(|f| *f == Some(*column))
                .ok_or_else(|| {
                    ExportError::MissingColumn(
                        Language::English.text(Text::Column(*column)).to_string(),
                    )
                })
        })
        .collect::<Result<Vec<usize>, _>>()?;

    let mut session = Session::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        let row = Row {
            record: &record,
            positions: &positions,
            number: i + 1,
        };
        session.append(row.entry()?);
    }

    info!(rows = session.len(), "imported history");
    Ok(session)
}

/// Localized history file name.
pub fn history_file_name(language: Language) -> &'static str {
    language.text(Text::HistoryFileName)
}
