use serde::Serialize;
use tera::{Context, Tera};

use stillrisk_core::i18n::{Language, Text};
use stillrisk_core::models::history::SessionStatistics;

use crate::error::ExportError;
use crate::layout::{input_rows, ReportContent};

const SUMMARY_TEMPLATE: &str = "\
{{ title }}
{{ labels.timestamp }}: {{ timestamp }}
{{ labels.patient_id }}: {{ patient_id }}
{{ labels.patient_name }}: {{ patient_name }}
{{ labels.risk_assessment }}: {{ band }} ({{ percentage }}%)
{{ band_ranges }}

{{ labels.notes }}:
{% for bullet in bullets %}  • {{ bullet }}
{% endfor %}
{{ labels.inputs }}:
{% for row in inputs %}  {{ row.0 }}: {{ row.1 }}
{% endfor %}";

const STATISTICS_TEMPLATE: &str = "\
{{ labels.heading }}
  {{ labels.total }}: {{ stats.total_cases }}
  {{ labels.low }}: {{ stats.low_risk }}
  {{ labels.moderate }}: {{ stats.moderate_risk }}
  {{ labels.high }}: {{ stats.high_risk }}
  {{ labels.average }}: {{ average }}
";

#[derive(Serialize)]
struct SummaryView<'a> {
    title: &'static str,
    timestamp: &'a str,
    patient_id: &'a str,
    patient_name: &'a str,
    band: &'static str,
    percentage: u8,
    band_ranges: &'static str,
    bullets: &'a [String],
    inputs: Vec<(&'static str, String)>,
    labels: SummaryLabels,
}

#[derive(Serialize)]
struct SummaryLabels {
    timestamp: &'static str,
    patient_id: &'static str,
    patient_name: &'static str,
    risk_assessment: &'static str,
    notes: &'static str,
    inputs: &'static str,
}

#[derive(Serialize)]
struct StatisticsView<'a> {
    stats: &'a SessionStatistics,
    average: String,
    labels: StatisticsLabels,
}

#[derive(Serialize)]
struct StatisticsLabels {
    heading: &'static str,
    total: &'static str,
    low: &'static str,
    moderate: &'static str,
    high: &'static str,
    average: &'static str,
}

fn render(name: &str, template: &str, view: &impl Serialize) -> Result<String, ExportError> {
    let mut tera = Tera::default();
    tera.add_raw_template(name, template)
        .map_err(|e| ExportError::TemplateParse(e.to_string()))?;

    let value = serde_json::to_value(view)?;
    let context =
        Context::from_value(value).map_err(|e| ExportError::TemplateRender(e.to_string()))?;

    let rendered = tera.render(name, &context)?;
    Ok(rendered)
}

/// Plain-text summary of one assessment in its own language.
pub fn render_summary(content: &ReportContent) -> Result<String, ExportError> {
    let lang = content.language;
    let t = |key| lang.text(key);
    let view = SummaryView {
        title: t(Text::ReportTitle),
        timestamp: &content.timestamp,
        patient_id: &content.patient_id,
        patient_name: &content.patient_name,
        band: content.band.label(lang),
        percentage: content.percentage,
        band_ranges: t(Text::BandRanges),
        bullets: &content.bullets,
        inputs: input_rows(&content.snapshot, lang),
        labels: SummaryLabels {
            timestamp: t(Text::Timestamp),
            patient_id: t(Text::PatientId),
            patient_name: t(Text::PatientName),
            risk_assessment: t(Text::RiskAssessment),
            notes: t(Text::Notes),
            inputs: t(Text::Inputs),
        },
    };
    render("summary.txt", SUMMARY_TEMPLATE, &view)
}

pub fn render_statistics(stats: &SessionStatistics, lang: Language) -> Result<String, ExportError> {
    let t = |key| lang.text(key);
    let view = StatisticsView {
        stats,
        average: format!("{:.1}", stats.avg_score),
        labels: StatisticsLabels {
            heading: t(Text::CaseStatistics),
            total: t(Text::TotalCases),
            low: t(Text::LowRisk),
            moderate: t(Text::ModerateRisk),
            high: t(Text::HighRisk),
            average: t(Text::AverageScore),
        },
    };
    render("statistics.txt", STATISTICS_TEMPLATE, &view)
}
