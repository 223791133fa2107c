//! Page layout for the single-page risk report.
//!
//! The layout is a backend-neutral display list in millimetres with the
//! origin at the bottom-left corner, so that positions can be checked
//! without parsing PDF output.

use stillrisk_core::i18n::{Direction, Language, Text};
use stillrisk_core::models::assessment::{AssessmentRecord, RiskBand};
use stillrisk_core::models::history::format_timestamp;
use stillrisk_core::models::input::InputSnapshot;

use crate::shaping;
use crate::styles::{Color, ReportStyles};

pub const PAGE_WIDTH: f64 = 210.0;
pub const PAGE_HEIGHT: f64 = 297.0;
pub const MARGIN: f64 = 20.0;
pub const CONTENT_WIDTH: f64 = PAGE_WIDTH - 2.0 * MARGIN;

const HEADER_HEIGHT: f64 = 40.0;
const TITLE_X: f64 = 50.0;
const VALUE_OFFSET: f64 = 42.0;
const ROW_STEP: f64 = 7.0;
const BULLET_STEP: f64 = 6.0;

const BADGE_WIDTH: f64 = 42.0;
const BADGE_HEIGHT: f64 = 10.0;

const GAUGE_HEIGHT: f64 = 8.0;
const GAUGE_BORDER: f64 = 1.5;
const MARKER_WIDTH: f64 = 3.0;
/// Segment widths as fractions of the gauge, low to high.
pub const SEGMENT_FRACTIONS: [f64; 3] = [0.33, 0.34, 0.33];

const TABLE_COLUMNS: [f64; 2] = [60.0, 50.0];
const TABLE_PADDING: f64 = 3.0;

/// Points to millimetres.
const PT_TO_MM: f64 = 0.3528;
/// Average glyph advance as a fraction of the font size.
const AVERAGE_ADVANCE: f64 = 0.5;

pub const DOCUMENT_TITLE: &str = "Stillbirth Risk Assessment Report";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Start,
    Middle,
    End,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    FillRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: Color,
    },
    StrokeRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: Color,
        thickness: f64,
    },
    Line {
        from: (f64, f64),
        to: (f64, f64),
        color: Color,
        thickness: f64,
    },
    /// `text` is already in visual order.
    Text {
        x: f64,
        y: f64,
        size: f64,
        color: Color,
        anchor: Anchor,
        text: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    pub width: f64,
    pub height: f64,
    pub title: String,
    pub ops: Vec<DrawOp>,
}

impl PageLayout {
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// Everything printed on the report.
#[derive(Debug, Clone)]
pub struct ReportContent {
    pub language: Language,
    pub timestamp: String,
    pub patient_id: String,
    pub patient_name: String,
    pub percentage: u8,
    pub band: RiskBand,
    pub bullets: Vec<String>,
    pub snapshot: InputSnapshot,
}

impl From<&AssessmentRecord> for ReportContent {
    fn from(record: &AssessmentRecord) -> Self {
        Self {
            language: record.language,
            timestamp: format_timestamp(&record.timestamp),
            patient_id: record.patient_id.clone(),
            patient_name: record.patient_name.clone(),
            percentage: record.assessment.percentage,
            band: record.assessment.band,
            bullets: record.explanation.clone(),
            snapshot: record.snapshot.clone(),
        }
    }
}

/// Position of the gauge marker as a percentage of the gauge width,
/// measured from the left edge. Right-to-left reports mirror the scale.
pub fn marker_position(percentage: u8, direction: Direction) -> f64 {
    let pct = f64::from(percentage.min(100));
    match direction {
        Direction::LeftToRight => pct,
        Direction::RightToLeft => 100.0 - pct,
    }
}

/// Estimated rendered width of `text` in millimetres.
pub fn text_width(text: &str, size: f64) -> f64 {
    text.chars().count() as f64 * size * AVERAGE_ADVANCE * PT_TO_MM
}

/// Greedy word wrap against [`text_width`]. Always yields at least one line.
pub fn wrap_text(text: &str, max_width: f64, size: f64) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if text_width(&candidate, size) <= max_width {
            current = candidate;
        } else {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Localized rendering of a resolved flag.
pub fn yes_no(value: bool, language: Language) -> &'static str {
    language.text(if value { Text::Yes } else { Text::No })
}

/// Decimal rendering that keeps one fractional digit on whole numbers
/// (`27.0`, `73.5075`).
pub fn decimal(value: f64) -> String {
    format!("{value:?}")
}

/// Key inputs shown in the report table, localized.
pub fn input_rows(snapshot: &InputSnapshot, language: Language) -> Vec<(&'static str, String)> {
    let label = |key| language.text(key);
    vec![
        (label(Text::GestationalAge), snapshot.gestational_weeks.to_string()),
        (label(Text::Bmi), decimal(snapshot.bmi)),
        (label(Text::SystolicBp), snapshot.systolic_bp.to_string()),
        (label(Text::DiastolicBp), snapshot.diastolic_bp.to_string()),
        (label(Text::PrenatalVisits), snapshot.prenatal_visits.to_string()),
        (label(Text::Diabetes), yes_no(snapshot.diabetes, language).to_string()),
        (label(Text::Hypertension), yes_no(snapshot.hypertension, language).to_string()),
    ]
}

struct Painter<'a> {
    styles: &'a ReportStyles,
    rtl: bool,
    ops: Vec<DrawOp>,
}

impl Painter<'_> {
    fn fill(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color) {
        self.ops.push(DrawOp::FillRect {
            x,
            y,
            width,
            height,
            color,
        });
    }

    fn text(&mut self, x: f64, y: f64, size: f64, color: Color, anchor: Anchor, text: &str) {
        self.ops.push(DrawOp::Text {
            x,
            y,
            size,
            color,
            anchor,
            text: shaping::visual(text),
        });
    }

    /// Text flush with the leading margin of the reading direction.
    fn leading(&mut self, y: f64, size: f64, color: Color, text: &str) {
        if self.rtl {
            self.text(PAGE_WIDTH - MARGIN, y, size, color, Anchor::End, text);
        } else {
            self.text(MARGIN, y, size, color, Anchor::Start, text);
        }
    }

    fn header(&mut self, language: Language) {
        let s = self.styles;
        self.fill(0.0, PAGE_HEIGHT - HEADER_HEIGHT, PAGE_WIDTH, HEADER_HEIGHT, s.header_background);

        let (x, anchor) = if self.rtl {
            (PAGE_WIDTH - MARGIN, Anchor::End)
        } else {
            (TITLE_X, Anchor::Start)
        };
        self.text(
            x,
            PAGE_HEIGHT - 26.0,
            s.title_size,
            s.title,
            anchor,
            language.text(Text::ReportTitle),
        );
        self.text(
            x,
            PAGE_HEIGHT - 32.0,
            s.subtitle_size,
            s.subtitle,
            anchor,
            language.text(Text::ReportSubtitle),
        );
    }

    fn key_value(&mut self, y: f64, label: &str, value: &str) {
        let s = self.styles;
        if self.rtl {
            let line = format!("{label}: {value}");
            self.text(MARGIN + CONTENT_WIDTH, y, s.body_size, s.body, Anchor::End, &line);
        } else {
            self.text(MARGIN, y, s.body_size, s.body, Anchor::Start, &format!("{label}: "));
            self.text(MARGIN + VALUE_OFFSET, y, s.body_size, Color::BLACK, Anchor::Start, value);
        }
    }

    fn badge(&mut self, y: f64, band: RiskBand, language: Language) {
        let s = self.styles;
        self.fill(MARGIN, y, BADGE_WIDTH, BADGE_HEIGHT, s.badge(band));
        self.text(
            MARGIN + BADGE_WIDTH / 2.0,
            y + 3.2,
            s.badge_size,
            Color::WHITE,
            Anchor::Middle,
            band.label(language),
        );
    }

    fn gauge(&mut self, y: f64, percentage: u8, language: Language) {
        let s = self.styles;
        let x = MARGIN;
        let width = CONTENT_WIDTH;

        let mut bands = RiskBand::ALL;
        if self.rtl {
            bands.reverse();
        }

        let mut offset = 0.0;
        for (band, fraction) in bands.iter().zip(SEGMENT_FRACTIONS) {
            let segment = width * fraction;
            self.fill(x + offset, y, segment, GAUGE_HEIGHT, s.segment(*band));
            offset += segment;
        }
        self.ops.push(DrawOp::StrokeRect {
            x,
            y,
            width,
            height: GAUGE_HEIGHT,
            color: s.accent,
            thickness: GAUGE_BORDER,
        });

        let label_y = y - 5.0;
        let anchors = [
            (x, Anchor::Start),
            (x + width / 2.0, Anchor::Middle),
            (x + width, Anchor::End),
        ];
        for (band, (lx, anchor)) in bands.iter().zip(anchors) {
            self.text(lx, label_y, s.label_size, s.body, anchor, band.label(language));
        }

        let clamped = percentage.clamp(2, 98);
        let marker_x = x + marker_position(clamped, language.direction()) / 100.0 * width;
        self.ops.push(DrawOp::Line {
            from: (marker_x, y - 2.0),
            to: (marker_x, y + GAUGE_HEIGHT + 2.0),
            color: s.accent,
            thickness: MARKER_WIDTH,
        });
        self.text(
            marker_x,
            y + GAUGE_HEIGHT + 3.5,
            s.label_size,
            s.accent,
            Anchor::Middle,
            &percentage.to_string(),
        );
    }

    fn table(&mut self, y: f64, rows: &[(&str, String)]) {
        let s = self.styles;
        let width: f64 = TABLE_COLUMNS.iter().sum();
        let near = MARGIN + TABLE_PADDING;
        let far = MARGIN + width - TABLE_PADDING;

        for (i, (key, value)) in rows.iter().enumerate() {
            let row_y = y - i as f64 * ROW_STEP;
            if i % 2 == 0 {
                self.fill(MARGIN, row_y - ROW_STEP + 1.5, width, ROW_STEP, s.table_stripe);
            }
            let text_y = row_y - 4.7;
            if self.rtl {
                self.text(far, text_y, s.body_size, Color::BLACK, Anchor::End, key);
                self.text(near, text_y, s.body_size, Color::BLACK, Anchor::Start, value);
            } else {
                self.text(near, text_y, s.body_size, Color::BLACK, Anchor::Start, key);
                self.text(far, text_y, s.body_size, Color::BLACK, Anchor::End, value);
            }
        }
    }
}

/// Lay out the A4 report for one assessment.
pub fn build_report(content: &ReportContent, styles: &ReportStyles) -> PageLayout {
    let language = content.language;
    let rtl = language.is_rtl();
    let mut p = Painter {
        styles,
        rtl,
        ops: Vec::new(),
    };

    p.header(language);

    let mut y = PAGE_HEIGHT - 48.0;
    p.key_value(y, language.text(Text::Timestamp), &content.timestamp);
    y -= ROW_STEP;
    p.key_value(y, language.text(Text::PatientId), &content.patient_id);
    y -= ROW_STEP;
    p.key_value(y, language.text(Text::PatientName), &content.patient_name);
    y -= 12.0;

    p.badge(y, content.band, language);
    let index_line = format!("{}: {}", language.text(Text::RiskIndex), content.percentage);
    p.leading(y - 8.0, styles.badge_size, styles.body, &index_line);
    p.gauge(y - 22.0, content.percentage, language);

    y -= 40.0;
    p.leading(y, styles.heading_size, styles.title, language.text(Text::Notes));
    y -= 7.0;

    for bullet in &content.bullets {
        let line = if rtl {
            format!("{bullet} •")
        } else {
            format!("• {bullet}")
        };
        for wrapped in wrap_text(&line, CONTENT_WIDTH, styles.body_size) {
            p.leading(y, styles.body_size, styles.body, &wrapped);
            y -= BULLET_STEP;
        }
    }

    y -= 6.0;
    p.leading(y, styles.heading_size, styles.title, language.text(Text::Inputs));
    y -= 4.0;
    p.table(y, &input_rows(&content.snapshot, language));

    PageLayout {
        width: PAGE_WIDTH,
        height: PAGE_HEIGHT,
        title: DOCUMENT_TITLE.to_string(),
        ops: p.ops,
    }
}

/// File name for a patient's report.
pub fn report_file_name(patient_id: &str) -> String {
    let safe: String = patient_id
        .trim()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    format!("{safe}_risk_report.pdf")
}
