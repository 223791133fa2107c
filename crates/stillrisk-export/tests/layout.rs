mod common;

use stillrisk_core::i18n::{Direction, Language};
use stillrisk_core::models::assessment::RiskBand;
use stillrisk_export::layout::{
    build_report, marker_position, report_file_name, wrap_text, Anchor, DrawOp, PageLayout,
    PAGE_HEIGHT,
};
use stillrisk_export::styles::{Color, ReportStyles};

fn marker_x(layout: &PageLayout) -> f64 {
    layout
        .ops
        .iter()
        .find_map(|op| match op {
            DrawOp::Line { from, .. } => Some(from.0),
            _ => None,
        })
        .unwrap()
}

fn filled_colors(layout: &PageLayout, height: f64) -> Vec<Color> {
    layout
        .ops
        .iter()
        .filter_map(|op| match op {
            DrawOp::FillRect { height: h, color, .. } if (*h - height).abs() < 1e-9 => Some(*color),
            _ => None,
        })
        .collect()
}

#[test]
fn marker_mirrors_for_right_to_left() {
    assert_eq!(marker_position(80, Direction::LeftToRight), 80.0);
    assert_eq!(marker_position(80, Direction::RightToLeft), 20.0);
    assert_eq!(marker_position(0, Direction::RightToLeft), 100.0);
}

#[test]
fn marker_is_drawn_on_mirrored_side() {
    let styles = ReportStyles::default();
    let ltr = build_report(&common::content(Language::English, 80, RiskBand::High), &styles);
    let rtl = build_report(&common::content(Language::Arabic, 80, RiskBand::High), &styles);

    assert!((marker_x(&ltr) - 156.0).abs() < 1e-6);
    assert!((marker_x(&rtl) - 54.0).abs() < 1e-6);
}

#[test]
fn marker_is_clamped_at_the_edges() {
    let styles = ReportStyles::default();
    let low = build_report(&common::content(Language::English, 0, RiskBand::Low), &styles);
    let high = build_report(&common::content(Language::English, 100, RiskBand::High), &styles);

    assert!((marker_x(&low) - (20.0 + 0.02 * 170.0)).abs() < 1e-6);
    assert!((marker_x(&high) - (20.0 + 0.98 * 170.0)).abs() < 1e-6);
}

#[test]
fn gauge_segments_reverse_for_right_to_left() {
    let styles = ReportStyles::default();
    let ltr = build_report(&common::content(Language::English, 50, RiskBand::Moderate), &styles);
    let rtl = build_report(&common::content(Language::Arabic, 50, RiskBand::Moderate), &styles);

    assert_eq!(
        filled_colors(&ltr, 8.0),
        [styles.segment_low, styles.segment_moderate, styles.segment_high]
    );
    assert_eq!(
        filled_colors(&rtl, 8.0),
        [styles.segment_high, styles.segment_moderate, styles.segment_low]
    );
}

#[test]
fn badge_color_follows_band() {
    let styles = ReportStyles::default();
    for (band, hex) in [
        (RiskBand::Low, "#16a34a"),
        (RiskBand::Moderate, "#d97706"),
        (RiskBand::High, "#dc2626"),
    ] {
        let layout = build_report(&common::content(Language::English, 50, band), &styles);
        assert_eq!(filled_colors(&layout, 10.0), [Color::from_hex(hex).unwrap()]);
    }
}

#[test]
fn english_report_carries_labels_and_values() {
    let layout = build_report(
        &common::content(Language::English, 82, RiskBand::High),
        &ReportStyles::default(),
    );
    let texts: Vec<&str> = layout.texts().collect();

    assert!(texts.contains(&"Stillbirth Risk Assessment"));
    assert!(texts.contains(&"Patient ID: "));
    assert!(texts.contains(&"23-001"));
    assert!(texts.contains(&"Risk Index (0–100): 82"));
    assert!(texts.contains(&"• Preterm pregnancy detected."));
    assert!(texts.contains(&"27.0"));
    assert!(texts.contains(&"yes"));
    assert_eq!(layout.title, "Stillbirth Risk Assessment Report");
}

#[test]
fn header_band_spans_the_page_top() {
    let layout = build_report(
        &common::content(Language::English, 10, RiskBand::Low),
        &ReportStyles::default(),
    );
    match &layout.ops[0] {
        DrawOp::FillRect { y, height, width, .. } => {
            assert_eq!(*y, PAGE_HEIGHT - 40.0);
            assert_eq!(*height, 40.0);
            assert_eq!(*width, 210.0);
        }
        other => panic!("expected header rectangle, got {other:?}"),
    }
}

#[test]
fn arabic_headings_are_right_aligned() {
    let layout = build_report(
        &common::content(Language::Arabic, 82, RiskBand::High),
        &ReportStyles::default(),
    );
    let notes_heading = layout
        .ops
        .iter()
        .find(|op| matches!(op, DrawOp::Text { size, .. } if *size == 12.0))
        .unwrap();
    match notes_heading {
        DrawOp::Text { x, anchor, .. } => {
            assert_eq!(*anchor, Anchor::End);
            assert_eq!(*x, 190.0);
        }
        _ => unreachable!(),
    }
}

#[test]
fn long_text_wraps_within_width() {
    let text = "Preterm gestation combined with low birth weight and elevated blood pressure \
                warrants closer monitoring over the coming weeks.";
    let lines = wrap_text(text, 60.0, 10.0);
    assert!(lines.len() > 1);
    assert_eq!(lines.join(" "), text);
}

#[test]
fn empty_text_wraps_to_one_line() {
    assert_eq!(wrap_text("", 170.0, 10.0), [""]);
}

#[test]
fn report_file_name_uses_patient_id() {
    assert_eq!(report_file_name("23-001"), "23-001_risk_report.pdf");
    assert_eq!(report_file_name("a/b"), "a_b_risk_report.pdf");
}
