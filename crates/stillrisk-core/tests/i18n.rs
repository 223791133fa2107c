use stillrisk_core::i18n::{reverse_lookup, Language, Text};
use stillrisk_core::models::assessment::RiskBand;
use stillrisk_core::models::history::HistoryColumn;

#[test]
fn band_labels_are_localized() {
    assert_eq!(RiskBand::High.label(Language::English), "High");
    assert_eq!(RiskBand::High.label(Language::Arabic), "مرتفع");
    assert_eq!(RiskBand::Moderate.label(Language::Arabic), "متوسط");
}

#[test]
fn band_labels_parse_in_either_language() {
    assert_eq!(RiskBand::from_label("Low"), Some(RiskBand::Low));
    assert_eq!(RiskBand::from_label("moderate"), Some(RiskBand::Moderate));
    assert_eq!(RiskBand::from_label("مرتفع"), Some(RiskBand::High));
    assert_eq!(RiskBand::from_label("Severe"), None);
}

#[test]
fn every_history_column_has_distinct_headers_per_language() {
    for lang in Language::ALL {
        let headers: Vec<_> = HistoryColumn::ALL
            .iter()
            .map(|c| lang.text(Text::Column(*c)))
            .collect();
        let mut deduped = headers.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(deduped.len(), headers.len(), "duplicate header in {lang}");
    }
}

#[test]
fn reverse_lookup_finds_yes_no_in_both_languages() {
    let keys = [Text::Yes, Text::No];
    assert_eq!(reverse_lookup("نعم", &keys), Some(Text::Yes));
    assert_eq!(reverse_lookup("no", &keys), Some(Text::No));
    assert_eq!(reverse_lookup("maybe", &keys), None);
}

#[test]
fn language_parses_from_codes_and_names() {
    assert_eq!("ar".parse::<Language>().unwrap(), Language::Arabic);
    assert_eq!("English".parse::<Language>().unwrap(), Language::English);
    assert!("fr".parse::<Language>().is_err());
    assert!(Language::Arabic.is_rtl());
    assert!(!Language::English.is_rtl());
}
