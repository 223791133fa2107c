//! Bilingual (English / Arabic) text table.
//!
//! Every user-facing string lives in [`Language::text`], keyed by [`Text`].
//! Callers never branch on the language to pick a string themselves.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::history::HistoryColumn;

/// Output language for explanations, reports and exports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "ar")]
    Arabic,
}

/// Reading direction of a language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    LeftToRight,
    RightToLeft,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::English, Language::Arabic];

    pub fn code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Arabic => "ar",
        }
    }

    /// Name of the language as used in prompts to the explanation service.
    pub fn english_name(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Arabic => "Arabic",
        }
    }

    pub fn direction(self) -> Direction {
        match self {
            Language::English => Direction::LeftToRight,
            Language::Arabic => Direction::RightToLeft,
        }
    }

    pub fn is_rtl(self) -> bool {
        self.direction() == Direction::RightToLeft
    }

    /// Look up a string in the localization table.
    pub fn text(self, key: Text) -> &'static str {
        let (en, ar) = key.pair();
        match self {
            Language::English => en,
            Language::Arabic => ar,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "en" | "EN" | "english" | "English" => Ok(Language::English),
            "ar" | "AR" | "arabic" | "Arabic" | "العربية" => Ok(Language::Arabic),
            other => Err(format!("unsupported language '{other}' (expected 'en' or 'ar')")),
        }
    }
}

/// Keys of the localization table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Text {
    BandLow,
    BandModerate,
    BandHigh,
    BannerLow,
    BannerModerate,
    BannerHigh,
    BandRanges,

    NotePreterm,
    NoteLowBirthWeight,
    NoteElevatedBloodPressure,
    NoteDiabetes,
    NoteHypertension,
    NoteLimitedPrenatalCare,
    NoteElevatedBmi,
    NoteEmergencyVisits,
    NoteElevatedHba1c,

    ReportTitle,
    ReportSubtitle,
    RiskAssessment,
    RiskIndex,
    Explanation,
    Notes,
    Inputs,
    Timestamp,
    PatientId,
    PatientName,

    GestationalAge,
    Bmi,
    SystolicBp,
    DiastolicBp,
    PrenatalVisits,
    Diabetes,
    Hypertension,
    Yes,
    No,

    PatientIdRequired,
    PatientNameRequired,
    HistoryFileName,

    CaseStatistics,
    TotalCases,
    LowRisk,
    ModerateRisk,
    HighRisk,
    AverageScore,

    Column(HistoryColumn),
}

impl Text {
    fn pair(self) -> (&'static str, &'static str) {
        match self {
            Text::BandLow => ("Low", "منخفض"),
            Text::BandModerate => ("Moderate", "متوسط"),
            Text::BandHigh => ("High", "مرتفع"),
            Text::BannerLow => (
                "Low risk — continue standard care.",
                "خطر منخفض — استمر بالرعاية المعتادة.",
            ),
            Text::BannerModerate => (
                "Moderate risk — tighten follow-up.",
                "خطر متوسط — شدد المتابعة.",
            ),
            Text::BannerHigh => (
                "High risk — increase monitoring.",
                "خطر مرتفع — عزّز المراقبة.",
            ),
            Text::BandRanges => (
                "Bands: Low 0–33 • Moderate 34–66 • High 67–100",
                "المستويات: منخفض ٠–٣٣ • متوسط ٣٤–٦٦ • مرتفع ٦٧–١٠٠",
            ),

            Text::NotePreterm => ("Preterm pregnancy detected.", "حمل مبكر."),
            Text::NoteLowBirthWeight => ("Low birth weight detected.", "وزن منخفض عند الولادة."),
            Text::NoteElevatedBloodPressure => ("Elevated blood pressure.", "ضغط دم مرتفع."),
            Text::NoteDiabetes => ("Diabetes present.", "وجود سكري."),
            Text::NoteHypertension => ("Hypertension present.", "ارتفاع ضغط الدم."),
            Text::NoteLimitedPrenatalCare => {
                ("Limited prenatal care.", "قلّة المتابعة قبل الولادة.")
            }
            Text::NoteElevatedBmi => ("Elevated BMI.", "ارتفاع مؤشر كتلة الجسم."),
            Text::NoteEmergencyVisits => ("Multiple emergency visits.", "زيارات طوارئ متعددة."),
            Text::NoteElevatedHba1c => ("Elevated HbA1c levels.", "ارتفاع مستوى السكر التراكمي."),

            Text::ReportTitle => ("Stillbirth Risk Assessment", "تقييم خطر الجنين"),
            Text::ReportSubtitle => ("Risk assessment report", "تقرير تقييم الخطورة"),
            Text::RiskAssessment => ("Risk Assessment", "تقييم الخطورة"),
            Text::RiskIndex => ("Risk Index (0–100)", "مؤشر الخطورة (٠–١٠٠)"),
            Text::Explanation => ("Explanation", "توضيح"),
            Text::Notes => ("Notes", "ملاحظات"),
            Text::Inputs => ("Inputs", "المدخلات"),
            Text::Timestamp => ("Timestamp", "التاريخ"),
            Text::PatientId => ("Patient ID", "رقم المريضة"),
            Text::PatientName => ("Patient Name", "اسم المريضة"),

            Text::GestationalAge => ("Gestational age (weeks)", "عمر الحمل (أسابيع)"),
            Text::Bmi => ("BMI", "BMI"),
            Text::SystolicBp => ("Systolic BP", "الضغط الانقباضي"),
            Text::DiastolicBp => ("Diastolic BP", "الضغط الانبساطي"),
            Text::PrenatalVisits => ("Prenatal visits", "زيارات ما قبل الولادة"),
            Text::Diabetes => ("Diabetes", "سكري"),
            Text::Hypertension => ("Hypertension", "ارتفاع ضغط"),
            Text::Yes => ("yes", "نعم"),
            Text::No => ("no", "لا"),

            Text::PatientIdRequired => ("Patient ID is required", "رقم المريضة مطلوب"),
            Text::PatientNameRequired => ("Patient Name is required", "اسم المريضة مطلوب"),
            Text::HistoryFileName => ("patient_history.csv", "سجل_الحالات.csv"),

            Text::CaseStatistics => ("Case Statistics", "إحصائيات الحالات"),
            Text::TotalCases => ("Total Cases", "إجمالي الحالات"),
            Text::LowRisk => ("Low Risk", "منخفض الخطورة"),
            Text::ModerateRisk => ("Moderate Risk", "متوسط الخطورة"),
            Text::HighRisk => ("High Risk", "مرتفع الخطورة"),
            Text::AverageScore => ("Average Score", "متوسط المؤشر"),

            Text::Column(column) => column_pair(column),
        }
    }
}

fn column_pair(column: HistoryColumn) -> (&'static str, &'static str) {
    match column {
        HistoryColumn::Timestamp => ("timestamp", "التاريخ"),
        HistoryColumn::PatientId => ("patient_id", "رقم المريضة"),
        HistoryColumn::PatientName => ("patient_name", "اسم المريضة"),
        HistoryColumn::RiskLevel => ("risk_level", "مستوى الخطورة"),
        HistoryColumn::ScorePct => ("score_pct", "المؤشر"),
        HistoryColumn::Explanation => ("explanation", "توضيح"),
        HistoryColumn::GestationalWeeks => ("gestational_weeks", "عمر الحمل (أسابيع)"),
        HistoryColumn::BabyWeight => ("babyweight", "وزن الطفل"),
        HistoryColumn::Bmi => ("bmi", "مؤشر كتلة الجسم"),
        HistoryColumn::Height => ("height", "الطول"),
        HistoryColumn::SystolicBp => ("systolic_bp", "الضغط الانقباضي"),
        HistoryColumn::DiastolicBp => ("diastolic_bp", "الضغط الانبساطي"),
        HistoryColumn::PrenatalVisits => ("prenatal_visits", "زيارات قبل الولادة"),
        HistoryColumn::EmergencyVisits => ("emergency_visits", "زيارات الطوارئ"),
        HistoryColumn::InpatientVisits => ("inpatient_visits", "الزيارات الداخلية"),
        HistoryColumn::Diabetes => ("diabetes", "سكري"),
        HistoryColumn::Hypertension => ("hypertension", "ارتفاع ضغط"),
        HistoryColumn::Twins => ("twins", "توأم"),
        HistoryColumn::DeliveryType => ("deliverytype", "نوع الولادة"),
    }
}

/// Find the key whose text matches `value` in any language.
pub fn reverse_lookup(value: &str, candidates: &[Text]) -> Option<Text> {
    candidates
        .iter()
        .copied()
        .find(|key| Language::ALL.iter().any(|lang| lang.text(*key) == value))
}
