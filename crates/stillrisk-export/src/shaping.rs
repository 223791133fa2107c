//! Arabic text preparation for renderers without a shaping engine.
//!
//! PDF text operators draw glyphs left to right exactly as given, so Arabic
//! has to be converted to contextual presentation forms and reordered into
//! visual order first.

use unicode_bidi::BidiInfo;

/// Contextual forms `[isolated, final, initial, medial]` from Arabic
/// Presentation Forms-B. Right-joining letters have no initial or medial
/// form and carry `0` there.
const FORMS: &[(char, [u32; 4])] = &[
    ('\u{0621}', [0xFE80, 0, 0, 0]),
    ('\u{0622}', [0xFE81, 0xFE82, 0, 0]),
    ('\u{0623}', [0xFE83, 0xFE84, 0, 0]),
    ('\u{0624}', [0xFE85, 0xFE86, 0, 0]),
    ('\u{0625}', [0xFE87, 0xFE88, 0, 0]),
    ('\u{0626}', [0xFE89, 0xFE8A, 0xFE8B, 0xFE8C]),
    ('\u{0627}', [0xFE8D, 0xFE8E, 0, 0]),
    ('\u{0628}', [0xFE8F, 0xFE90, 0xFE91, 0xFE92]),
    ('\u{0629}', [0xFE93, 0xFE94, 0, 0]),
    ('\u{062A}', [0xFE95, 0xFE96, 0xFE97, 0xFE98]),
    ('\u{062B}', [0xFE99, 0xFE9A, 0xFE9B, 0xFE9C]),
    ('\u{062C}', [0xFE9D, 0xFE9E, 0xFE9F, 0xFEA0]),
    ('\u{062D}', [0xFEA1, 0xFEA2, 0xFEA3, 0xFEA4]),
    ('\u{062E}', [0xFEA5, 0xFEA6, 0xFEA7, 0xFEA8]),
    ('\u{062F}', [0xFEA9, 0xFEAA, 0, 0]),
    ('\u{0630}', [0xFEAB, 0xFEAC, 0, 0]),
    ('\u{0631}', [0xFEAD, 0xFEAE, 0, 0]),
    ('\u{0632}', [0xFEAF, 0xFEB0, 0, 0]),
    ('\u{0633}', [0xFEB1, 0xFEB2, 0xFEB3, 0xFEB4]),
    ('\u{0634}', [0xFEB5, 0xFEB6, 0xFEB7, 0xFEB8]),
    ('\u{0635}', [0xFEB9, 0xFEBA, 0xFEBB, 0xFEBC]),
    ('\u{0636}', [0xFEBD, 0xFEBE, 0xFEBF, 0xFEC0]),
    ('\u{0637}', [0xFEC1, 0xFEC2, 0xFEC3, 0xFEC4]),
    ('\u{0638}', [0xFEC5, 0xFEC6, 0xFEC7, 0xFEC8]),
    ('\u{0639}', [0xFEC9, 0xFECA, 0xFECB, 0xFECC]),
    ('\u{063A}', [0xFECD, 0xFECE, 0xFECF, 0xFED0]),
    ('\u{0640}', [0x0640, 0x0640, 0x0640, 0x0640]),
    ('\u{0641}', [0xFED1, 0xFED2, 0xFED3, 0xFED4]),
    ('\u{0642}', [0xFED5, 0xFED6, 0xFED7, 0xFED8]),
    ('\u{0643}', [0xFED9, 0xFEDA, 0xFEDB, 0xFEDC]),
    ('\u{0644}', [0xFEDD, 0xFEDE, 0xFEDF, 0xFEE0]),
    ('\u{0645}', [0xFEE1, 0xFEE2, 0xFEE3, 0xFEE4]),
    ('\u{0646}', [0xFEE5, 0xFEE6, 0xFEE7, 0xFEE8]),
    ('\u{0647}', [0xFEE9, 0xFEEA, 0xFEEB, 0xFEEC]),
    ('\u{0648}', [0xFEED, 0xFEEE, 0, 0]),
    ('\u{0649}', [0xFEEF, 0xFEF0, 0, 0]),
    ('\u{064A}', [0xFEF1, 0xFEF2, 0xFEF3, 0xFEF4]),
];

const LAM: char = '\u{0644}';

/// Lam-alef ligatures `[isolated, final]`, keyed by the alef variant.
const LAM_ALEF: &[(char, [u32; 2])] = &[
    ('\u{0622}', [0xFEF5, 0xFEF6]),
    ('\u{0623}', [0xFEF7, 0xFEF8]),
    ('\u{0625}', [0xFEF9, 0xFEFA]),
    ('\u{0627}', [0xFEFB, 0xFEFC]),
];

const ISOLATED: usize = 0;
const FINAL: usize = 1;
const INITIAL: usize = 2;
const MEDIAL: usize = 3;

fn forms(c: char) -> Option<&'static [u32; 4]> {
    FORMS.iter().find(|(base, _)| *base == c).map(|(_, f)| f)
}

fn lam_alef(c: char) -> Option<&'static [u32; 2]> {
    LAM_ALEF.iter().find(|(alef, _)| *alef == c).map(|(_, f)| f)
}

/// Harakat and other combining marks do not break a join.
fn is_transparent(c: char) -> bool {
    matches!(
        c,
        '\u{0610}'..='\u{061A}' | '\u{064B}'..='\u{065F}' | '\u{0670}' | '\u{06D6}'..='\u{06ED}'
    )
}

fn joins_forward(c: char) -> bool {
    forms(c).is_some_and(|f| f[INITIAL] != 0)
}

fn joins_backward(c: char) -> bool {
    forms(c).is_some_and(|f| f[FINAL] != 0)
}

fn to_char(code: u32, fallback: char) -> char {
    char::from_u32(code).unwrap_or(fallback)
}

pub fn contains_arabic(text: &str) -> bool {
    text.chars().any(|c| ('\u{0600}'..='\u{06FF}').contains(&c))
}

/// Replace Arabic letters with their contextual presentation forms,
/// in logical order.
pub fn reshape(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let neighbour = |from: usize, step: isize| -> Option<char> {
        let mut i = from as isize + step;
        while i >= 0 && (i as usize) < chars.len() {
            let c = chars[i as usize];
            if !is_transparent(c) {
                return Some(c);
            }
            i += step;
        }
        None
    };

    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        let Some(shapes) = forms(c) else {
            out.push(c);
            i += 1;
            continue;
        };

        let after_joiner = neighbour(i, -1).is_some_and(joins_forward) && joins_backward(c);

        if c == LAM {
            let next = (i + 1..chars.len()).find(|&j| !is_transparent(chars[j]));
            if let Some(j) = next {
                if let Some(ligature) = lam_alef(chars[j]) {
                    let form = if after_joiner { FINAL } else { ISOLATED };
                    out.push(to_char(ligature[form], c));
                    out.extend(&chars[i + 1..j]);
                    i = j + 1;
                    continue;
                }
            }
        }

        let before_joiner = joins_forward(c) && neighbour(i, 1).is_some_and(joins_backward);
        let form = match (after_joiner, before_joiner) {
            (true, true) => MEDIAL,
            (true, false) => FINAL,
            (false, true) => INITIAL,
            (false, false) => ISOLATED,
        };
        out.push(to_char(shapes[form], c));
        i += 1;
    }
    out
}

fn mirror(c: char) -> char {
    match c {
        '(' => ')',
        ')' => '(',
        '[' => ']',
        ']' => '[',
        '{' => '}',
        '}' => '{',
        '<' => '>',
        '>' => '<',
        '«' => '»',
        '»' => '«',
        other => other,
    }
}

/// Reorder a single line from logical to visual order (Unicode bidi
/// algorithm, paragraph direction taken from the first strong character).
pub fn reorder(text: &str) -> String {
    let info = BidiInfo::new(text, None);
    let mut out = String::with_capacity(text.len());
    for para in &info.paragraphs {
        let (levels, runs) = info.visual_runs(para, para.range.clone());
        for run in runs {
            let slice = &text[run.clone()];
            if levels[run.start].is_rtl() {
                out.extend(slice.chars().rev().map(mirror));
            } else {
                out.push_str(slice);
            }
        }
    }
    out
}

/// Prepare one line of text for drawing. Text without Arabic is
/// returned unchanged.
pub fn visual(text: &str) -> String {
    if contains_arabic(text) {
        reorder(&reshape(text))
    } else {
        text.to_string()
    }
}
