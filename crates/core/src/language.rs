use crate::models::Language;

/// Script-count language heuristic for review text.
///
/// Non-Latin scripts are decided by character ranges alone; Latin-script
/// text is disambiguated with a handful of high-frequency function words
/// and falls back to English.
pub fn detect_language_rules(text: &str) -> Language {
    let mut arabic = 0usize;
    let mut devanagari = 0usize;
    let mut hangul = 0usize;
    let mut kana = 0usize;
    let mut han = 0usize;
    let mut latin = 0usize;

    for ch in text.chars() {
        let code = ch as u32;
        if (0x0600..=0x06FF).contains(&code) {
            arabic += 1;
        } else if (0x0900..=0x097F).contains(&code) {
            devanagari += 1;
        } else if (0xAC00..=0xD7AF).contains(&code) || (0x1100..=0x11FF).contains(&code) {
            hangul += 1;
        } else if (0x3040..=0x30FF).contains(&code) {
            kana += 1;
        } else if (0x4E00..=0x9FFF).contains(&code) {
            han += 1;
        } else if ch.is_ascii_alphabetic() {
            latin += 1;
        }
    }

    if arabic > 0 && arabic >= latin {
        return Language::Arabic;
    }
    if devanagari > 0 {
        return Language::Hindi;
    }
    if hangul > 0 {
        return Language::Korean;
    }
    // Kana is unique to Japanese; bare Han characters read as Chinese.
    if kana > 0 {
        return Language::Japanese;
    }
    if han > 0 {
        return Language::Chinese;
    }
    if latin == 0 {
        return Language::Unknown;
    }

    latin_language(text)
}

fn latin_language(text: &str) -> Language {
    let lower = text.to_lowercase();
    let candidates: &[(Language, &[&str])] = &[
        (Language::Spanish, &[" el ", " la ", " muy ", " gracias", " hotel es", "¿", "ñ"]),
        (Language::French, &[" le ", " les ", " très ", " merci", " c'est", "ç", "è"]),
        (Language::German, &[" der ", " die ", " und ", " sehr ", " nicht ", "ß"]),
        (Language::Italian, &[" il ", " molto ", " grazie", " è ", " che "]),
    ];

    let padded = format!(" {lower} ");
    let mut best = Language::English;
    let mut best_hits = 0usize;

    for (language, markers) in candidates {
        let hits = markers.iter().filter(|m| padded.contains(*m)).count();
        if hits > best_hits {
            best_hits = hits;
            best = *language;
        }
    }

    best
}
