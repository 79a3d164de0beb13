use buddy_core::{detect_language_rules, Language};
use serde::Serialize;

use crate::LanguageDetector;

#[derive(Debug, Clone, Serialize)]
pub struct LanguagePrediction {
    pub language: Language,
    pub confidence: f32,
    pub model: &'static str,
}

/// Rule-backed detector wrapping the script-count heuristic. Stands in for
/// the external language-identification model behind the same trait seam.
#[derive(Debug, Default, Clone)]
pub struct ScriptLanguageDetector;

impl LanguageDetector for ScriptLanguageDetector {
    fn detect(&self, text: &str) -> LanguagePrediction {
        let language = detect_language_rules(text);

        // Script evidence is near-certain; Latin disambiguation is not.
        let confidence = match language {
            Language::Unknown => 0.0,
            Language::English
            | Language::Spanish
            | Language::French
            | Language::German
            | Language::Italian => 0.62,
            _ => 0.9,
        };

        LanguagePrediction {
            language,
            confidence,
            model: "script-rules-v1",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_detection_reports_high_confidence() {
        let prediction = ScriptLanguageDetector.detect("호텔이 정말 좋았어요");
        assert_eq!(prediction.language, Language::Korean);
        assert!(prediction.confidence > 0.8);
    }

    #[test]
    fn unknown_input_reports_zero_confidence() {
        let prediction = ScriptLanguageDetector.detect("1234 !!");
        assert_eq!(prediction.language, Language::Unknown);
        assert_eq!(prediction.confidence, 0.0);
    }
}
