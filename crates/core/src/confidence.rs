use std::collections::BTreeMap;

use crate::aspects::Aspect;
use crate::models::AspectResult;

/// Lexical cues that mark a review as unambiguous enough to report more
/// certainty than the raw classifier probability.
pub const STRONG_POSITIVE: &[&str] = &[
    "amazing",
    "excellent",
    "great",
    "wonderful",
    "fantastic",
    "perfect",
];

pub const STRONG_NEGATIVE: &[&str] = &[
    "terrible",
    "horrible",
    "awful",
    "poor",
    "bad",
    "worst",
];

/// Heuristic confidence adjustment.
///
/// Starting from the raw confidence in percent, multiplies by 1.2 when the
/// text contains a strong-sentiment cue word, then by 1.1 when every
/// present aspect agrees on strong polarity (all averages >= 4 or all <= 2).
/// Both boosts compose; the result is capped at 100 and is never below the
/// input.
pub fn boost_confidence(
    raw_percent: f32,
    text: &str,
    aspects: &BTreeMap<Aspect, AspectResult>,
) -> f32 {
    let mut confidence = raw_percent;

    if has_strong_cue(text) {
        confidence *= 1.2;
    }

    if !aspects.is_empty() {
        let unanimous_positive = aspects.values().all(|a| a.average_score >= 4.0);
        let unanimous_negative = aspects.values().all(|a| a.average_score <= 2.0);
        if unanimous_positive || unanimous_negative {
            confidence *= 1.1;
        }
    }

    confidence.min(100.0)
}

fn has_strong_cue(text: &str) -> bool {
    // Whole whitespace tokens only: "amazing!" is not a cue, "amazing" is.
    text.split_whitespace().any(|token| {
        let token = token.to_lowercase();
        STRONG_POSITIVE.contains(&token.as_str()) || STRONG_NEGATIVE.contains(&token.as_str())
    })
}
