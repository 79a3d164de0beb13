use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::aspects::Aspect;

/// Discrete 5-point sentiment scale, matching the ordinal classes the
/// review classifier emits (1 = very negative, 5 = very positive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentLabel {
    VeryNegative,
    Negative,
    Neutral,
    Positive,
    VeryPositive,
}

impl SentimentLabel {
    /// Total mapping from the 1-5 ordinal score; out-of-range input is
    /// clamped into the scale.
    pub fn from_score(score: u8) -> Self {
        match score {
            0 | 1 => Self::VeryNegative,
            2 => Self::Negative,
            3 => Self::Neutral,
            4 => Self::Positive,
            _ => Self::VeryPositive,
        }
    }

    /// Label for an averaged score, rounded half-up (2.5 -> Neutral).
    pub fn from_average(average: f32) -> Self {
        Self::from_score(average.round().clamp(1.0, 5.0) as u8)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::VeryNegative => "very_negative",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
            Self::Positive => "positive",
            Self::VeryPositive => "very_positive",
        }
    }
}

/// Sentiment of one aspect group, averaged over every sentence that
/// mentioned the group's keywords.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AspectResult {
    pub label: SentimentLabel,
    pub average_score: f32,
}

impl AspectResult {
    pub fn from_average(average_score: f32) -> Self {
        Self {
            label: SentimentLabel::from_average(average_score),
            average_score,
        }
    }
}

/// Output of one analysis call.
///
/// `confidence_raw` is the classifier's probability mass on the chosen
/// class in [0, 1]; `confidence_adjusted` is that value scaled to percent
/// and boosted by the heuristics in [`crate::confidence`], so
/// `confidence_adjusted >= confidence_raw * 100` always holds and never
/// exceeds 100. `aspects` is empty when aspect analysis was not requested
/// or no sentence matched any group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    pub label: SentimentLabel,
    pub score: u8,
    pub confidence_raw: f32,
    pub confidence_adjusted: f32,
    pub aspects: BTreeMap<Aspect, AspectResult>,
}

/// Languages the review corpus is expected to arrive in; mirrors the ten
/// classes of the upstream language-identification model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    Arabic,
    Chinese,
    English,
    French,
    German,
    Hindi,
    Italian,
    Japanese,
    Korean,
    Spanish,
    Unknown,
}

impl Language {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Arabic => "arabic",
            Self::Chinese => "chinese",
            Self::English => "english",
            Self::French => "french",
            Self::German => "german",
            Self::Hindi => "hindi",
            Self::Italian => "italian",
            Self::Japanese => "japanese",
            Self::Korean => "korean",
            Self::Spanish => "spanish",
            Self::Unknown => "unknown",
        }
    }
}
