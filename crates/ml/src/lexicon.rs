use once_cell::sync::Lazy;
use regex::Regex;

use crate::{Classification, ClassificationError, ReviewClassifier};

static TOKEN_CLEANER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\p{L}\p{Nd}\s]+").expect("valid token cleaner regex"));

/// Deterministic valence-lexicon classifier used when no external model is
/// wired in. Token valences average into a target on the 1-5 scale, which
/// is expanded into a distance-weighted distribution over the five classes
/// so callers get the same output shape a softmax model gives.
#[derive(Debug, Default, Clone)]
pub struct LexiconReviewClassifier;

impl LexiconReviewClassifier {
    pub fn new() -> Self {
        Self
    }
}

impl ReviewClassifier for LexiconReviewClassifier {
    fn model_name(&self) -> &'static str {
        "lexicon-ordinal-v1"
    }

    fn classify(&self, text: &str) -> Result<Classification, ClassificationError> {
        Ok(score_text(text))
    }
}

pub(crate) fn score_text(text: &str) -> Classification {
    let cleaned = TOKEN_CLEANER.replace_all(text, " ").to_lowercase();

    let mut hits = 0usize;
    let mut sum = 0.0_f32;
    let mut negated = false;

    for token in cleaned.split_whitespace() {
        if matches!(token, "not" | "no" | "never" | "hardly") {
            negated = true;
            continue;
        }

        if let Some(valence) = token_valence(token) {
            sum += if negated { -valence } else { valence };
            hits += 1;
        }
        negated = false;
    }

    // Without any cue the distribution stays flat around neutral, which
    // keeps empty or off-topic input deterministic and low-confidence.
    let (target, sharpness) = if hits == 0 {
        (3.0, 0.25)
    } else {
        ((3.0 + sum / hits as f32).clamp(1.0, 5.0), 1.1)
    };

    Classification::from_probabilities(distribution(target, sharpness))
}

fn distribution(target: f32, sharpness: f32) -> [f32; 5] {
    let mut weights = [0.0_f32; 5];
    for (idx, weight) in weights.iter_mut().enumerate() {
        let class = (idx + 1) as f32;
        *weight = (-sharpness * (class - target).powi(2)).exp();
    }

    let total: f32 = weights.iter().sum();
    for weight in &mut weights {
        *weight /= total;
    }
    weights
}

fn token_valence(token: &str) -> Option<f32> {
    let valence = match token {
        "amazing" | "excellent" | "wonderful" | "fantastic" | "perfect" | "incredible"
        | "outstanding" | "superb" => 2.0,
        "great" | "good" | "nice" | "friendly" | "helpful" | "clean" | "comfortable"
        | "delicious" | "beautiful" | "lovely" | "spacious" | "convenient" | "tasty"
        | "pleasant" | "cozy" | "charming" => 1.0,
        "bad" | "poor" | "dirty" | "noisy" | "slow" | "cramped" | "unfriendly"
        | "overpriced" | "bland" | "crowded" | "delayed" | "delays" | "rude"
        | "disappointing" | "mediocre" => -1.0,
        "terrible" | "horrible" | "awful" | "worst" | "disgusting" | "filthy"
        | "dreadful" | "appalling" => -2.0,
        _ => return None,
    };

    Some(valence)
}
