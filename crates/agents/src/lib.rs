use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use buddy_core::{
    boost_confidence, matching_aspects, sentences, Aspect, AspectResult, SentimentLabel,
    SentimentResult,
};
use buddy_ml::{ClassificationError, LanguagePrediction, ReviewMlStack};
use buddy_observability::AppMetrics;
use tracing::{info, instrument, warn};

/// Top-level review analysis facade: whole-text classification, per-aspect
/// aggregation, and the confidence heuristics, behind one `analyze` call.
///
/// Stateless per call; the injected ml stack is the only long-lived
/// resource and is read-only, so independent texts may be analyzed from
/// multiple threads concurrently.
#[derive(Clone)]
pub struct ReviewAnalyzer {
    stack: ReviewMlStack,
    metrics: Arc<AppMetrics>,
}

impl ReviewAnalyzer {
    pub fn new(stack: ReviewMlStack, metrics: Arc<AppMetrics>) -> Self {
        Self { stack, metrics }
    }

    pub fn classifier_model(&self) -> &'static str {
        self.stack.classifier.model_name()
    }

    pub fn burn_enabled(&self) -> bool {
        self.stack.burn_enabled
    }

    /// Analyzes a single review. A whole-text classification failure is
    /// fatal to the call and surfaces as an error; no partial result is
    /// ever returned for it.
    #[instrument(skip(self, text))]
    pub fn analyze(
        &self,
        text: &str,
        include_aspects: bool,
    ) -> Result<SentimentResult, ClassificationError> {
        let started = Instant::now();
        self.metrics.inc_analysis();

        let whole = self.stack.classifier.classify(text)?;
        self.metrics.inc_classifier_call();

        let aspects = if include_aspects {
            self.aggregate_aspects(text)
        } else {
            BTreeMap::new()
        };

        let raw_percent = whole.confidence() * 100.0;
        let confidence_adjusted = boost_confidence(raw_percent, text, &aspects);
        if confidence_adjusted > raw_percent {
            self.metrics.inc_boost();
        }

        let result = SentimentResult {
            label: SentimentLabel::from_score(whole.score),
            score: whole.score,
            confidence_raw: whole.confidence(),
            confidence_adjusted,
            aspects,
        };

        self.metrics.observe_latency(started.elapsed());
        info!(
            score = result.score,
            label = result.label.as_str(),
            aspects = result.aspects.len(),
            "review analyzed"
        );

        Ok(result)
    }

    /// Analyzes independent texts; one failing entry never poisons the
    /// rest of the batch.
    pub fn analyze_batch(
        &self,
        texts: &[String],
        include_aspects: bool,
    ) -> Vec<Result<SentimentResult, ClassificationError>> {
        texts
            .iter()
            .map(|text| self.analyze(text, include_aspects))
            .collect()
    }

    pub fn detect_language(&self, text: &str) -> LanguagePrediction {
        self.stack.detector.detect(text)
    }

    fn aggregate_aspects(&self, text: &str) -> BTreeMap<Aspect, AspectResult> {
        let mut scores: BTreeMap<Aspect, Vec<f32>> = BTreeMap::new();

        for segment in sentences(text) {
            let matched = matching_aspects(segment);
            if matched.is_empty() {
                continue;
            }

            // One classification per segment; the score is shared by every
            // group the segment matched.
            match self.stack.classifier.classify(segment) {
                Ok(classified) => {
                    self.metrics.inc_classifier_call();
                    for aspect in matched {
                        scores
                            .entry(aspect)
                            .or_default()
                            .push(f32::from(classified.score));
                    }
                }
                Err(error) => {
                    self.metrics.inc_segment_failure();
                    warn!(%error, segment, "segment classification failed, excluded from aspect averages");
                }
            }
        }

        scores
            .into_iter()
            .map(|(aspect, values)| {
                let average = values.iter().sum::<f32>() / values.len() as f32;
                (aspect, AspectResult::from_average(average))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use buddy_ml::{
        Classification, ClassifierAdapter, LexiconReviewClassifier, ReviewClassifier,
        ScriptLanguageDetector,
    };

    fn stack_with(backend: Arc<dyn ReviewClassifier>) -> ReviewMlStack {
        ReviewMlStack {
            classifier: ClassifierAdapter::new(backend, None),
            detector: Arc::new(ScriptLanguageDetector),
            burn_enabled: false,
        }
    }

    fn analyzer() -> ReviewAnalyzer {
        ReviewAnalyzer::new(
            stack_with(Arc::new(LexiconReviewClassifier::new())),
            AppMetrics::shared(),
        )
    }

    /// Counts invocations so call-sharing across aspect groups can be
    /// asserted.
    struct CountingClassifier {
        calls: AtomicUsize,
    }

    impl ReviewClassifier for CountingClassifier {
        fn model_name(&self) -> &'static str {
            "counting-test"
        }

        fn classify(&self, _text: &str) -> Result<Classification, ClassificationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Classification::from_probabilities([
                0.05, 0.05, 0.1, 0.6, 0.2,
            ]))
        }
    }

    /// Fails on the staff segment, succeeds on everything else (including
    /// the whole-text pass).
    struct FlakyClassifier;

    impl ReviewClassifier for FlakyClassifier {
        fn model_name(&self) -> &'static str {
            "flaky-test"
        }

        fn classify(&self, text: &str) -> Result<Classification, ClassificationError> {
            if text.starts_with("The staff") {
                return Err(ClassificationError::Backend("induced failure".into()));
            }
            Ok(Classification::from_probabilities([
                0.05, 0.05, 0.1, 0.6, 0.2,
            ]))
        }
    }

    struct BrokenClassifier;

    impl ReviewClassifier for BrokenClassifier {
        fn model_name(&self) -> &'static str {
            "broken-test"
        }

        fn classify(&self, _text: &str) -> Result<Classification, ClassificationError> {
            Err(ClassificationError::Unavailable)
        }
    }

    #[test]
    fn analyze_is_idempotent() {
        let analyzer = analyzer();
        let text = "The hotel was amazing. The staff were great and the food was delicious.";
        let first = analyzer.analyze(text, true).unwrap();
        let second = analyzer.analyze(text, true).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn positive_review_with_aspects_and_boosts() {
        let analyzer = analyzer();
        let result = analyzer
            .analyze(
                "The hotel was amazing. The staff were great and the food was delicious.",
                true,
            )
            .unwrap();

        assert!(result.score >= 4);
        assert!(result.aspects.contains_key(&Aspect::Accommodation));
        assert!(result.aspects.contains_key(&Aspect::Service));
        assert!(result.aspects.contains_key(&Aspect::Dining));
        // "great" plus unanimous positive aspects: both boosts apply.
        let raw_percent = result.confidence_raw * 100.0;
        let expected = (raw_percent * 1.2 * 1.1).min(100.0);
        assert!((result.confidence_adjusted - expected).abs() < 1e-3);
        assert!(result.confidence_adjusted >= raw_percent);
        assert!(result.confidence_adjusted <= 100.0);
    }

    #[test]
    fn negative_review_matches_service_but_not_value() {
        let analyzer = analyzer();
        let result = analyzer
            .analyze(
                "Poor experience. Long delays, unfriendly staff, and overpriced.",
                true,
            )
            .unwrap();

        assert!(result.score <= 2);
        // "staff" matches service; "overpriced" is not a value keyword.
        assert!(result.aspects.contains_key(&Aspect::Service));
        assert!(!result.aspects.contains_key(&Aspect::Value));
        // "poor" is a strong cue and the single aspect is unanimously low.
        let raw_percent = result.confidence_raw * 100.0;
        let expected = (raw_percent * 1.2 * 1.1).min(100.0);
        assert!((result.confidence_adjusted - expected).abs() < 1e-3);
    }

    #[test]
    fn no_keyword_review_yields_empty_aspects() {
        let analyzer = analyzer();
        let result = analyzer
            .analyze("Had a wonderful time overall. Would come back.", true)
            .unwrap();
        assert!(result.aspects.is_empty());
    }

    #[test]
    fn empty_input_yields_well_formed_neutral_result() {
        let analyzer = analyzer();
        let first = analyzer.analyze("", true).unwrap();
        let second = analyzer.analyze("", true).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.score, 3);
        assert_eq!(first.label, SentimentLabel::Neutral);
        assert!(first.aspects.is_empty());
        // No cue tokens and no aspects, so no boost beyond the percent scale.
        assert!((first.confidence_adjusted - first.confidence_raw * 100.0).abs() < 1e-4);
    }

    #[test]
    fn aspects_are_skipped_when_not_requested() {
        let analyzer = analyzer();
        let result = analyzer
            .analyze("The hotel was amazing. The staff were great.", false)
            .unwrap();
        assert!(result.aspects.is_empty());
    }

    #[test]
    fn shared_segment_feeds_every_matched_group_with_one_call() {
        let backend = Arc::new(CountingClassifier {
            calls: AtomicUsize::new(0),
        });
        let analyzer = ReviewAnalyzer::new(stack_with(backend.clone()), AppMetrics::shared());

        let result = analyzer.analyze("The hotel staff were great", true).unwrap();

        let accommodation = result.aspects.get(&Aspect::Accommodation).unwrap();
        let service = result.aspects.get(&Aspect::Service).unwrap();
        assert_eq!(accommodation.average_score, service.average_score);
        // One whole-text call plus exactly one segment call.
        assert_eq!(backend.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn failed_segments_are_excluded_not_fatal() {
        let analyzer = ReviewAnalyzer::new(stack_with(Arc::new(FlakyClassifier)), AppMetrics::shared());

        let result = analyzer
            .analyze("The hotel was fine. The staff were rude.", true)
            .unwrap();

        assert!(result.aspects.contains_key(&Aspect::Accommodation));
        // Every service segment failed, so the group is omitted entirely.
        assert!(!result.aspects.contains_key(&Aspect::Service));
    }

    #[test]
    fn whole_text_failure_is_fatal() {
        let analyzer = ReviewAnalyzer::new(stack_with(Arc::new(BrokenClassifier)), AppMetrics::shared());
        assert!(analyzer.analyze("anything", true).is_err());
    }

    #[test]
    fn batch_entries_fail_independently() {
        let analyzer = ReviewAnalyzer::new(stack_with(Arc::new(FlakyClassifier)), AppMetrics::shared());
        let texts = vec![
            "The staff were rude".to_string(),
            "A lovely quiet town".to_string(),
        ];

        let results = analyzer.analyze_batch(&texts, false);
        assert!(results[0].is_err());
        assert!(results[1].is_ok());
    }
}
