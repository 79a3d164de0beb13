mod detect;
mod lexicon;

#[cfg(feature = "burn-ml")]
mod burn_impl;

use std::env;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use once_cell::sync::OnceCell;
use thiserror::Error;
use unicode_segmentation::UnicodeSegmentation;

pub use detect::{LanguagePrediction, ScriptLanguageDetector};
pub use lexicon::LexiconReviewClassifier;

/// Upper bound on text submitted to a classifier backend. Longer reviews
/// are truncated before submission, never rejected.
pub const MAX_INPUT_GRAPHEMES: usize = 2_048;

#[derive(Debug, Error)]
pub enum ClassificationError {
    #[error("classifier backend failed: {0}")]
    Backend(String),
    #[error("classifier timed out after {0:?}")]
    Timeout(Duration),
    #[error("classifier backend is unavailable")]
    Unavailable,
}

/// Ordinal sentiment classification with its full class distribution.
/// `score` is 1 + the argmax of `probabilities`.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub score: u8,
    pub probabilities: [f32; 5],
}

impl Classification {
    pub fn from_probabilities(probabilities: [f32; 5]) -> Self {
        let mut best = 0usize;
        for (idx, p) in probabilities.iter().enumerate() {
            if *p > probabilities[best] {
                best = idx;
            }
        }

        Self {
            score: (best + 1) as u8,
            probabilities,
        }
    }

    /// Probability mass on the chosen class.
    pub fn confidence(&self) -> f32 {
        self.probabilities[(self.score - 1) as usize]
    }
}

pub trait ReviewClassifier: Send + Sync {
    fn model_name(&self) -> &'static str;
    fn classify(&self, text: &str) -> Result<Classification, ClassificationError>;
}

pub trait LanguageDetector: Send + Sync {
    fn detect(&self, text: &str) -> LanguagePrediction;
}

/// Boundary wrapper around a classifier backend: enforces the input length
/// limit and an optional per-call timeout so a slow backend surfaces a
/// [`ClassificationError::Timeout`] instead of blocking the caller.
#[derive(Clone)]
pub struct ClassifierAdapter {
    backend: Arc<dyn ReviewClassifier>,
    timeout: Option<Duration>,
}

impl ClassifierAdapter {
    pub fn new(backend: Arc<dyn ReviewClassifier>, timeout: Option<Duration>) -> Self {
        Self { backend, timeout }
    }

    pub fn model_name(&self) -> &'static str {
        self.backend.model_name()
    }

    pub fn classify(&self, text: &str) -> Result<Classification, ClassificationError> {
        let text = truncate_input(text);

        let Some(limit) = self.timeout else {
            return self.backend.classify(text);
        };

        let backend = Arc::clone(&self.backend);
        let owned = text.to_string();
        let (sender, receiver) = mpsc::channel();
        thread::spawn(move || {
            let _ = sender.send(backend.classify(&owned));
        });

        match receiver.recv_timeout(limit) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => Err(ClassificationError::Timeout(limit)),
            Err(RecvTimeoutError::Disconnected) => Err(ClassificationError::Unavailable),
        }
    }
}

fn truncate_input(text: &str) -> &str {
    match text.grapheme_indices(true).nth(MAX_INPUT_GRAPHEMES) {
        Some((offset, _)) => &text[..offset],
        None => text,
    }
}

/// The process-wide model stack injected into the analysis facade.
#[derive(Clone)]
pub struct ReviewMlStack {
    pub classifier: ClassifierAdapter,
    pub detector: Arc<dyn LanguageDetector>,
    pub burn_enabled: bool,
}

impl ReviewMlStack {
    pub fn load_default() -> Self {
        let timeout = env::var("BUDDY_CLASSIFIER_TIMEOUT_MS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .map(Duration::from_millis);

        #[cfg(feature = "burn-ml")]
        {
            return Self {
                classifier: ClassifierAdapter::new(
                    Arc::new(burn_impl::BurnLexiconClassifier::new()),
                    timeout,
                ),
                detector: Arc::new(ScriptLanguageDetector),
                burn_enabled: true,
            };
        }

        #[cfg(not(feature = "burn-ml"))]
        {
            Self {
                classifier: ClassifierAdapter::new(
                    Arc::new(LexiconReviewClassifier::new()),
                    timeout,
                ),
                detector: Arc::new(ScriptLanguageDetector),
                burn_enabled: false,
            }
        }
    }

    /// Lazily initialized shared stack; first use races from multiple
    /// threads serialize so the backing model is constructed exactly once
    /// per process.
    pub fn shared() -> &'static ReviewMlStack {
        static STACK: OnceCell<ReviewMlStack> = OnceCell::new();
        STACK.get_or_init(Self::load_default)
    }
}
