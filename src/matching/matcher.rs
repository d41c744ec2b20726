//! Selects the listing that corresponds to a requested product.

use super::normalize::{TitleNormalizer, DEFAULT_NOISE_TOKENS};
use super::similarity::similarity;
use crate::observer::{ComparisonObserver, NoopObserver};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Default minimum similarity for a fuzzy match.
pub const DEFAULT_THRESHOLD: f64 = 0.65;

/// Words ignored when extracting key words from a target name.
pub const DEFAULT_STOP_WORDS: &[&str] = &["THE", "AND", "FOR", "OF"];

/// Tunable matching parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSettings {
    /// Minimum similarity for a non-exact match; a score equal to it is accepted.
    pub threshold: f64,
    /// Words that never count as key words.
    pub stop_words: Vec<String>,
    /// Noise tokens stripped during normalization.
    pub noise_tokens: Vec<String>,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            stop_words: DEFAULT_STOP_WORDS.iter().map(|w| w.to_string()).collect(),
            noise_tokens: DEFAULT_NOISE_TOKENS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

/// Why no candidate was selected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchRejection {
    #[error("no candidates to match against")]
    NoCandidate,

    #[error("best candidate '{title}' is below the similarity threshold")]
    NoSimilarMatch { title: String },

    #[error("best candidate '{title}' shares no key words with the target")]
    KeywordMismatch { title: String },
}

/// Outcome of matching a target name against candidate titles.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchResult {
    /// A candidate was accepted. `title` is its normalized form.
    Found { title: String, index: usize, similarity: f64 },
    /// No candidate was accepted.
    NotFound { reason: MatchRejection, best_similarity: f64 },
}

impl MatchResult {
    /// Returns true if a candidate was accepted.
    pub fn is_found(&self) -> bool {
        matches!(self, MatchResult::Found { .. })
    }

    /// Index of the accepted candidate.
    pub fn index(&self) -> Option<usize> {
        match self {
            MatchResult::Found { index, .. } => Some(*index),
            MatchResult::NotFound { .. } => None,
        }
    }

    /// Normalized title of the accepted candidate.
    pub fn title(&self) -> Option<&str> {
        match self {
            MatchResult::Found { title, .. } => Some(title),
            MatchResult::NotFound { .. } => None,
        }
    }

    /// Similarity of the accepted candidate, or of the best rejected one.
    pub fn similarity(&self) -> f64 {
        match self {
            MatchResult::Found { similarity, .. } => *similarity,
            MatchResult::NotFound { best_similarity, .. } => *best_similarity,
        }
    }
}

/// Fuzzy title matcher.
#[derive(Clone)]
pub struct Matcher {
    normalizer: TitleNormalizer,
    threshold: f64,
    stop_words: Vec<String>,
    observer: Arc<dyn ComparisonObserver>,
}

impl Matcher {
    /// Creates a matcher from settings.
    pub fn new(settings: &MatchSettings) -> Result<Self, regex_lite::Error> {
        Ok(Self {
            normalizer: TitleNormalizer::new(&settings.noise_tokens)?,
            threshold: settings.threshold,
            stop_words: settings.stop_words.iter().map(|w| w.to_lowercase()).collect(),
            observer: Arc::new(NoopObserver),
        })
    }

    /// Attaches an observer for diagnostics.
    pub fn with_observer(mut self, observer: Arc<dyn ComparisonObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Picks the candidate that corresponds to `target`.
    ///
    /// An exact normalized match returns immediately with similarity 1.0. Otherwise the
    /// highest-scoring candidate (first one on ties) must reach the threshold and contain
    /// at least one key word of the target.
    pub fn find_best_match<S: AsRef<str>>(&self, target: &str, candidates: &[S]) -> MatchResult {
        let normalized_target = self.normalizer.normalize(target);
        self.observer.target_normalized(target, &normalized_target);

        if candidates.is_empty() {
            return self.reject(target, MatchRejection::NoCandidate, 0.0);
        }

        let lowered_target = normalized_target.to_lowercase();
        let mut best: Option<(usize, String, f64)> = None;

        for (idx, candidate) in candidates.iter().enumerate() {
            let title = self.normalizer.normalize(candidate.as_ref().trim());

            if title.to_lowercase() == lowered_target {
                self.observer.match_accepted(target, &title, 1.0);
                return MatchResult::Found { title, index: idx, similarity: 1.0 };
            }

            let score = similarity(&title, &normalized_target);
            self.observer.candidate_scored(&title, &normalized_target, score);

            if best.as_ref().is_none_or(|(_, _, highest)| score > *highest) {
                self.observer.best_candidate(&title, score);
                best = Some((idx, title, score));
            }
        }

        let Some((index, title, score)) = best else {
            return self.reject(target, MatchRejection::NoCandidate, 0.0);
        };

        if score < self.threshold {
            return self.reject(target, MatchRejection::NoSimilarMatch { title }, score);
        }

        let key_words = self.key_words(&normalized_target);
        let lowered_title = title.to_lowercase();
        if !key_words.iter().any(|word| lowered_title.contains(word.as_str())) {
            return self.reject(target, MatchRejection::KeywordMismatch { title }, score);
        }

        self.observer.match_accepted(target, &title, score);
        MatchResult::Found { title, index, similarity: score }
    }

    /// Lower-cased tokens longer than two characters that are not stop words.
    fn key_words(&self, normalized: &str) -> Vec<String> {
        normalized
            .split_whitespace()
            .filter(|word| word.chars().count() > 2)
            .map(str::to_lowercase)
            .filter(|word| !self.stop_words.contains(word))
            .collect()
    }

    fn reject(&self, target: &str, reason: MatchRejection, best_similarity: f64) -> MatchResult {
        self.observer.match_rejected(target, &reason, best_similarity);
        MatchResult::NotFound { reason, best_similarity }
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self {
            normalizer: TitleNormalizer::default(),
            threshold: DEFAULT_THRESHOLD,
            stop_words: DEFAULT_STOP_WORDS.iter().map(|w| w.to_lowercase()).collect(),
            observer: Arc::new(NoopObserver),
        }
    }
}

impl std::fmt::Debug for Matcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Matcher")
            .field("threshold", &self.threshold)
            .field("stop_words", &self.stop_words)
            .finish_non_exhaustive()
    }
}
