//! Hooks for watching the matching and pricing pipeline.
//!
//! The pipeline itself never logs. Callers inject an observer to collect diagnostics;
//! [`TracingObserver`] forwards everything to `tracing`.

use crate::matching::MatchRejection;
use crate::steam::Region;
use tracing::{debug, info, warn};

/// Receives events from the matcher and comparator. Every method defaults to a no-op.
pub trait ComparisonObserver: Send + Sync {
    /// The search target after normalization.
    fn target_normalized(&self, _target: &str, _normalized: &str) {}

    /// A candidate was normalized and scored against the target.
    fn candidate_scored(&self, _normalized: &str, _target: &str, _similarity: f64) {}

    /// A candidate overtook the previous best.
    fn best_candidate(&self, _normalized: &str, _similarity: f64) {}

    /// A match was accepted.
    fn match_accepted(&self, _target: &str, _title: &str, _similarity: f64) {}

    /// No candidate was accepted.
    fn match_rejected(&self, _target: &str, _reason: &MatchRejection, _best_similarity: f64) {}

    /// Raw price tiers were taken from a matched listing.
    fn prices_extracted(&self, _title: &str, _standard: &str, _discount: &str) {}

    /// The home region had no match, so the product produces no record.
    fn product_skipped(&self, _product: &str, _region: Region) {}
}

/// Observer that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ComparisonObserver for NoopObserver {}

/// Observer that reports events through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ComparisonObserver for TracingObserver {
    fn target_normalized(&self, target: &str, normalized: &str) {
        debug!("Normalized search name '{}' -> '{}'", target, normalized);
    }

    fn candidate_scored(&self, normalized: &str, target: &str, similarity: f64) {
        debug!("Comparing '{}' with '{}' - similarity {:.4}", normalized, target, similarity);
    }

    fn best_candidate(&self, normalized: &str, similarity: f64) {
        debug!("New best match '{}' with similarity {:.4}", normalized, similarity);
    }

    fn match_accepted(&self, target: &str, title: &str, similarity: f64) {
        info!("Final match for '{}': '{}' with similarity {:.4}", target, title, similarity);
    }

    fn match_rejected(&self, target: &str, reason: &MatchRejection, best_similarity: f64) {
        warn!("No match for '{}': {} (best similarity {:.4})", target, reason, best_similarity);
    }

    fn prices_extracted(&self, title: &str, standard: &str, discount: &str) {
        info!("Extracted prices for '{}': standard={}, discount={}", title, standard, discount);
    }

    fn product_skipped(&self, product: &str, region: Region) {
        warn!("'{}' not found in {} region, skipping", product, region.name());
    }
}
