//! Anomaly scoring.
//!
//! A window is scored from its own features alone, with no
//! cross-window state, so any scorer implementation is a pure
//! function. Alternative backends (e.g. a remote scoring service)
//! plug in behind [`AnomalyScorer`] and must honor the same contract.

use crate::config::defaults;
use crate::types::WindowFeature;

/// Scores one window's features as anomalous (1) or normal (0).
pub trait AnomalyScorer: Send + Sync {
    /// Score a single window. Must depend only on `feature`.
    fn score(&self, feature: &WindowFeature) -> u8;

    /// Human-readable name for logging (e.g. "imbalance-threshold").
    fn scorer_name(&self) -> &str;
}

/// Default scorer: thresholding on the phase imbalance.
///
/// A window with `imbalance == None` scores 0: indeterminate
/// imbalance is treated as normal, not anomalous. A file with a dead
/// channel surfaces through the sufficiency policy rather than as a
/// fault storm.
#[derive(Debug, Clone, Copy)]
pub struct ImbalanceThresholdScorer {
    threshold_pct: f64,
}

impl ImbalanceThresholdScorer {
    pub fn new(threshold_pct: f64) -> Self {
        Self { threshold_pct }
    }

    pub fn threshold_pct(&self) -> f64 {
        self.threshold_pct
    }
}

impl Default for ImbalanceThresholdScorer {
    fn default() -> Self {
        Self::new(defaults::IMBALANCE_THRESHOLD_PCT)
    }
}

impl AnomalyScorer for ImbalanceThresholdScorer {
    fn score(&self, feature: &WindowFeature) -> u8 {
        match feature.imbalance {
            Some(imbalance) if imbalance > self.threshold_pct => 1,
            _ => 0,
        }
    }

    fn scorer_name(&self) -> &str {
        "imbalance-threshold"
    }
}

/// Run the scorer over the feature sequence in place.
pub fn apply_scores(features: &mut [WindowFeature], scorer: &dyn AnomalyScorer) {
    for feature in features.iter_mut() {
        feature.anomaly_score = scorer.score(feature);
    }

    let anomalies = features.iter().filter(|f| f.is_anomalous()).count();
    tracing::debug!(
        scorer = scorer.scorer_name(),
        windows = features.len(),
        anomalies,
        "Scoring pass complete"
    );
}
