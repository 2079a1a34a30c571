//! Signal processing module - windowing, per-window features, scoring

mod features;
mod preview;
mod scoring;
mod windowing;

pub use features::{extract_features, imbalance_pct, phase_rms, window_feature};
pub use preview::preview;
pub use scoring::{apply_scores, AnomalyScorer, ImbalanceThresholdScorer};
pub use windowing::{WindowPlan, Windows};

use thiserror::Error;

/// Unexpected numeric failure in feature computation.
///
/// The loader only admits finite cells, so this is reachable only
/// through intermediate overflow (e.g. squaring an extreme current
/// value). It is kept distinct from the data-level `None` paths, which
/// are not errors.
#[derive(Error, Debug)]
pub enum ComputeError {
    #[error("non-finite {quantity} computed for window [{start}, {end})")]
    NonFinite {
        quantity: &'static str,
        start: usize,
        end: usize,
    },
}
