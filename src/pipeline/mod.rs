//! Analysis Pipeline Module
//!
//! ## Pipeline Stages
//!
//! ```text
//! STAGE 1: Waveform load (CSV text -> Sample table)
//! STAGE 2: Preview downsample (bounded display table)
//! STAGE 3: Window partition (overlapping half-open ranges)
//! STAGE 4: Feature extraction (RMS per phase, imbalance; parallel)
//! STAGE 5: Anomaly scoring (pure per-window thresholding)
//! STAGE 6: Diagnosis aggregation (global reduction)
//! ```
//!
//! Stages 1-5 make up [`analyze`]; stage 6 is [`diagnose`]. The whole
//! pipeline is a synchronous, side-effect-free transformation: each
//! run owns its waveform and feature sequence exclusively, so
//! concurrent runs over different files share nothing.

use thiserror::Error;
use tracing::info;

use crate::acquisition::{load_waveform, ParseError};
use crate::config::{AnalysisConfig, ConfigError, PipelineConfig};
use crate::diagnosis;
use crate::processing::{
    apply_scores, extract_features, preview, AnomalyScorer, ComputeError,
    ImbalanceThresholdScorer, WindowPlan,
};
use crate::types::{Diagnosis, PreviewRow, WindowFeature};

pub use crate::diagnosis::{diagnose, diagnose_with_error, failure_diagnosis};

// ============================================================================
// Errors
// ============================================================================

/// A failure that aborts an analysis run.
///
/// Only malformed input and invalid configuration abort; data-level
/// edge cases (missing phases, empty waveform, indeterminate
/// imbalance) flow through to the aggregator's insufficiency logic
/// instead.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("compute error: {0}")]
    Compute(#[from] ComputeError),
}

// ============================================================================
// Analysis
// ============================================================================

/// The two artifacts the pipeline exposes to the shell: the display
/// preview and the scored window features.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub preview: Vec<PreviewRow>,
    pub features: Vec<WindowFeature>,
}

/// Run stages 1-5 with the default imbalance-threshold scorer.
pub fn analyze(raw_text: &str, config: &AnalysisConfig) -> Result<Analysis, AnalysisError> {
    analyze_with_scorer(raw_text, config, &ImbalanceThresholdScorer::default())
}

/// Run stages 1-5 with a caller-supplied scorer implementation.
///
/// Alternative backends (such as a remote scoring service) substitute
/// here; everything upstream of scoring is unchanged.
pub fn analyze_with_scorer(
    raw_text: &str,
    config: &AnalysisConfig,
    scorer: &dyn AnomalyScorer,
) -> Result<Analysis, AnalysisError> {
    config.validate()?;
    let plan = WindowPlan::from_config(config)?;

    let waveform = load_waveform(raw_text, config.sampling_rate_hz)?;

    let preview_rows = preview(&waveform, config.preview_max_rows);

    let mut features = extract_features(&waveform, &plan)?;
    apply_scores(&mut features, scorer);

    info!(
        samples = waveform.len(),
        preview_rows = preview_rows.len(),
        windows = features.len(),
        window_len = plan.length,
        step = plan.step,
        "Analysis complete"
    );

    // The waveform is dropped here: nothing downstream of the preview
    // and feature sequence needs the raw samples.
    Ok(Analysis {
        preview: preview_rows,
        features,
    })
}

/// Run the full pipeline: analyze, then aggregate the diagnosis.
///
/// The scorer threshold comes from the diagnosis section of the
/// config, so a single `PipelineConfig` fully determines the result.
pub fn analyze_and_diagnose(
    raw_text: &str,
    config: &PipelineConfig,
) -> Result<(Analysis, Diagnosis), AnalysisError> {
    config.diagnosis.validate()?;
    let scorer = ImbalanceThresholdScorer::new(config.diagnosis.imbalance_threshold_pct);
    let analysis = analyze_with_scorer(raw_text, &config.analysis, &scorer)?;
    let diagnosis = diagnosis::diagnose(&analysis.features, analysis.preview.len(), &config.diagnosis);
    Ok((analysis, diagnosis))
}
