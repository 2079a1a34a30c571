//! Phasewatch: Three-Phase Motor Current Diagnostics
//!
//! Windowed signal-feature and anomaly-detection pipeline for
//! three-phase motor current recordings.
//!
//! ## Architecture
//!
//! - **Acquisition**: CSV waveform loading with per-cell null retention
//! - **Processing**: preview downsampling, overlapping window
//!   partitioning, per-window RMS/imbalance features, threshold
//!   anomaly scoring
//! - **Diagnosis**: rule-based aggregation into one of four equipment
//!   statuses with a defined insufficiency policy
//! - **Report**: artifact emission and the result envelope for the
//!   GUI shell

pub mod acquisition;
pub mod config;
pub mod diagnosis;
pub mod pipeline;
pub mod processing;
pub mod report;
pub mod types;

// Re-export configuration
pub use config::{AnalysisConfig, ConfigError, DiagnosisConfig, PipelineConfig};

// Re-export commonly used types
pub use types::{
    AnomalyWindow, Diagnosis, EquipmentStatus, Phase, PreviewRow, Sample, Waveform, Window,
    WindowFeature,
};

// Re-export the pipeline surface
pub use pipeline::{
    analyze, analyze_and_diagnose, analyze_with_scorer, diagnose, diagnose_with_error, Analysis,
    AnalysisError,
};

// Re-export acquisition
pub use acquisition::{load_waveform, ParseError};

// Re-export processing building blocks
pub use processing::{AnomalyScorer, ComputeError, ImbalanceThresholdScorer, WindowPlan};

// Re-export the file boundary
pub use report::{run_file, AnalysisReport, ProcessError, RunOutcome};
