//! Pipeline Configuration Module
//!
//! Provides analysis and diagnosis parameters loaded from TOML files,
//! replacing hardcoded thresholds with operator-tunable values.
//!
//! ## Loading Order
//!
//! 1. `PHASEWATCH_CONFIG` environment variable (path to TOML file)
//! 2. `phasewatch.toml` in the current working directory
//! 3. Built-in defaults
//!
//! Configuration is passed explicitly into the pipeline rather than
//! held in a global: concurrent runs over different files must not
//! share state.

pub mod defaults;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

// ============================================================================
// Errors
// ============================================================================

/// Invalid sampling / window / overlap parameters.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid sampling rate: {0} (must be > 0)")]
    InvalidSamplingRate(f64),

    #[error("invalid window length: {0} s (must be > 0)")]
    InvalidWindowSec(f64),

    #[error("invalid overlap: {0} (must be in [0, 1))")]
    InvalidOverlap(f64),

    #[error("invalid imbalance threshold: {0} % (must be >= 0)")]
    InvalidImbalanceThreshold(f64),

    #[error("invalid dangerous-ratio cutoff: {0} % (must be in [0, 100])")]
    InvalidDangerousRatio(f64),

    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

// ============================================================================
// Analysis Configuration
// ============================================================================

/// Parameters for waveform loading, windowing, and preview generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Sampling rate of the input waveform (Hz).
    #[serde(default = "default_sampling_rate")]
    pub sampling_rate_hz: f64,

    /// Analysis window length (seconds).
    #[serde(default = "default_window_sec")]
    pub window_sec: f64,

    /// Fractional overlap between consecutive windows, in `[0, 1)`.
    #[serde(default = "default_overlap")]
    pub overlap: f64,

    /// Maximum rows retained in the display preview.
    #[serde(default = "default_preview_max_rows")]
    pub preview_max_rows: usize,
}

fn default_sampling_rate() -> f64 {
    defaults::SAMPLING_RATE_HZ
}
fn default_window_sec() -> f64 {
    defaults::WINDOW_SEC
}
fn default_overlap() -> f64 {
    defaults::OVERLAP
}
fn default_preview_max_rows() -> usize {
    defaults::PREVIEW_MAX_ROWS
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            sampling_rate_hz: defaults::SAMPLING_RATE_HZ,
            window_sec: defaults::WINDOW_SEC,
            overlap: defaults::OVERLAP,
            preview_max_rows: defaults::PREVIEW_MAX_ROWS,
        }
    }
}

impl AnalysisConfig {
    /// Reject physically impossible parameter combinations.
    ///
    /// An overlap of exactly 1.0 would imply a zero step and a
    /// non-terminating partition, so the valid range is half-open.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.sampling_rate_hz.is_finite() || self.sampling_rate_hz <= 0.0 {
            return Err(ConfigError::InvalidSamplingRate(self.sampling_rate_hz));
        }
        if !self.window_sec.is_finite() || self.window_sec <= 0.0 {
            return Err(ConfigError::InvalidWindowSec(self.window_sec));
        }
        if !self.overlap.is_finite() || self.overlap < 0.0 || self.overlap >= 1.0 {
            return Err(ConfigError::InvalidOverlap(self.overlap));
        }
        Ok(())
    }
}

// ============================================================================
// Diagnosis Configuration
// ============================================================================

/// Thresholds for anomaly scoring and the sufficiency policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosisConfig {
    /// Minimum preview rows for a sufficient dataset.
    #[serde(default = "default_min_preview_rows")]
    pub min_preview_rows: usize,

    /// Minimum analyzed windows for a sufficient dataset.
    #[serde(default = "default_min_windows")]
    pub min_windows: usize,

    /// Imbalance threshold (percent) above which a window is anomalous.
    #[serde(default = "default_imbalance_threshold")]
    pub imbalance_threshold_pct: f64,

    /// Anomaly-ratio cutoff (percent) separating `PossibleFault` from
    /// `Dangerous`.
    #[serde(default = "default_dangerous_ratio")]
    pub dangerous_ratio_pct: f64,
}

fn default_min_preview_rows() -> usize {
    defaults::MIN_PREVIEW_ROWS
}
fn default_min_windows() -> usize {
    defaults::MIN_WINDOWS
}
fn default_imbalance_threshold() -> f64 {
    defaults::IMBALANCE_THRESHOLD_PCT
}
fn default_dangerous_ratio() -> f64 {
    defaults::DANGEROUS_RATIO_PCT
}

impl Default for DiagnosisConfig {
    fn default() -> Self {
        Self {
            min_preview_rows: defaults::MIN_PREVIEW_ROWS,
            min_windows: defaults::MIN_WINDOWS,
            imbalance_threshold_pct: defaults::IMBALANCE_THRESHOLD_PCT,
            dangerous_ratio_pct: defaults::DANGEROUS_RATIO_PCT,
        }
    }
}

impl DiagnosisConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.imbalance_threshold_pct.is_finite() || self.imbalance_threshold_pct < 0.0 {
            return Err(ConfigError::InvalidImbalanceThreshold(
                self.imbalance_threshold_pct,
            ));
        }
        if !self.dangerous_ratio_pct.is_finite()
            || self.dangerous_ratio_pct < 0.0
            || self.dangerous_ratio_pct > 100.0
        {
            return Err(ConfigError::InvalidDangerousRatio(self.dangerous_ratio_pct));
        }
        Ok(())
    }
}

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration: `[analysis]` and `[diagnosis]` TOML tables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub analysis: AnalysisConfig,

    #[serde(default)]
    pub diagnosis: DiagnosisConfig,
}

impl PipelineConfig {
    /// Load configuration using the standard search order:
    /// 1. `$PHASEWATCH_CONFIG` environment variable
    /// 2. `./phasewatch.toml` in the current working directory
    /// 3. Built-in defaults
    pub fn load() -> Self {
        if let Ok(path) = std::env::var("PHASEWATCH_CONFIG") {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded config from PHASEWATCH_CONFIG");
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from PHASEWATCH_CONFIG, falling back");
                    }
                }
            } else {
                warn!(path = %path, "PHASEWATCH_CONFIG points to non-existent file, falling back");
            }
        }

        let local = Path::new("phasewatch.toml");
        if local.exists() {
            match Self::load_from_file(local) {
                Ok(config) => {
                    info!(path = %local.display(), "Loaded config from ./phasewatch.toml");
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./phasewatch.toml, using defaults");
                }
            }
        }

        Self::default()
    }

    /// Load and parse a specific TOML file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&raw).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate both sections.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.analysis.validate()?;
        self.diagnosis.validate()
    }
}
