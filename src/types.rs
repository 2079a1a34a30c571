//! Core data model for the current-waveform analysis pipeline.
//!
//! Everything that crosses a module boundary lives here: raw samples,
//! the loaded waveform, preview rows, analysis windows, per-window
//! features, and the final diagnosis record consumed by the display
//! shell.

use serde::{Deserialize, Serialize};

// ============================================================================
// Phases
// ============================================================================

/// One of the three current-sensor channels on a three-phase motor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    R,
    S,
    T,
}

impl Phase {
    /// All phases in canonical R, S, T order.
    pub const ALL: [Phase; 3] = [Phase::R, Phase::S, Phase::T];

    /// Short channel label used in logs and column headers.
    pub fn label(self) -> &'static str {
        match self {
            Phase::R => "R",
            Phase::S => "S",
            Phase::T => "T",
        }
    }
}

// ============================================================================
// Raw Waveform
// ============================================================================

/// One row of the raw waveform: three phase currents at a single time
/// position. The time position is implicit (the sample's index in the
/// owning [`Waveform`]).
///
/// A phase value that failed to parse, or was absent in the source
/// file, is `None`. Downstream RMS computation excludes `None` cells
/// per phase instead of substituting a fabricated zero.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Sample {
    pub phase_r: Option<f64>,
    pub phase_s: Option<f64>,
    pub phase_t: Option<f64>,
}

impl Sample {
    /// Value of the given phase channel.
    pub fn phase(&self, phase: Phase) -> Option<f64> {
        match phase {
            Phase::R => self.phase_r,
            Phase::S => self.phase_s,
            Phase::T => self.phase_t,
        }
    }

    /// True when all three phases carry a numeric value.
    pub fn is_complete(&self) -> bool {
        self.phase_r.is_some() && self.phase_s.is_some() && self.phase_t.is_some()
    }
}

/// An ordered, finite sequence of samples with a declared sampling rate.
///
/// Owned exclusively by the pipeline run that loaded it; it is dropped
/// once preview generation and feature extraction complete.
#[derive(Debug, Clone)]
pub struct Waveform {
    pub samples: Vec<Sample>,
    /// Sampling rate in samples/second.
    pub sampling_rate_hz: f64,
}

impl Waveform {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

// ============================================================================
// Preview
// ============================================================================

/// A down-selected sample retained for display.
///
/// Serialized with the source file's column names so the preview table
/// round-trips into the chart layer unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PreviewRow {
    pub index: usize,
    #[serde(rename = "current_R")]
    pub current_r: Option<f64>,
    #[serde(rename = "current_S")]
    pub current_s: Option<f64>,
    #[serde(rename = "current_T")]
    pub current_t: Option<f64>,
}

impl PreviewRow {
    pub fn from_sample(index: usize, sample: &Sample) -> Self {
        Self {
            index,
            current_r: sample.phase_r,
            current_s: sample.phase_s,
            current_t: sample.phase_t,
        }
    }
}

// ============================================================================
// Analysis Windows
// ============================================================================

/// A half-open index range `[start, end)` into the waveform.
///
/// Windows never cross the waveform boundary: `end <= waveform.len()`
/// always holds. Trailing partial windows are dropped by the
/// partitioner, never zero-padded, because a short window biases RMS
/// low.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    pub start: usize,
    pub end: usize,
}

impl Window {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }

    /// The window's slice of the sample sequence.
    pub fn slice<'a>(&self, samples: &'a [Sample]) -> &'a [Sample] {
        &samples[self.start..self.end]
    }
}

/// Statistical features of exactly one window, immutable once computed.
///
/// `rms_*` are `None` when the window has no numeric cell for that
/// phase. `anomaly_score` is 0 or 1; a window whose imbalance is
/// indeterminate scores 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowFeature {
    pub start: usize,
    pub end: usize,
    pub rms_r: Option<f64>,
    pub rms_s: Option<f64>,
    pub rms_t: Option<f64>,
    /// Maximum relative deviation of the phase RMS values from their
    /// mean, as a percentage. `None` when fewer than two phases have a
    /// usable RMS or the mean RMS is zero.
    pub imbalance: Option<f64>,
    pub anomaly_score: u8,
}

impl WindowFeature {
    /// RMS of the given phase channel.
    pub fn rms(&self, phase: Phase) -> Option<f64> {
        match phase {
            Phase::R => self.rms_r,
            Phase::S => self.rms_s,
            Phase::T => self.rms_t,
        }
    }

    pub fn is_anomalous(&self) -> bool {
        self.anomaly_score == 1
    }
}

// ============================================================================
// Diagnosis
// ============================================================================

/// Overall equipment status.
///
/// This is a closed set: the display layer maps each variant to a
/// fixed label and color, so new variants require a display-contract
/// change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentStatus {
    Normal,
    PossibleFault,
    Dangerous,
    InsufficientData,
}

impl EquipmentStatus {
    /// Fixed human-readable label for the display layer.
    pub fn label(self) -> &'static str {
        match self {
            EquipmentStatus::Normal => "Normal",
            EquipmentStatus::PossibleFault => "Possible fault",
            EquipmentStatus::Dangerous => "Dangerous",
            EquipmentStatus::InsufficientData => "Insufficient data",
        }
    }
}

impl std::fmt::Display for EquipmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// An anomalous window as listed in the diagnosis output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyWindow {
    pub start: usize,
    pub end: usize,
    pub imbalance: Option<f64>,
}

impl From<&WindowFeature> for AnomalyWindow {
    fn from(feature: &WindowFeature) -> Self {
        Self {
            start: feature.start,
            end: feature.end,
            imbalance: feature.imbalance,
        }
    }
}

/// The overall equipment diagnosis: a pure reduction over the window
/// feature sequence.
///
/// `total_samples` counts *windows analyzed*, not raw samples. The
/// name is overloaded but load-bearing in the wire contract and is
/// preserved as-is. `rms_r/s/t` are the representative (first)
/// window's values, absent when no windows were produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnosis {
    pub status: EquipmentStatus,
    /// Percentage of analyzed windows scored anomalous (0 when no
    /// windows were analyzed).
    pub anomaly_ratio: f64,
    /// Count of windows analyzed.
    pub total_samples: usize,
    /// Count of windows scored anomalous.
    pub anomalies: usize,
    #[serde(rename = "anomalyWindows")]
    pub anomaly_windows: Vec<AnomalyWindow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rms_r: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rms_s: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rms_t: Option<f64>,
    /// Human-readable insufficiency reasons, or the upstream error
    /// message when one was reported. `None` when data was sufficient.
    pub note: Option<String>,
    /// False when the diagnosis is an insufficient-data result.
    pub success: bool,
}
