//! System-wide default constants.
//!
//! Centralises magic numbers that were previously scattered across the
//! analysis and aggregation code. Grouped by subsystem for easy
//! discovery.

// ============================================================================
// Acquisition
// ============================================================================

/// Default waveform sampling rate (samples/second).
pub const SAMPLING_RATE_HZ: f64 = 10_000.0;

// ============================================================================
// Windowing
// ============================================================================

/// Default analysis window length (seconds).
pub const WINDOW_SEC: f64 = 1.0;

/// Default fractional overlap between consecutive windows.
///
/// 0.5 means each window shares half its samples with the previous one.
pub const OVERLAP: f64 = 0.5;

// ============================================================================
// Preview
// ============================================================================

/// Maximum number of rows retained in the display preview.
pub const PREVIEW_MAX_ROWS: usize = 5_000;

// ============================================================================
// Anomaly Scoring
// ============================================================================

/// Phase-imbalance threshold (percent) above which a window is scored
/// anomalous.
///
/// 10% is the customary alarm level for the max-deviation-from-mean
/// current unbalance metric on three-phase machines.
pub const IMBALANCE_THRESHOLD_PCT: f64 = 10.0;

// ============================================================================
// Diagnosis
// ============================================================================

/// Minimum preview rows required for a sufficient dataset.
pub const MIN_PREVIEW_ROWS: usize = 100;

/// Minimum analyzed windows required for a sufficient dataset.
pub const MIN_WINDOWS: usize = 1;

/// Anomaly-ratio cutoff (percent) separating `PossibleFault` from
/// `Dangerous`.
pub const DANGEROUS_RATIO_PCT: f64 = 5.0;
