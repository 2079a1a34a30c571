//! Diagnosis Aggregation Module
//!
//! Deterministic, rule-based reduction of the per-window feature
//! sequence into one overall equipment status. This replaces the
//! opaque model-based classification of earlier tooling with fixed,
//! documented thresholds so identical inputs always produce identical
//! diagnoses.
//!
//! The aggregator is a pure function: it holds no state between
//! invocations and requires the complete feature sequence, since the
//! anomaly ratio and phase-presence flags are global reductions.

use tracing::debug;

use crate::config::DiagnosisConfig;
use crate::types::{AnomalyWindow, Diagnosis, EquipmentStatus, Phase, WindowFeature};

/// Representative-window selection: the feature record whose RMS
/// values are surfaced in the diagnosis.
///
/// Strategy: the first window. A per-file average would smear fault
/// onset, so the report pins the earliest window's levels.
pub fn representative(features: &[WindowFeature]) -> Option<&WindowFeature> {
    features.first()
}

/// True when at least one window carries a usable RMS for the phase.
fn has_phase(features: &[WindowFeature], phase: Phase) -> bool {
    features.iter().any(|f| f.rms(phase).is_some())
}

/// Reduce the scored feature sequence into a [`Diagnosis`].
///
/// Equivalent to [`diagnose_with_error`] with no upstream error.
pub fn diagnose(
    features: &[WindowFeature],
    preview_len: usize,
    config: &DiagnosisConfig,
) -> Diagnosis {
    diagnose_with_error(features, preview_len, config, None)
}

/// Reduce the scored feature sequence into a [`Diagnosis`], letting an
/// upstream error message take precedence in the insufficiency note.
///
/// # Sufficiency Policy
///
/// The dataset is insufficient when any of:
/// - the preview is shorter than `min_preview_rows`,
/// - fewer than `min_windows` windows were analyzed,
/// - no window has usable phase-S data,
/// - no window has usable phase-T data.
///
/// Phase R is never required: it is treated as the always-present
/// reference phase. The asymmetry is inherited behavior, preserved
/// as-is pending product clarification (see DESIGN.md).
///
/// # Status Ladder
///
/// - insufficient           -> `InsufficientData`
/// - zero anomalous windows -> `Normal`
/// - ratio below the dangerous cutoff -> `PossibleFault`
/// - otherwise              -> `Dangerous`
pub fn diagnose_with_error(
    features: &[WindowFeature],
    preview_len: usize,
    config: &DiagnosisConfig,
    upstream_error: Option<&str>,
) -> Diagnosis {
    let window_count = features.len();

    let has_s = has_phase(features, Phase::S);
    let has_t = has_phase(features, Phase::T);

    let preview_short = preview_len < config.min_preview_rows;
    let too_few_windows = window_count < config.min_windows;
    let insufficient = preview_short || too_few_windows || !has_s || !has_t;

    let anomaly_windows: Vec<AnomalyWindow> = features
        .iter()
        .filter(|f| f.is_anomalous())
        .map(AnomalyWindow::from)
        .collect();
    let anomalies = anomaly_windows.len();

    let anomaly_ratio = if window_count == 0 {
        0.0
    } else {
        100.0 * anomalies as f64 / window_count as f64
    };

    let status = if insufficient {
        EquipmentStatus::InsufficientData
    } else if anomalies == 0 {
        EquipmentStatus::Normal
    } else if anomaly_ratio < config.dangerous_ratio_pct {
        EquipmentStatus::PossibleFault
    } else {
        EquipmentStatus::Dangerous
    };

    let note = if insufficient {
        Some(match upstream_error {
            Some(error) => error.to_string(),
            None => {
                let mut reasons: Vec<String> = Vec::new();
                if preview_short {
                    reasons.push(format!(
                        "preview too short ({preview_len} < {} rows)",
                        config.min_preview_rows
                    ));
                }
                if too_few_windows {
                    reasons.push("no windows to analyze".to_string());
                }
                if !has_s || !has_t {
                    reasons.push("phase S/T data missing — only R usable".to_string());
                }
                reasons.join("; ")
            }
        })
    } else {
        None
    };

    let first = representative(features);

    debug!(
        windows = window_count,
        anomalies,
        ratio = anomaly_ratio,
        status = %status,
        "Diagnosis aggregated"
    );

    Diagnosis {
        status,
        anomaly_ratio,
        total_samples: window_count,
        anomalies,
        anomaly_windows,
        rms_r: first.and_then(|f| f.rms_r),
        rms_s: first.and_then(|f| f.rms_s),
        rms_t: first.and_then(|f| f.rms_t),
        note,
        success: !insufficient,
    }
}

/// The `InsufficientData`-shaped diagnosis the boundary layer returns
/// when the run aborted before any features existed.
pub fn failure_diagnosis(error: &str) -> Diagnosis {
    Diagnosis {
        status: EquipmentStatus::InsufficientData,
        anomaly_ratio: 0.0,
        total_samples: 0,
        anomalies: 0,
        anomaly_windows: Vec::new(),
        rms_r: None,
        rms_s: None,
        rms_t: None,
        note: Some(error.to_string()),
        success: false,
    }
}
