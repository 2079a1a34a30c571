//! Per-window statistical features.
//!
//! RMS per phase and the percentage phase imbalance. Every function
//! here is pure and operates on one window's slice, so extraction over
//! the full window sequence parallelizes without shared state.

use rayon::prelude::*;

use super::windowing::WindowPlan;
use super::ComputeError;
use crate::types::{Phase, Sample, Waveform, Window, WindowFeature};

/// RMS of one phase over a window slice: `sqrt(mean(x^2))` across the
/// non-null cells for that phase.
///
/// Returns `None` when the window has no numeric cell for the phase;
/// an absent channel is never reported as a zero-amperage one.
pub fn phase_rms(samples: &[Sample], phase: Phase) -> Option<f64> {
    let mut sum_squares = 0.0_f64;
    let mut count = 0_usize;

    for sample in samples {
        if let Some(value) = sample.phase(phase) {
            sum_squares += value * value;
            count += 1;
        }
    }

    if count == 0 {
        None
    } else {
        Some((sum_squares / count as f64).sqrt())
    }
}

/// Percentage imbalance: maximum deviation of the usable phase RMS
/// values from their mean, relative to that mean.
///
/// `None` when fewer than two phases have a usable RMS (no spread to
/// measure) or when the mean RMS is zero (the ratio is undefined, not
/// infinite).
pub fn imbalance_pct(rms: [Option<f64>; 3]) -> Option<f64> {
    let usable: Vec<f64> = rms.iter().filter_map(|r| *r).collect();
    if usable.len() < 2 {
        return None;
    }

    let mean = usable.iter().sum::<f64>() / usable.len() as f64;
    if mean == 0.0 {
        return None;
    }

    let max_deviation = usable
        .iter()
        .map(|r| (r - mean).abs())
        .fold(0.0_f64, f64::max);

    Some(100.0 * max_deviation / mean)
}

/// Compute the feature record for one window.
///
/// `anomaly_score` is left at 0; scoring is a separate pass (see
/// [`apply_scores`](super::apply_scores)) so alternative scorer
/// implementations can consume identical features.
pub fn window_feature(samples: &[Sample], window: Window) -> Result<WindowFeature, ComputeError> {
    let slice = window.slice(samples);

    let rms_r = phase_rms(slice, Phase::R);
    let rms_s = phase_rms(slice, Phase::S);
    let rms_t = phase_rms(slice, Phase::T);

    for (quantity, rms) in [("rms_r", rms_r), ("rms_s", rms_s), ("rms_t", rms_t)] {
        if rms.is_some_and(|v| !v.is_finite()) {
            return Err(ComputeError::NonFinite {
                quantity,
                start: window.start,
                end: window.end,
            });
        }
    }

    let imbalance = imbalance_pct([rms_r, rms_s, rms_t]);

    Ok(WindowFeature {
        start: window.start,
        end: window.end,
        rms_r,
        rms_s,
        rms_t,
        imbalance,
        anomaly_score: 0,
    })
}

/// Extract features for every window of the waveform.
///
/// Windows are independent, so the map runs on the rayon pool; output
/// order matches window order.
pub fn extract_features(
    waveform: &Waveform,
    plan: &WindowPlan,
) -> Result<Vec<WindowFeature>, ComputeError> {
    let windows: Vec<Window> = plan.windows(waveform.len()).collect();

    windows
        .par_iter()
        .map(|window| window_feature(&waveform.samples, *window))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(r: f64, s: f64, t: f64) -> Sample {
        Sample {
            phase_r: Some(r),
            phase_s: Some(s),
            phase_t: Some(t),
        }
    }

    #[test]
    fn rms_of_constant_signal_is_the_constant() {
        let samples = vec![sample(2.0, -2.0, 2.0); 8];
        assert!((phase_rms(&samples, Phase::R).unwrap() - 2.0).abs() < 1e-12);
        // RMS is sign-insensitive
        assert!((phase_rms(&samples, Phase::S).unwrap() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn rms_excludes_null_cells_per_phase() {
        let samples = vec![
            Sample {
                phase_r: Some(3.0),
                phase_s: None,
                phase_t: Some(4.0),
            },
            Sample {
                phase_r: Some(3.0),
                phase_s: None,
                phase_t: Some(4.0),
            },
        ];
        assert!((phase_rms(&samples, Phase::R).unwrap() - 3.0).abs() < 1e-12);
        assert_eq!(phase_rms(&samples, Phase::S), None);
        assert!((phase_rms(&samples, Phase::T).unwrap() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn imbalance_of_equal_phases_is_zero() {
        let imbalance = imbalance_pct([Some(5.0), Some(5.0), Some(5.0)]).unwrap();
        assert!(imbalance.abs() < 1e-12);
    }

    #[test]
    fn imbalance_matches_max_deviation_formula() {
        // mean = 10, max deviation = 2 (phase T at 12) -> 20%
        let imbalance = imbalance_pct([Some(9.0), Some(9.0), Some(12.0)]).unwrap();
        assert!((imbalance - 20.0).abs() < 1e-9);
    }

    #[test]
    fn imbalance_from_two_phases_when_one_is_null() {
        // mean of {8, 12} = 10, max deviation 2 -> 20%
        let imbalance = imbalance_pct([Some(8.0), None, Some(12.0)]).unwrap();
        assert!((imbalance - 20.0).abs() < 1e-9);
    }

    #[test]
    fn imbalance_is_null_with_fewer_than_two_phases() {
        assert_eq!(imbalance_pct([Some(5.0), None, None]), None);
        assert_eq!(imbalance_pct([None, None, None]), None);
    }

    #[test]
    fn imbalance_is_null_at_zero_mean() {
        assert_eq!(imbalance_pct([Some(0.0), Some(0.0), Some(0.0)]), None);
    }

    #[test]
    fn feature_carries_window_bounds_and_zero_score() {
        let samples = vec![sample(1.0, 1.0, 1.0); 10];
        let feature = window_feature(&samples, Window { start: 2, end: 8 }).unwrap();
        assert_eq!((feature.start, feature.end), (2, 8));
        assert_eq!(feature.anomaly_score, 0);
        assert!(feature.imbalance.unwrap().abs() < 1e-12);
    }

    #[test]
    fn extreme_values_surface_as_compute_error() {
        // Squaring 1e200 overflows to infinity.
        let samples = vec![sample(1e200, 1.0, 1.0); 4];
        let result = window_feature(&samples, Window { start: 0, end: 4 });
        assert!(matches!(
            result,
            Err(ComputeError::NonFinite { quantity: "rms_r", .. })
        ));
    }

    #[test]
    fn extraction_preserves_window_order() {
        let waveform = Waveform {
            samples: (0..40).map(|i| sample(i as f64, 1.0, 1.0)).collect(),
            sampling_rate_hz: 10.0,
        };
        let plan = WindowPlan::new(10.0, 1.0, 0.5).unwrap();
        let features = extract_features(&waveform, &plan).unwrap();
        assert_eq!(features.len(), 7);
        let starts: Vec<_> = features.iter().map(|f| f.start).collect();
        assert_eq!(starts, vec![0, 5, 10, 15, 20, 25, 30]);
    }
}
