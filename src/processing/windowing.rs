//! Window partitioner.
//!
//! Splits the waveform index space into fixed-length, overlapping
//! half-open ranges. The plan is validated once from configuration,
//! then produces windows lazily; re-running the iterator yields the
//! same sequence since it is purely derived from fixed inputs.

use crate::config::{AnalysisConfig, ConfigError};
use crate::types::Window;

/// Validated window geometry: sample length and stride.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowPlan {
    /// Window length in samples, always >= 1.
    pub length: usize,
    /// Stride between window starts in samples, always >= 1.
    pub step: usize,
}

impl WindowPlan {
    /// Build a plan from sampling parameters.
    ///
    /// `length = round(sampling_rate * window_sec)` clamped to >= 1;
    /// `step = round(length * (1 - overlap))` clamped to >= 1. The
    /// step clamp guarantees forward progress even when the overlap
    /// configuration would mathematically imply a zero stride.
    pub fn new(sampling_rate_hz: f64, window_sec: f64, overlap: f64) -> Result<Self, ConfigError> {
        if !sampling_rate_hz.is_finite() || sampling_rate_hz <= 0.0 {
            return Err(ConfigError::InvalidSamplingRate(sampling_rate_hz));
        }
        if !window_sec.is_finite() || window_sec <= 0.0 {
            return Err(ConfigError::InvalidWindowSec(window_sec));
        }
        if !overlap.is_finite() || overlap < 0.0 || overlap >= 1.0 {
            return Err(ConfigError::InvalidOverlap(overlap));
        }

        let length = ((sampling_rate_hz * window_sec).round() as usize).max(1);
        let step = ((length as f64 * (1.0 - overlap)).round() as usize).max(1);

        Ok(Self { length, step })
    }

    pub fn from_config(config: &AnalysisConfig) -> Result<Self, ConfigError> {
        Self::new(config.sampling_rate_hz, config.window_sec, config.overlap)
    }

    /// Iterate the windows that fit entirely inside a waveform of
    /// `waveform_len` samples.
    ///
    /// A trailing range shorter than the configured length is dropped,
    /// never zero-padded: a partial window biases RMS low.
    pub fn windows(&self, waveform_len: usize) -> Windows {
        Windows {
            next_start: 0,
            length: self.length,
            step: self.step,
            waveform_len,
        }
    }

    /// Number of windows the plan yields for a given waveform length.
    pub fn window_count(&self, waveform_len: usize) -> usize {
        if waveform_len < self.length {
            0
        } else {
            (waveform_len - self.length) / self.step + 1
        }
    }
}

/// Lazy window iterator produced by [`WindowPlan::windows`].
#[derive(Debug, Clone)]
pub struct Windows {
    next_start: usize,
    length: usize,
    step: usize,
    waveform_len: usize,
}

impl Iterator for Windows {
    type Item = Window;

    fn next(&mut self) -> Option<Window> {
        let start = self.next_start;
        let end = start.checked_add(self.length)?;
        if end > self.waveform_len {
            return None;
        }
        self.next_start = start.checked_add(self.step)?;
        Some(Window { start, end })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_fit_yields_single_window() {
        // 10 000 samples at 10 kHz, 1 s windows, 50% overlap:
        // length 10 000, step 5 000, exactly one window.
        let plan = WindowPlan::new(10_000.0, 1.0, 0.5).unwrap();
        assert_eq!(plan.length, 10_000);
        assert_eq!(plan.step, 5_000);

        let windows: Vec<_> = plan.windows(10_000).collect();
        assert_eq!(windows, vec![Window { start: 0, end: 10_000 }]);
        assert_eq!(plan.window_count(10_000), 1);
    }

    #[test]
    fn trailing_partial_window_is_dropped() {
        // 14 000 samples: [5000, 15000) would overrun and is not emitted.
        let plan = WindowPlan::new(10_000.0, 1.0, 0.5).unwrap();
        let windows: Vec<_> = plan.windows(14_000).collect();
        assert_eq!(windows, vec![Window { start: 0, end: 10_000 }]);
    }

    #[test]
    fn overlapping_windows_advance_by_step() {
        let plan = WindowPlan::new(10.0, 1.0, 0.5).unwrap();
        let windows: Vec<_> = plan.windows(25).collect();
        assert_eq!(
            windows,
            vec![
                Window { start: 0, end: 10 },
                Window { start: 5, end: 15 },
                Window { start: 10, end: 20 },
                Window { start: 15, end: 25 },
            ]
        );
        assert_eq!(plan.window_count(25), 4);
    }

    #[test]
    fn step_is_clamped_to_one() {
        // 0.999 overlap on a 10-sample window rounds to step 0; the
        // clamp keeps the iterator terminating.
        let plan = WindowPlan::new(10.0, 1.0, 0.999).unwrap();
        assert_eq!(plan.step, 1);
        assert_eq!(plan.windows(12).count(), 3);
    }

    #[test]
    fn length_is_clamped_to_one() {
        let plan = WindowPlan::new(1.0, 0.1, 0.0).unwrap();
        assert_eq!(plan.length, 1);
    }

    #[test]
    fn empty_waveform_yields_no_windows() {
        let plan = WindowPlan::new(10_000.0, 1.0, 0.5).unwrap();
        assert_eq!(plan.windows(0).count(), 0);
        assert_eq!(plan.window_count(0), 0);
    }

    #[test]
    fn invalid_parameters_are_config_errors() {
        assert!(matches!(
            WindowPlan::new(0.0, 1.0, 0.5),
            Err(ConfigError::InvalidSamplingRate(_))
        ));
        assert!(matches!(
            WindowPlan::new(10_000.0, 0.0, 0.5),
            Err(ConfigError::InvalidWindowSec(_))
        ));
        assert!(matches!(
            WindowPlan::new(10_000.0, 1.0, 1.0),
            Err(ConfigError::InvalidOverlap(_))
        ));
        assert!(matches!(
            WindowPlan::new(10_000.0, 1.0, -0.1),
            Err(ConfigError::InvalidOverlap(_))
        ));
    }

    #[test]
    fn restart_yields_identical_sequence() {
        let plan = WindowPlan::new(100.0, 1.0, 0.25).unwrap();
        let first: Vec<_> = plan.windows(1_000).collect();
        let second: Vec<_> = plan.windows(1_000).collect();
        assert_eq!(first, second);
    }
}
