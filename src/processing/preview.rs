//! Preview downsampler.
//!
//! Produces the bounded-size table the chart layer renders: the first
//! `min(cap, len)` samples in original order. No interpolation, no
//! statistical subsampling.

use crate::types::{PreviewRow, Waveform};

/// Down-select the waveform for display. Pure; an empty waveform
/// yields an empty preview, not an error.
pub fn preview(waveform: &Waveform, max_rows: usize) -> Vec<PreviewRow> {
    waveform
        .samples
        .iter()
        .take(max_rows)
        .enumerate()
        .map(|(index, sample)| PreviewRow::from_sample(index, sample))
        .collect()
}
