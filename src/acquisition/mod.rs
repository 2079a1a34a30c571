//! Waveform acquisition module
//!
//! Parses delimited text of three-phase current samples into the
//! in-memory [`Waveform`](crate::types::Waveform) table.

mod csv_loader;

pub use csv_loader::{load_waveform, LoadSummary};

use thiserror::Error;

/// Malformed or empty input file.
///
/// Only structural problems abort a load. Individual unparseable phase
/// values are retained as `None` in the affected sample and flow
/// through to the aggregator's insufficiency logic.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("input file is empty")]
    EmptyInput,

    #[error("first line looks like numeric data; expected a header row")]
    NoHeader,

    #[error("header does not name the required phase columns (missing {missing})")]
    MissingPhaseColumns { missing: String },

    #[error("no data row has numeric values for all three phases ({rows} rows read)")]
    NoNumericRows { rows: usize },
}
