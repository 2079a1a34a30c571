//! CSV waveform loader.
//!
//! Reads a header row, maps the three phase-current columns by name
//! (several accepted spellings per phase), then parses each data row
//! into a [`Sample`]. A cell that is empty or non-numeric becomes
//! `None` for that phase only; the row is kept.

use super::ParseError;
use crate::types::{Phase, Sample, Waveform};

// ============================================================================
// CSV Quote-Aware Parsing
// ============================================================================

/// Split a CSV line respecting quoted fields (handles commas inside quotes).
/// Returns owned strings because quoted fields need unquoting.
fn csv_split(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes {
                    // Check for escaped quote ("")
                    if chars.peek() == Some(&'"') {
                        current.push('"');
                        chars.next();
                    } else {
                        in_quotes = false;
                    }
                } else {
                    in_quotes = true;
                }
            }
            ',' if !in_quotes => {
                fields.push(current.clone());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    fields.push(current);
    fields
}

// ============================================================================
// Column Mapping
// ============================================================================

/// Accepted header spellings per phase, lowercase.
fn phase_aliases(phase: Phase) -> &'static [&'static str] {
    match phase {
        Phase::R => &["current_r", "phase_r", "i_r", "ir", "r"],
        Phase::S => &["current_s", "phase_s", "i_s", "is", "s"],
        Phase::T => &["current_t", "phase_t", "i_t", "it", "t"],
    }
}

/// Maps header column names to indices for the three phase channels.
#[derive(Debug, Clone, Copy, Default)]
struct ColumnMap {
    r: Option<usize>,
    s: Option<usize>,
    t: Option<usize>,
}

impl ColumnMap {
    fn from_header(header: &str) -> Self {
        let mut map = Self::default();
        let columns = csv_split(header);

        for (idx, col) in columns.iter().enumerate() {
            let col_lower = col.trim().to_lowercase();
            for phase in Phase::ALL {
                let slot = map.slot_mut(phase);
                if slot.is_none() && phase_aliases(phase).contains(&col_lower.as_str()) {
                    *slot = Some(idx);
                }
            }
        }
        map
    }

    fn slot_mut(&mut self, phase: Phase) -> &mut Option<usize> {
        match phase {
            Phase::R => &mut self.r,
            Phase::S => &mut self.s,
            Phase::T => &mut self.t,
        }
    }

    fn index(&self, phase: Phase) -> Option<usize> {
        match phase {
            Phase::R => self.r,
            Phase::S => self.s,
            Phase::T => self.t,
        }
    }

    fn is_complete(&self) -> bool {
        self.r.is_some() && self.s.is_some() && self.t.is_some()
    }

    /// Labels of the phases the header failed to name, e.g. "S, T".
    fn missing(&self) -> String {
        Phase::ALL
            .iter()
            .filter(|p| self.index(**p).is_none())
            .map(|p| p.label())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// True when every field of the line parses as a number: the line is
/// data, not a header.
fn looks_numeric(line: &str) -> bool {
    let fields = csv_split(line);
    !fields.is_empty()
        && fields
            .iter()
            .all(|f| f.trim().parse::<f64>().is_ok() && !f.trim().is_empty())
}

// ============================================================================
// Row Parsing
// ============================================================================

/// Parse one cell into an optional finite value.
///
/// Empty cells, non-numeric text, and non-finite parses ("NaN", "inf")
/// all load as `None` so RMS never sees a fabricated value.
fn parse_cell(fields: &[String], index: Option<usize>) -> Option<f64> {
    let raw = fields.get(index?)?.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_row(line: &str, map: &ColumnMap) -> Sample {
    let fields = csv_split(line);
    Sample {
        phase_r: parse_cell(&fields, map.r),
        phase_s: parse_cell(&fields, map.s),
        phase_t: parse_cell(&fields, map.t),
    }
}

// ============================================================================
// Loader
// ============================================================================

/// Per-load row accounting, used for logging and diagnostics.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoadSummary {
    /// Rows parsed into samples (including partially-null rows).
    pub rows: usize,
    /// Rows where all three phases carried a numeric value.
    pub complete_rows: usize,
}

/// Parse raw delimited text into a [`Waveform`].
///
/// Structural failures (empty input, missing header, no fully numeric
/// row) abort with [`ParseError`]; per-cell problems become `None`
/// values in the affected sample.
pub fn load_waveform(raw_text: &str, sampling_rate_hz: f64) -> Result<Waveform, ParseError> {
    let mut lines = raw_text.lines().filter(|l| !l.trim().is_empty());

    let header = lines.next().ok_or(ParseError::EmptyInput)?;

    let map = ColumnMap::from_header(header);
    if !map.is_complete() {
        if looks_numeric(header) {
            return Err(ParseError::NoHeader);
        }
        return Err(ParseError::MissingPhaseColumns {
            missing: map.missing(),
        });
    }

    let mut samples = Vec::new();
    let mut summary = LoadSummary::default();

    for line in lines {
        let sample = parse_row(line, &map);
        summary.rows += 1;
        if sample.is_complete() {
            summary.complete_rows += 1;
        }
        samples.push(sample);
    }

    if summary.complete_rows == 0 {
        return Err(ParseError::NoNumericRows { rows: summary.rows });
    }

    tracing::debug!(
        rows = summary.rows,
        complete_rows = summary.complete_rows,
        "Waveform loaded"
    );

    Ok(Waveform {
        samples,
        sampling_rate_hz,
    })
}
