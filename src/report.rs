//! Result reporting and artifact emission.
//!
//! The boundary between the pure pipeline and the surrounding shell:
//! reads the input file, runs the pipeline, writes the tabular
//! artifacts (`preview.csv`, `stats.csv`, `stats.json`) next to the
//! input, and assembles the result record the shell consumes. Nothing
//! in here panics: every failure becomes a `success: false` envelope
//! with the error string attached.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info};

use crate::config::PipelineConfig;
use crate::diagnosis::failure_diagnosis;
use crate::pipeline::analyze_and_diagnose;
use crate::types::{Diagnosis, PreviewRow, WindowFeature};

// ============================================================================
// Errors
// ============================================================================

/// External-collaborator failure at the file boundary.
///
/// Never raised by the pure core; only reading the input and writing
/// artifacts can produce it.
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("failed to read {path}: {source}")]
    ReadInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    WriteArtifact {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// ============================================================================
// Result Record
// ============================================================================

/// The structured result record exchanged with the shell, serialized
/// with the wire field names the display layer already binds to.
///
/// The core populates every field except the plot artifact itself;
/// rendering is external, so `plotPath` stays empty here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub success: bool,
    pub error: Option<String>,
    #[serde(rename = "previewData")]
    pub preview_data: Vec<PreviewRow>,
    #[serde(rename = "statsData")]
    pub stats_data: Vec<WindowFeature>,
    #[serde(rename = "previewPath")]
    pub preview_path: String,
    #[serde(rename = "statsPath")]
    pub stats_path: String,
    #[serde(rename = "statsJsonPath")]
    pub stats_json_path: String,
    #[serde(rename = "plotPath")]
    pub plot_path: Option<String>,
    #[serde(rename = "generatedAt")]
    pub generated_at: DateTime<Utc>,
}

impl AnalysisReport {
    /// The empty `success: false` envelope carrying only the error.
    fn failure(error: String) -> Self {
        Self {
            success: false,
            error: Some(error),
            preview_data: Vec::new(),
            stats_data: Vec::new(),
            preview_path: String::new(),
            stats_path: String::new(),
            stats_json_path: String::new(),
            plot_path: None,
            generated_at: Utc::now(),
        }
    }
}

/// Everything a single file run produces for the shell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunOutcome {
    pub report: AnalysisReport,
    pub diagnosis: Diagnosis,
}

// ============================================================================
// Artifact Writers
// ============================================================================

fn optional_cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn write_file(path: &Path, contents: &str) -> Result<(), ProcessError> {
    let mut file = std::fs::File::create(path).map_err(|source| ProcessError::WriteArtifact {
        path: path.to_path_buf(),
        source,
    })?;
    file.write_all(contents.as_bytes())
        .map_err(|source| ProcessError::WriteArtifact {
            path: path.to_path_buf(),
            source,
        })
}

/// Write the preview table: header row, one line per retained sample.
pub fn write_preview_csv(path: &Path, rows: &[PreviewRow]) -> Result<(), ProcessError> {
    let mut out = String::with_capacity(rows.len() * 24 + 64);
    out.push_str("index,current_R,current_S,current_T\n");
    for row in rows {
        out.push_str(&format!(
            "{},{},{},{}\n",
            row.index,
            optional_cell(row.current_r),
            optional_cell(row.current_s),
            optional_cell(row.current_t),
        ));
    }
    write_file(path, &out)
}

/// Write the per-window feature table.
pub fn write_stats_csv(path: &Path, features: &[WindowFeature]) -> Result<(), ProcessError> {
    let mut out = String::with_capacity(features.len() * 48 + 64);
    out.push_str("start,end,rms_r,rms_s,rms_t,imbalance,anomaly_score\n");
    for f in features {
        out.push_str(&format!(
            "{},{},{},{},{},{},{}\n",
            f.start,
            f.end,
            optional_cell(f.rms_r),
            optional_cell(f.rms_s),
            optional_cell(f.rms_t),
            optional_cell(f.imbalance),
            f.anomaly_score,
        ));
    }
    write_file(path, &out)
}

/// Write the feature sequence as pretty-printed JSON (nulls for
/// absent values, matching the wire contract).
pub fn write_stats_json(path: &Path, features: &[WindowFeature]) -> Result<(), ProcessError> {
    let json = serde_json::to_string_pretty(features).map_err(|e| ProcessError::WriteArtifact {
        path: path.to_path_buf(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
    })?;
    write_file(path, &json)
}

// ============================================================================
// File Boundary
// ============================================================================

/// Run the full pipeline over a file and emit artifacts.
///
/// Artifacts land in `out_dir` when given, otherwise next to the
/// input. This function never fails: parse, config, compute, and I/O
/// errors all collapse into a `success: false` report paired with an
/// `InsufficientData`-shaped diagnosis carrying the error as its note.
pub fn run_file(input: &Path, out_dir: Option<&Path>, config: &PipelineConfig) -> RunOutcome {
    match run_file_inner(input, out_dir, config) {
        Ok(outcome) => outcome,
        Err(message) => {
            error!(input = %input.display(), error = %message, "Analysis run failed");
            RunOutcome {
                report: AnalysisReport::failure(message.clone()),
                diagnosis: failure_diagnosis(&message),
            }
        }
    }
}

fn run_file_inner(
    input: &Path,
    out_dir: Option<&Path>,
    config: &PipelineConfig,
) -> Result<RunOutcome, String> {
    let raw_text = std::fs::read_to_string(input)
        .map_err(|source| {
            ProcessError::ReadInput {
                path: input.to_path_buf(),
                source,
            }
            .to_string()
        })?;

    let (analysis, diagnosis) =
        analyze_and_diagnose(&raw_text, config).map_err(|e| e.to_string())?;

    let base_dir = out_dir
        .map(Path::to_path_buf)
        .or_else(|| input.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."));

    let preview_path = base_dir.join("preview.csv");
    let stats_path = base_dir.join("stats.csv");
    let stats_json_path = base_dir.join("stats.json");

    write_preview_csv(&preview_path, &analysis.preview).map_err(|e| e.to_string())?;
    write_stats_csv(&stats_path, &analysis.features).map_err(|e| e.to_string())?;
    write_stats_json(&stats_json_path, &analysis.features).map_err(|e| e.to_string())?;

    info!(
        input = %input.display(),
        preview = %preview_path.display(),
        stats = %stats_path.display(),
        status = %diagnosis.status,
        "Artifacts written"
    );

    Ok(RunOutcome {
        report: AnalysisReport {
            success: true,
            error: None,
            preview_data: analysis.preview,
            stats_data: analysis.features,
            preview_path: preview_path.display().to_string(),
            stats_path: stats_path.display().to_string(),
            stats_json_path: stats_json_path.display().to_string(),
            plot_path: None,
            generated_at: Utc::now(),
        },
        diagnosis,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Sample;

    fn rows() -> Vec<PreviewRow> {
        vec![
            PreviewRow::from_sample(
                0,
                &Sample {
                    phase_r: Some(1.5),
                    phase_s: None,
                    phase_t: Some(3.0),
                },
            ),
            PreviewRow::from_sample(
                1,
                &Sample {
                    phase_r: Some(2.0),
                    phase_s: Some(2.0),
                    phase_t: Some(2.0),
                },
            ),
        ]
    }

    #[test]
    fn preview_csv_has_header_and_empty_cells_for_nulls() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preview.csv");
        write_preview_csv(&path, &rows()).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = written.lines().collect();
        assert_eq!(lines[0], "index,current_R,current_S,current_T");
        assert_eq!(lines[1], "0,1.5,,3");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn stats_json_uses_null_for_absent_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats.json");
        let features = vec![WindowFeature {
            start: 0,
            end: 10,
            rms_r: Some(1.0),
            rms_s: None,
            rms_t: Some(1.0),
            imbalance: None,
            anomaly_score: 0,
        }];
        write_stats_json(&path, &features).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(value[0]["rms_s"].is_null());
        assert_eq!(value[0]["anomaly_score"], 0);
    }

    #[test]
    fn failure_report_is_empty_with_error() {
        let report = AnalysisReport::failure("boom".into());
        assert!(!report.success);
        assert_eq!(report.error.as_deref(), Some("boom"));
        assert!(report.preview_data.is_empty());
        assert!(report.plot_path.is_none());
    }

    #[test]
    fn missing_input_file_becomes_failure_envelope() {
        let outcome = run_file(
            Path::new("/nonexistent/waveform.csv"),
            None,
            &PipelineConfig::default(),
        );
        assert!(!outcome.report.success);
        assert!(!outcome.diagnosis.success);
        assert!(outcome
            .report
            .error
            .as_deref()
            .is_some_and(|e| e.contains("failed to read")));
    }
}
