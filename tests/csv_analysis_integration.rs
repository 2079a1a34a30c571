//! CSV Analysis Integration Test
//!
//! Lightweight end-to-end test of the file boundary: write a small
//! CSV into a scratch directory, run the full pipeline through
//! `run_file`, and verify the emitted artifacts and the diagnosis.

use std::path::Path;

use phasewatch::config::{AnalysisConfig, PipelineConfig};
use phasewatch::report::run_file;
use phasewatch::types::EquipmentStatus;

/// Pipeline config sized for small test files: 100 Hz, half-second
/// windows, 50% overlap.
fn test_config() -> PipelineConfig {
    PipelineConfig {
        analysis: AnalysisConfig {
            sampling_rate_hz: 100.0,
            window_sec: 0.5,
            overlap: 0.5,
            ..Default::default()
        },
        diagnosis: Default::default(),
    }
}

fn write_csv(dir: &Path, name: &str, body: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, body).expect("failed to write test CSV");
    path
}

fn balanced_body(rows: usize) -> String {
    let mut text = String::from("current_R,current_S,current_T\n");
    for _ in 0..rows {
        text.push_str("10.0,10.0,10.0\n");
    }
    text
}

#[test]
fn healthy_recording_produces_artifacts_and_normal_status() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_csv(dir.path(), "motor.csv", &balanced_body(300));

    let outcome = run_file(&input, None, &test_config());

    assert!(outcome.report.success, "error: {:?}", outcome.report.error);
    assert_eq!(outcome.diagnosis.status, EquipmentStatus::Normal);
    assert!(outcome.diagnosis.success);

    // Artifacts land next to the input.
    let preview = dir.path().join("preview.csv");
    let stats = dir.path().join("stats.csv");
    let stats_json = dir.path().join("stats.json");
    assert!(preview.exists() && stats.exists() && stats_json.exists());

    let preview_text = std::fs::read_to_string(&preview).expect("read preview");
    assert!(preview_text.starts_with("index,current_R,current_S,current_T\n"));
    // 300 data rows + header.
    assert_eq!(preview_text.lines().count(), 301);

    let stats_text = std::fs::read_to_string(&stats).expect("read stats");
    assert!(stats_text.starts_with("start,end,rms_r,rms_s,rms_t,imbalance,anomaly_score\n"));

    // stats.json round-trips into the same feature records.
    let parsed: Vec<phasewatch::types::WindowFeature> =
        serde_json::from_str(&std::fs::read_to_string(&stats_json).expect("read json"))
            .expect("parse stats.json");
    assert_eq!(parsed, outcome.report.stats_data);

    // Report paths point at the artifacts.
    assert_eq!(outcome.report.preview_path, preview.display().to_string());
    assert!(outcome.report.plot_path.is_none(), "rendering is external");
}

#[test]
fn imbalanced_recording_is_dangerous_with_window_listing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut body = String::from("current_R,current_S,current_T\n");
    for _ in 0..300 {
        body.push_str("10.0,10.0,14.0\n");
    }
    let input = write_csv(dir.path(), "motor.csv", &body);

    let outcome = run_file(&input, None, &test_config());

    assert_eq!(outcome.diagnosis.status, EquipmentStatus::Dangerous);
    assert!((outcome.diagnosis.anomaly_ratio - 100.0).abs() < 1e-9);
    assert_eq!(
        outcome.diagnosis.anomaly_windows.len(),
        outcome.diagnosis.total_samples
    );
    // First-window RMS values are surfaced on the diagnosis.
    assert!(outcome.diagnosis.rms_t.is_some());
}

#[test]
fn dead_phase_sensor_yields_insufficient_data() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut body = String::from("current_R,current_S,current_T\n");
    for _ in 0..310 {
        body.push_str("10.0,,10.0\n");
    }
    // One complete row so the loader accepts the file, placed in the
    // partial tail past the last full window (windows cover [0, 300))
    // so every analyzed window still lacks phase S.
    body.push_str("10.0,10.0,10.0\n");
    let input = write_csv(dir.path(), "motor.csv", &body);

    let outcome = run_file(&input, None, &test_config());

    // The analysis itself succeeds; the sufficiency policy rejects it.
    assert!(outcome.report.success);
    assert_eq!(outcome.diagnosis.status, EquipmentStatus::InsufficientData);
    assert!(!outcome.diagnosis.success);
    let note = outcome.diagnosis.note.expect("insufficiency note");
    assert!(note.contains("phase S/T"), "note: {note}");
}

#[test]
fn headerless_file_becomes_failure_envelope() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = write_csv(dir.path(), "motor.csv", "1.0,2.0,3.0\n4.0,5.0,6.0\n");

    let outcome = run_file(&input, None, &test_config());

    assert!(!outcome.report.success);
    assert!(outcome.report.error.is_some());
    assert!(outcome.report.stats_data.is_empty());
    assert_eq!(outcome.diagnosis.status, EquipmentStatus::InsufficientData);
    assert_eq!(outcome.diagnosis.note, outcome.report.error);
    // No artifacts are written for a failed run.
    assert!(!dir.path().join("preview.csv").exists());
}

#[test]
fn explicit_out_dir_receives_the_artifacts() {
    let input_dir = tempfile::tempdir().expect("tempdir");
    let out_dir = tempfile::tempdir().expect("tempdir");
    let input = write_csv(input_dir.path(), "motor.csv", &balanced_body(300));

    let outcome = run_file(&input, Some(out_dir.path()), &test_config());

    assert!(outcome.report.success);
    assert!(out_dir.path().join("preview.csv").exists());
    assert!(out_dir.path().join("stats.json").exists());
    assert!(!input_dir.path().join("preview.csv").exists());
}
