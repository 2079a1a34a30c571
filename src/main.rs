//! Phasewatch - Three-Phase Motor Current Diagnostics
//!
//! Command-line front-end over the analysis pipeline: load a CSV of
//! phase currents, write the preview/stats artifacts, and print the
//! equipment diagnosis.
//!
//! # Usage
//!
//! ```bash
//! # Analyze a recording with the default 10 kHz / 1 s / 50% setup
//! phasewatch motor_currents.csv
//!
//! # Override the window geometry
//! phasewatch motor_currents.csv --sampling-rate 5000 --window-sec 2 --overlap 0.25
//!
//! # Machine-readable output for the GUI shell
//! phasewatch motor_currents.csv --json
//! ```
//!
//! # Environment Variables
//!
//! - `PHASEWATCH_CONFIG`: Path to a TOML config file
//! - `RUST_LOG`: Logging level (default: info)

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use phasewatch::config::PipelineConfig;
use phasewatch::report::run_file;

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "phasewatch")]
#[command(about = "Three-phase motor current diagnostics")]
#[command(version)]
struct CliArgs {
    /// Path to the CSV file of phase current samples
    input: PathBuf,

    /// Directory for the preview/stats artifacts (default: next to the input)
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Path to a TOML config file (overrides PHASEWATCH_CONFIG)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Waveform sampling rate in Hz
    #[arg(long)]
    sampling_rate: Option<f64>,

    /// Analysis window length in seconds
    #[arg(long)]
    window_sec: Option<f64>,

    /// Fractional window overlap in [0, 1)
    #[arg(long)]
    overlap: Option<f64>,

    /// Imbalance threshold (percent) for anomaly scoring
    #[arg(long)]
    imbalance_threshold: Option<f64>,

    /// Print the full result record as JSON instead of a summary
    #[arg(long)]
    json: bool,
}

impl CliArgs {
    /// Resolve the effective configuration: file (explicit or
    /// discovered), then per-flag overrides.
    fn resolve_config(&self) -> Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::load_from_file(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => PipelineConfig::load(),
        };

        if let Some(rate) = self.sampling_rate {
            config.analysis.sampling_rate_hz = rate;
        }
        if let Some(window_sec) = self.window_sec {
            config.analysis.window_sec = window_sec;
        }
        if let Some(overlap) = self.overlap {
            config.analysis.overlap = overlap;
        }
        if let Some(threshold) = self.imbalance_threshold {
            config.diagnosis.imbalance_threshold_pct = threshold;
        }

        config.validate().context("invalid configuration")?;
        Ok(config)
    }
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = CliArgs::parse();
    let config = args.resolve_config()?;

    info!(input = %args.input.display(), "Starting analysis");

    let outcome = run_file(&args.input, args.out_dir.as_deref(), &config);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    let diagnosis = &outcome.diagnosis;
    println!("Status:        {}", diagnosis.status);
    println!(
        "Windows:       {} analyzed, {} anomalous ({:.2}%)",
        diagnosis.total_samples, diagnosis.anomalies, diagnosis.anomaly_ratio
    );
    for (label, rms) in [
        ("RMS R", diagnosis.rms_r),
        ("RMS S", diagnosis.rms_s),
        ("RMS T", diagnosis.rms_t),
    ] {
        match rms {
            Some(value) => println!("{label}:         {value:.3} A"),
            None => println!("{label}:         —"),
        }
    }
    if let Some(note) = &diagnosis.note {
        println!("Note:          {note}");
    }
    if outcome.report.success {
        println!("Preview:       {}", outcome.report.preview_path);
        println!("Stats:         {}", outcome.report.stats_path);
    } else if let Some(error) = &outcome.report.error {
        println!("Error:         {error}");
    }

    for window in &diagnosis.anomaly_windows {
        match window.imbalance {
            Some(imbalance) => println!(
                "  anomaly [{}, {}): imbalance {imbalance:.3}%",
                window.start, window.end
            ),
            None => println!("  anomaly [{}, {})", window.start, window.end),
        }
    }

    Ok(())
}
