//! Three-Phase Current Simulation
//!
//! Generates synthetic motor current CSVs for exercising phasewatch.
//! Simulates several equipment conditions:
//! - Healthy motor (balanced phases)
//! - Load/winding imbalance from a chosen point in the recording
//! - A dead phase-S sensor (empty cells)
//! - A short imbalance burst (a few anomalous windows)
//!
//! # Usage
//! ```bash
//! ./simulate --rows 20000 --scenario imbalance --seed 7 > motor.csv
//! ./simulate --rows 20000 | phasewatch /dev/stdin
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use rand::prelude::*;
use rand_distr::{Distribution, Normal};
use std::f64::consts::PI;
use std::io::{self, Write};

// ============================================================================
// Waveform Constants
// ============================================================================

/// Baseline phase current amplitude (A)
const BASE_AMPLITUDE: f64 = 10.0;
/// Mains frequency (Hz)
const MAINS_FREQ: f64 = 50.0;
/// Default measurement noise sigma (A)
const BASE_NOISE_SIGMA: f64 = 0.05;
/// Amplitude gain on the faulted phase in imbalance scenarios
const FAULT_GAIN: f64 = 1.4;
/// Fraction of the recording where a developing fault begins
const FAULT_ONSET: f64 = 0.5;
/// Burst scenario: anomalous span as a fraction of the recording
const BURST_SPAN: (f64, f64) = (0.45, 0.50);

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "simulate")]
#[command(about = "Synthetic three-phase current data for phasewatch testing")]
#[command(version)]
struct Args {
    /// Number of sample rows to generate
    #[arg(long, default_value = "20000")]
    rows: usize,

    /// Sampling rate in Hz (controls the sine phase step)
    #[arg(long, default_value = "10000")]
    sampling_rate: f64,

    /// Noise sigma in amperes
    #[arg(long, default_value_t = BASE_NOISE_SIGMA)]
    noise: f64,

    /// Equipment condition to simulate
    #[arg(long, default_value = "normal")]
    scenario: String,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,
}

// ============================================================================
// Scenarios
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scenario {
    /// Balanced phases for the whole recording
    Normal,
    /// Phase T amplitude grows from FAULT_ONSET onward
    Imbalance,
    /// Phase S sensor is dead: empty cells throughout
    MissingPhase,
    /// Short imbalance burst around the middle of the recording
    Burst,
}

impl Scenario {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "normal" => Some(Scenario::Normal),
            "imbalance" => Some(Scenario::Imbalance),
            "missing-phase" => Some(Scenario::MissingPhase),
            "burst" => Some(Scenario::Burst),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Scenario::Normal => "Healthy Motor (Balanced Phases)",
            Scenario::Imbalance => "Developing Imbalance (Phase T Overload)",
            Scenario::MissingPhase => "Dead Phase-S Sensor",
            Scenario::Burst => "Transient Imbalance Burst",
        }
    }

    /// Amplitude multiplier for phase T at a given progress through
    /// the recording.
    fn t_gain(self, progress: f64) -> f64 {
        match self {
            Scenario::Normal | Scenario::MissingPhase => 1.0,
            Scenario::Imbalance => {
                if progress >= FAULT_ONSET {
                    FAULT_GAIN
                } else {
                    1.0
                }
            }
            Scenario::Burst => {
                if progress >= BURST_SPAN.0 && progress < BURST_SPAN.1 {
                    FAULT_GAIN
                } else {
                    1.0
                }
            }
        }
    }
}

// ============================================================================
// Generation
// ============================================================================

fn main() -> Result<()> {
    let args = Args::parse();

    let scenario = Scenario::parse(&args.scenario).with_context(|| {
        format!(
            "unknown scenario '{}' (expected normal, imbalance, missing-phase, burst)",
            args.scenario
        )
    })?;

    let seed = args.seed.unwrap_or_else(|| rand::thread_rng().gen());
    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Normal::new(0.0, args.noise.max(0.0))
        .context("invalid noise sigma")?;

    eprintln!(
        "Simulating: {} — {} rows at {} Hz (seed {})",
        scenario.name(),
        args.rows,
        args.sampling_rate,
        seed
    );

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());

    writeln!(out, "current_R,current_S,current_T")?;

    for i in 0..args.rows {
        let t = i as f64 / args.sampling_rate;
        let progress = i as f64 / args.rows.max(1) as f64;
        let omega = 2.0 * PI * MAINS_FREQ * t;

        let r = BASE_AMPLITUDE * omega.sin() + noise.sample(&mut rng);
        let s = BASE_AMPLITUDE * (omega - 2.0 * PI / 3.0).sin() + noise.sample(&mut rng);
        let t_phase = BASE_AMPLITUDE * scenario.t_gain(progress) * (omega + 2.0 * PI / 3.0).sin()
            + noise.sample(&mut rng);

        if scenario == Scenario::MissingPhase {
            writeln!(out, "{r},,{t_phase}")?;
        } else {
            writeln!(out, "{r},{s},{t_phase}")?;
        }
    }

    out.flush()?;
    Ok(())
}
