//! Enhancement simulator CLI.
//!
//! Run Monte Carlo climbs to compare real reach rates with the no-fail
//! chain probability and to estimate spend.
//!
//! Usage:
//!   cargo run --bin simulate -- [OPTIONS]
//!
//! Examples:
//!   cargo run --bin simulate                      # Default: 1000 runs, +1 to +15
//!   cargo run --bin simulate -- -n 100 -t 10     # 100 runs to +10
//!   cargo run --bin simulate -- --seed 42        # Reproducible run

use anyhow::{Context, Result};
use clap::Parser;
use forge::enhancement::clamp_level;
use forge::simulator::{run_simulation, SimConfig};
use tracing_subscriber::EnvFilter;

/// Forge enhancement simulator
#[derive(Parser)]
#[command(name = "simulate")]
#[command(about = "Monte Carlo analysis of enhancement climbs", long_about = None)]
struct Args {
    /// Number of simulation runs
    #[arg(short = 'n', long, default_value_t = 1000)]
    runs: u32,

    /// Random seed for reproducibility
    #[arg(short, long)]
    seed: Option<u64>,

    /// Level every run starts from
    #[arg(long, default_value_t = 1)]
    start: i64,

    /// Level to reach
    #[arg(short, long, default_value_t = 15)]
    target: i64,

    /// Max attempts per run
    #[arg(short, long, default_value_t = 10_000)]
    max_attempts: usize,

    /// Save a JSON report next to the working directory
    #[arg(long)]
    json: bool,

    /// Print every run
    #[arg(short, long)]
    verbose: bool,

    /// Quick test (100 runs to +10)
    #[arg(long)]
    quick: bool,
}

impl Args {
    fn to_config(&self) -> SimConfig {
        if self.quick {
            return SimConfig {
                seed: self.seed,
                ..SimConfig::quick()
            };
        }
        SimConfig {
            num_runs: self.runs,
            seed: self.seed,
            start_level: clamp_level(self.start),
            target_level: clamp_level(self.target),
            max_attempts_per_run: self.max_attempts.max(1),
            verbosity: if self.verbose { 2 } else { 1 },
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = args.to_config();

    println!("╔═══════════════════════════════════════════════════════════════╗");
    println!("║              FORGE ENHANCEMENT SIMULATOR                      ║");
    println!("╚═══════════════════════════════════════════════════════════════╝");
    println!();
    println!("Configuration:");
    println!("  Runs:           {}", config.num_runs);
    println!("  Start Level:    +{}", config.start_level);
    println!("  Target Level:   +{}", config.target_level);
    println!("  Max Attempts:   {}", config.max_attempts_per_run);
    if let Some(seed) = config.seed {
        println!("  Seed:           {}", seed);
    }
    println!();
    println!("Running simulation...");
    println!();

    let report = run_simulation(&config)?;

    println!("{}", report.to_text());

    if args.json {
        let filename = format!(
            "sim_report_{}.json",
            chrono::Utc::now().format("%Y%m%d_%H%M%S")
        );
        std::fs::write(&filename, report.to_json())
            .with_context(|| format!("failed to write {}", filename))?;
        println!("JSON report saved to: {}", filename);
    }

    Ok(())
}
