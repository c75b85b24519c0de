//! Simulation configuration.

use crate::enhancement::{MAX_LEVEL, MIN_LEVEL};

/// Configuration for a simulation run.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Number of independent batch runs to perform
    pub num_runs: u32,

    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,

    /// Level every run starts from (1-15)
    pub start_level: u8,

    /// Level a run tries to reach (1-15)
    pub target_level: u8,

    /// Maximum attempts per run before giving up
    pub max_attempts_per_run: usize,

    /// Log verbosity (0 = silent, 1 = summary, 2 = detailed)
    pub verbosity: u8,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            num_runs: 1000,
            seed: None,
            start_level: MIN_LEVEL,
            target_level: MAX_LEVEL,
            max_attempts_per_run: 10_000,
            verbosity: 1,
        }
    }
}

impl SimConfig {
    /// Quick config for a fast sanity check
    pub fn quick() -> Self {
        Self {
            num_runs: 100,
            target_level: 10,
            max_attempts_per_run: 1_000,
            ..Default::default()
        }
    }

    /// Config for measuring the climb between two levels
    pub fn level_range(start_level: u8, target_level: u8, num_runs: u32) -> Self {
        Self {
            num_runs,
            start_level,
            target_level,
            ..Default::default()
        }
    }
}
