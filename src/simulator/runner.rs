//! Simulation runner built on the real batch driver.
//!
//! Each run is a single `run_batch` call; statistics come from folding the
//! run's outcomes with `aggregate`, the same path a session uses.

use super::config::SimConfig;
use super::report::{RunStats, SimReport};
use crate::enhancement::{run_batch, MAX_LEVEL};
use crate::error::Result;
use crate::statistics::aggregate;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

/// Run the full simulation and return a report.
pub fn run_simulation(config: &SimConfig) -> Result<SimReport> {
    let mut all_runs = Vec::with_capacity(config.num_runs as usize);

    for run_idx in 0..config.num_runs {
        // Create RNG for this run
        let mut rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed.wrapping_add(u64::from(run_idx))),
            None => ChaCha8Rng::from_entropy(),
        };

        let run_stats = simulate_single_run(config, &mut rng)?;
        debug!(
            run = run_idx + 1,
            final_level = run_stats.final_level,
            attempts = run_stats.stats.total_attempts,
            reached = run_stats.reached_target,
            "simulation run finished"
        );

        if config.verbosity >= 2 {
            println!(
                "Run {}/{} - Level +{}, Attempts {}, Successes {}, Failures {}, Reached {}",
                run_idx + 1,
                config.num_runs,
                run_stats.final_level,
                run_stats.stats.total_attempts,
                run_stats.stats.successes,
                run_stats.stats.failures,
                run_stats.reached_target
            );
        }
        all_runs.push(run_stats);
    }

    Ok(SimReport::from_runs(all_runs, config))
}

/// Simulate one climb from the configured start level.
fn simulate_single_run(config: &SimConfig, rng: &mut ChaCha8Rng) -> Result<RunStats> {
    let batch = run_batch(
        config.start_level,
        config.target_level,
        config.max_attempts_per_run,
        rng,
    )?;

    let mut level_attempts = vec![0u64; MAX_LEVEL as usize + 1];
    let mut level_successes = vec![0u64; MAX_LEVEL as usize + 1];
    for outcome in &batch.outcomes {
        let idx = outcome.previous_level as usize;
        level_attempts[idx] += 1;
        if outcome.success {
            level_successes[idx] += 1;
        }
    }

    Ok(RunStats {
        final_level: batch.final_level,
        reached_target: batch.final_level >= config.target_level,
        stop_reason: batch.stop_reason(),
        stats: aggregate(&batch.outcomes),
        level_attempts,
        level_successes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enhancement::BatchStop;

    #[test]
    fn test_single_run() {
        let config = SimConfig {
            num_runs: 1,
            seed: Some(12345),
            start_level: 1,
            target_level: 6,
            max_attempts_per_run: 50,
            verbosity: 0,
        };

        let mut rng = ChaCha8Rng::seed_from_u64(12345);
        let stats = simulate_single_run(&config, &mut rng).unwrap();

        // +1 through +5 are guaranteed, so exactly five attempts
        assert_eq!(stats.stats.total_attempts, 5);
        assert_eq!(stats.final_level, 6);
        assert!(stats.reached_target);
        assert_eq!(stats.stop_reason, BatchStop::ReachedTarget);
        assert_eq!(stats.level_attempts[1..6], [1, 1, 1, 1, 1]);
    }

    #[test]
    fn test_full_simulation() {
        let config = SimConfig {
            num_runs: 5,
            seed: Some(42),
            target_level: 9,
            max_attempts_per_run: 500,
            verbosity: 0,
            ..Default::default()
        };

        let report = run_simulation(&config).unwrap();

        assert_eq!(report.num_runs, 5);
        assert!(report.avg_attempts >= 8.0);
    }

    #[test]
    fn test_attempt_limit_respected() {
        let config = SimConfig {
            num_runs: 20,
            seed: Some(7),
            start_level: 10,
            target_level: 15,
            max_attempts_per_run: 3,
            verbosity: 0,
        };

        let report = run_simulation(&config).unwrap();
        for run in &report.run_stats {
            assert!(run.stats.total_attempts <= 3);
        }
    }

    #[test]
    fn test_same_seed_same_report() {
        let config = SimConfig {
            num_runs: 10,
            seed: Some(99),
            target_level: 12,
            max_attempts_per_run: 200,
            verbosity: 0,
            ..Default::default()
        };

        let a = run_simulation(&config).unwrap();
        let b = run_simulation(&config).unwrap();
        assert_eq!(a.to_json(), b.to_json());
    }
}
