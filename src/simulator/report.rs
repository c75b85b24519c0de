//! Simulation report generation.

use super::config::SimConfig;
use crate::enhancement::{level_prefix, reach_target_probability, success_rate, BatchStop};
use crate::statistics::Statistics;
use serde::Serialize;
use std::collections::BTreeMap;

/// Outcome of one simulated climb.
#[derive(Debug, Clone, Serialize)]
pub struct RunStats {
    pub final_level: u8,
    pub reached_target: bool,
    pub stop_reason: BatchStop,
    pub stats: Statistics,
    /// Attempts started at each level (index = level)
    pub level_attempts: Vec<u64>,
    /// Successful attempts started at each level (index = level)
    pub level_successes: Vec<u64>,
}

/// Aggregated results from multiple simulation runs.
#[derive(Debug, Clone, Serialize)]
pub struct SimReport {
    pub num_runs: u32,
    pub start_level: u8,
    pub target_level: u8,
    pub runs_reached: u32,
    pub runs_hit_limit: u32,

    // Reach analysis
    pub reach_rate: f64,
    pub chain_probability: f64,

    // Spend
    pub avg_attempts: f64,
    pub avg_attempts_when_reached: f64,
    pub avg_gold: f64,
    pub avg_shards: f64,
    pub avg_crystals: f64,
    pub avg_essence: f64,
    pub avg_monetary_equivalent: f64,
    pub avg_damage_events: f64,

    // Distribution data
    pub final_level_distribution: BTreeMap<u8, u32>,
    pub attempts_distribution: Vec<u64>,

    // Per-level analysis (level -> (attempts, empirical rate, table rate))
    pub level_success: BTreeMap<u8, (u64, f64, f64)>,

    // Individual run stats for detailed analysis
    #[serde(skip)]
    pub run_stats: Vec<RunStats>,
}

fn mean(values: impl Iterator<Item = f64>, count: u32) -> f64 {
    values.sum::<f64>() / count.max(1) as f64
}

impl SimReport {
    /// Create a new report from completed run stats.
    pub fn from_runs(runs: Vec<RunStats>, config: &SimConfig) -> Self {
        let num_runs = runs.len() as u32;
        let runs_reached = runs.iter().filter(|r| r.reached_target).count() as u32;
        let runs_hit_limit = runs
            .iter()
            .filter(|r| r.stop_reason == BatchStop::AttemptLimit)
            .count() as u32;

        let reach_rate = runs_reached as f64 / num_runs.max(1) as f64;
        let chain_probability = reach_target_probability(config.start_level, config.target_level);

        let avg_attempts = mean(
            runs.iter().map(|r| r.stats.total_attempts as f64),
            num_runs,
        );
        let avg_attempts_when_reached = mean(
            runs.iter()
                .filter(|r| r.reached_target)
                .map(|r| r.stats.total_attempts as f64),
            runs_reached,
        );
        let avg_gold = mean(runs.iter().map(|r| r.stats.spent.gold as f64), num_runs);
        let avg_shards = mean(runs.iter().map(|r| r.stats.spent.shards as f64), num_runs);
        let avg_crystals = mean(runs.iter().map(|r| r.stats.spent.crystals as f64), num_runs);
        let avg_essence = mean(runs.iter().map(|r| r.stats.spent.essence as f64), num_runs);
        let avg_monetary_equivalent = mean(
            runs.iter().map(|r| r.stats.monetary_equivalent()),
            num_runs,
        );
        let avg_damage_events = mean(
            runs.iter().map(|r| r.stats.damage_count as f64),
            num_runs,
        );

        // Final level distribution
        let mut final_level_distribution = BTreeMap::new();
        for run in &runs {
            *final_level_distribution.entry(run.final_level).or_insert(0) += 1;
        }

        let attempts_distribution: Vec<u64> =
            runs.iter().map(|r| r.stats.total_attempts).collect();

        // Per-level empirical success
        let mut level_success = BTreeMap::new();
        let levels = runs.first().map_or(0, |r| r.level_attempts.len());
        for idx in 1..levels {
            let attempts: u64 = runs.iter().map(|r| r.level_attempts[idx]).sum();
            if attempts == 0 {
                continue;
            }
            let successes: u64 = runs.iter().map(|r| r.level_successes[idx]).sum();
            let level = idx as u8;
            level_success.insert(
                level,
                (
                    attempts,
                    successes as f64 / attempts as f64,
                    success_rate(level),
                ),
            );
        }

        Self {
            num_runs,
            start_level: config.start_level,
            target_level: config.target_level,
            runs_reached,
            runs_hit_limit,
            reach_rate,
            chain_probability,
            avg_attempts,
            avg_attempts_when_reached,
            avg_gold,
            avg_shards,
            avg_crystals,
            avg_essence,
            avg_monetary_equivalent,
            avg_damage_events,
            final_level_distribution,
            attempts_distribution,
            level_success,
            run_stats: runs,
        }
    }

    /// Generate a text report.
    pub fn to_text(&self) -> String {
        let mut report = String::new();

        report.push_str("═══════════════════════════════════════════════════════════════\n");
        report.push_str("                 ENHANCEMENT SIMULATION REPORT\n");
        report.push_str("═══════════════════════════════════════════════════════════════\n\n");

        report.push_str(&format!(
            "Runs: {} total, {} reached {}, {} hit the attempt limit\n\n",
            self.num_runs,
            self.runs_reached,
            level_prefix(self.target_level),
            self.runs_hit_limit
        ));

        report.push_str("── REACH ────────────────────────────────────────────────────────\n");
        report.push_str(&format!(
            "  Climb:               {} -> {}\n",
            level_prefix(self.start_level),
            level_prefix(self.target_level)
        ));
        report.push_str(&format!(
            "  Reach Rate:          {:.2}%\n",
            self.reach_rate * 100.0
        ));
        report.push_str(&format!(
            "  No-Fail Chain:       {:.4}%\n",
            self.chain_probability * 100.0
        ));
        report.push_str(&format!(
            "  Avg Attempts:        {:.1}\n",
            self.avg_attempts
        ));
        report.push_str(&format!(
            "  Avg When Reached:    {:.1}\n\n",
            self.avg_attempts_when_reached
        ));

        report.push_str("── SPEND (per run) ──────────────────────────────────────────────\n");
        report.push_str(&format!("  Gold:                {:.0}\n", self.avg_gold));
        report.push_str(&format!("  Shards:              {:.1}\n", self.avg_shards));
        report.push_str(&format!("  Crystals:            {:.1}\n", self.avg_crystals));
        report.push_str(&format!("  Essence:             {:.1}\n", self.avg_essence));
        report.push_str(&format!(
            "  PHP Equivalent:      {:.2}\n",
            self.avg_monetary_equivalent
        ));
        report.push_str(&format!(
            "  Damage Events:       {:.2}\n\n",
            self.avg_damage_events
        ));

        report.push_str("── FINAL LEVEL ──────────────────────────────────────────────────\n");
        for (level, count) in &self.final_level_distribution {
            let pct = (*count as f64 / self.num_runs.max(1) as f64) * 100.0;
            let bar_len = (pct / 5.0) as usize;
            let bar: String = "█".repeat(bar_len);
            report.push_str(&format!("  {:>4}: {:>5.1}% {}\n", level_prefix(*level), pct, bar));
        }
        report.push('\n');

        report.push_str("── PER-LEVEL SUCCESS ────────────────────────────────────────────\n");
        report.push_str("  Level   Attempts   Observed   Table\n");
        report.push_str("  ─────   ────────   ────────   ─────\n");
        for (level, (attempts, observed, table)) in &self.level_success {
            report.push_str(&format!(
                "  {:>5}   {:8}   {:7.2}%   {:4.0}%\n",
                level_prefix(*level),
                attempts,
                observed * 100.0,
                table * 100.0
            ));
        }
        report.push('\n');

        report.push_str("── ATTEMPT SPREAD ───────────────────────────────────────────────\n");
        let mut sorted = self.attempts_distribution.clone();
        sorted.sort_unstable();
        let min = sorted.first().copied().unwrap_or(0);
        let max = sorted.last().copied().unwrap_or(0);
        let median = sorted.get(sorted.len() / 2).copied().unwrap_or(0);
        report.push_str(&format!("  Min Attempts:    {}\n", min));
        report.push_str(&format!("  Median Attempts: {}\n", median));
        report.push_str(&format!("  Max Attempts:    {}\n", max));

        if self.runs_hit_limit > 0 {
            report.push_str(&format!(
                "  ⚠️  {} runs stalled at the attempt limit\n",
                self.runs_hit_limit
            ));
        }

        report.push_str("\n═══════════════════════════════════════════════════════════════\n");

        report
    }

    /// Generate a JSON report for further analysis.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}
