//! Summary statistics folded from an attempt log.

use crate::constants::GOLD_TO_PHP;
use crate::enhancement::{AttemptCost, AttemptOutcome, MIN_LEVEL};
use serde::{Deserialize, Serialize};

/// Running totals over an ordered attempt log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    pub total_attempts: u64,
    pub successes: u64,
    pub failures: u64,
    pub damage_count: u64,
    /// Sum of every recorded cost, per currency
    pub spent: AttemptCost,
    pub final_level: u8,
    pub highest_level: u8,
}

impl Default for Statistics {
    fn default() -> Self {
        Self::new()
    }
}

impl Statistics {
    /// Baseline before any attempt: level 1, nothing spent.
    pub fn new() -> Self {
        Self {
            total_attempts: 0,
            successes: 0,
            failures: 0,
            damage_count: 0,
            spent: AttemptCost::default(),
            final_level: MIN_LEVEL,
            highest_level: MIN_LEVEL,
        }
    }

    /// Fold one more outcome into the totals.
    pub fn record(&mut self, outcome: &AttemptOutcome) {
        self.total_attempts += 1;
        if outcome.success {
            self.successes += 1;
        } else {
            self.failures += 1;
        }
        if outcome.damage_occurred {
            self.damage_count += 1;
        }
        self.spent += outcome.cost;
        self.final_level = outcome.new_level;
        self.highest_level = self.highest_level.max(outcome.new_level);
    }

    pub fn success_rate(&self) -> f64 {
        if self.total_attempts == 0 {
            0.0
        } else {
            self.successes as f64 / self.total_attempts as f64
        }
    }

    pub fn damage_rate(&self) -> f64 {
        if self.total_attempts == 0 {
            0.0
        } else {
            self.damage_count as f64 / self.total_attempts as f64
        }
    }

    pub fn total_gold_spent(&self) -> u64 {
        self.spent.gold
    }

    /// Display-only PHP figure for everything spent so far.
    pub fn monetary_equivalent(&self) -> f64 {
        self.spent.gold_value() as f64 * GOLD_TO_PHP
    }
}

/// Fold a whole log. Same log in, same statistics out.
pub fn aggregate(log: &[AttemptOutcome]) -> Statistics {
    log.iter().fold(Statistics::new(), |mut stats, outcome| {
        stats.record(outcome);
        stats
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{CRYSTAL_UNIT_PRICE, ESSENCE_UNIT_PRICE, SHARD_UNIT_PRICE};

    fn outcome(previous_level: u8, success: bool, new_level: u8) -> AttemptOutcome {
        AttemptOutcome {
            previous_level,
            success,
            new_level,
            damage_occurred: false,
            cost: AttemptCost::for_level(new_level),
        }
    }

    #[test]
    fn test_empty_log_is_baseline() {
        let stats = aggregate(&[]);
        assert_eq!(stats.total_attempts, 0);
        assert_eq!(stats.final_level, 1);
        assert_eq!(stats.success_rate(), 0.0);
        assert_eq!(stats.total_gold_spent(), 0);
        assert_eq!(stats.monetary_equivalent(), 0.0);
        assert_eq!(stats, Statistics::default());
    }

    #[test]
    fn test_materials_keyed_by_resulting_level() {
        // 3 -> 4 lands in the second tier, 7 -> 6 falls back into it
        let log = [outcome(3, true, 4), outcome(7, false, 6)];
        let stats = aggregate(&log);
        assert_eq!(stats.spent.shards, 36);
        assert_eq!(stats.spent.crystals, 4);
        assert_eq!(stats.spent.essence, 4);
        assert_eq!(stats.failures, 1);
        assert_eq!(stats.highest_level, 6);
    }

    #[test]
    fn test_monetary_equivalent_uses_unit_prices() {
        let stats = aggregate(&[outcome(14, true, 15)]);
        let gold = stats.spent.gold
            + 24 * SHARD_UNIT_PRICE
            + 6 * CRYSTAL_UNIT_PRICE
            + 6 * ESSENCE_UNIT_PRICE;
        assert!((stats.monetary_equivalent() - gold as f64 * GOLD_TO_PHP).abs() < 1e-9);
    }
}
