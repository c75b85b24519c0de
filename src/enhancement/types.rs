use crate::constants::{
    CRYSTAL_UNIT_PRICE, ESSENCE_UNIT_PRICE, GOLD_PER_ATTEMPT, GOLD_TO_PHP, SHARD_UNIT_PRICE,
};
use serde::{Deserialize, Serialize};

pub const MIN_LEVEL: u8 = 1;
pub const MAX_LEVEL: u8 = 15;

/// Fixed odds for one enhancement level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnhancementRule {
    /// Chance in [0,1] that an attempt at this level succeeds
    pub success_rate: f64,
    /// Chance in [0,1] that the damage flag is raised, independent of success
    pub damage_rate: f64,
    /// Levels added on failure (never positive)
    pub failure_penalty: i8,
}

const fn rule(success_rate: f64, damage_rate: f64, failure_penalty: i8) -> EnhancementRule {
    EnhancementRule {
        success_rate,
        damage_rate,
        failure_penalty,
    }
}

/// Rule table indexed by `level - 1`.
pub static ENHANCEMENT_RULES: [EnhancementRule; MAX_LEVEL as usize] = [
    rule(1.00, 0.00, 0), // +1-6: guaranteed
    rule(1.00, 0.00, 0),
    rule(1.00, 0.00, 0),
    rule(1.00, 0.00, 0),
    rule(1.00, 0.00, 0),
    rule(1.00, 0.00, 0),
    rule(0.45, 0.05, -1), // +7-9: -1
    rule(0.40, 0.10, -1),
    rule(0.35, 0.15, -1),
    rule(0.30, 0.20, -2), // +10-12: -2
    rule(0.25, 0.25, -2),
    rule(0.20, 0.30, -2),
    rule(0.15, 0.35, -3), // +13-15: -3
    rule(0.10, 0.40, -3),
    rule(0.05, 0.50, -3),
];

/// Look up the rule for a level. `None` outside 1-15.
pub fn enhancement_rule(level: u8) -> Option<&'static EnhancementRule> {
    if level < MIN_LEVEL {
        return None;
    }
    ENHANCEMENT_RULES.get((level - 1) as usize)
}

pub fn success_rate(level: u8) -> f64 {
    enhancement_rule(level).map_or(0.0, |r| r.success_rate)
}

pub fn damage_rate(level: u8) -> f64 {
    enhancement_rule(level).map_or(0.0, |r| r.damage_rate)
}

pub fn failure_penalty(level: u8) -> i8 {
    enhancement_rule(level).map_or(0, |r| r.failure_penalty)
}

/// Level after a failed attempt, floored at 1.
pub fn failed_level(level: u8, penalty: i8) -> u8 {
    let dropped = i16::from(level) + i16::from(penalty.min(0));
    dropped.max(i16::from(MIN_LEVEL)) as u8
}

/// Clamp a user-supplied level into 1-15.
pub fn clamp_level(level: i64) -> u8 {
    level.clamp(i64::from(MIN_LEVEL), i64::from(MAX_LEVEL)) as u8
}

/// Clamp a user-supplied attempt count to at least 1.
pub fn clamp_attempts(attempts: i64) -> usize {
    attempts.max(1) as usize
}

/// Format a level for display (e.g., "+7")
pub fn level_prefix(level: u8) -> String {
    format!("+{}", level)
}

/// Material grade: 1=+1-3, 2=+4-6, 3=+7-10, 4=+11-13, 5=+14, 6=+15
pub fn level_tier(level: u8) -> u8 {
    match level {
        0..=3 => 1,
        4..=6 => 2,
        7..=10 => 3,
        11..=13 => 4,
        14 => 5,
        _ => 6,
    }
}

/// (shards, crystals, essence) consumed per tier
const MATERIAL_COSTS: [(u64, u64, u64); 6] = [
    (18, 1, 1),
    (18, 2, 2),
    (18, 3, 2),
    (18, 4, 3),
    (18, 5, 4),
    (24, 6, 6),
];

/// Currency spent on one attempt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptCost {
    pub gold: u64,
    pub shards: u64,
    pub crystals: u64,
    pub essence: u64,
}

impl AttemptCost {
    /// Cost of an attempt that resolved to `new_level`. Materials follow the
    /// grade of the level the item ended on, not the one it started from.
    pub fn for_level(new_level: u8) -> Self {
        let (shards, crystals, essence) = MATERIAL_COSTS[(level_tier(new_level) - 1) as usize];
        Self {
            gold: GOLD_PER_ATTEMPT,
            shards,
            crystals,
            essence,
        }
    }

    /// Gold value of the whole bundle at fixed unit prices.
    pub fn gold_value(&self) -> u64 {
        self.gold
            + self.shards * SHARD_UNIT_PRICE
            + self.crystals * CRYSTAL_UNIT_PRICE
            + self.essence * ESSENCE_UNIT_PRICE
    }

    pub fn monetary_equivalent(&self) -> f64 {
        self.gold_value() as f64 * GOLD_TO_PHP
    }
}

impl std::ops::AddAssign for AttemptCost {
    fn add_assign(&mut self, rhs: Self) {
        self.gold += rhs.gold;
        self.shards += rhs.shards;
        self.crystals += rhs.crystals;
        self.essence += rhs.essence;
    }
}

/// Result of one resolved attempt. Never mutated once logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptOutcome {
    pub previous_level: u8,
    pub success: bool,
    pub new_level: u8,
    pub damage_occurred: bool,
    pub cost: AttemptCost,
}

/// Why a batch run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatchStop {
    ReachedTarget,
    ReachedMax,
    AttemptLimit,
}

/// Outcomes produced by one batch run, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResult {
    pub final_level: u8,
    pub target_level: u8,
    pub outcomes: Vec<AttemptOutcome>,
}

impl BatchResult {
    pub fn stop_reason(&self) -> BatchStop {
        if self.final_level >= self.target_level {
            BatchStop::ReachedTarget
        } else if self.final_level >= MAX_LEVEL {
            BatchStop::ReachedMax
        } else {
            BatchStop::AttemptLimit
        }
    }
}
