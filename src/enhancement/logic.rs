use super::types::*;
use crate::error::{EnhanceError, Result};
use rand::Rng;

/// Resolve one enhancement attempt at `level`.
///
/// Always draws two uniform values, success first and damage second, even
/// on the guaranteed levels. Both success and failure are `Ok`.
pub fn resolve_attempt<R: Rng>(level: u8, rng: &mut R) -> Result<AttemptOutcome> {
    let rule = enhancement_rule(level).ok_or(EnhanceError::InvalidLevel(level))?;

    let r_success = rng.gen::<f64>();
    let r_damage = rng.gen::<f64>();

    let success = r_success < rule.success_rate;
    let damage_occurred = r_damage < rule.damage_rate;
    let new_level = if success {
        (level + 1).min(MAX_LEVEL)
    } else {
        failed_level(level, rule.failure_penalty)
    };

    Ok(AttemptOutcome {
        previous_level: level,
        success,
        new_level,
        damage_occurred,
        cost: AttemptCost::for_level(new_level),
    })
}

/// Probability of climbing from `current` to `target` with no failures on
/// the way. Recovering after a failure is not counted.
pub fn reach_target_probability(current: u8, target: u8) -> f64 {
    if target <= current {
        return 1.0;
    }
    let mut probability = 1.0;
    for level in current..target {
        match enhancement_rule(level) {
            Some(rule) => probability *= rule.success_rate,
            None => return 0.0,
        }
    }
    probability
}

/// Attempt repeatedly from `start_level` until the level reaches `target`,
/// reaches the max level, or `max_attempts` outcomes exist.
pub fn run_batch<R: Rng>(
    start_level: u8,
    target: u8,
    max_attempts: usize,
    rng: &mut R,
) -> Result<BatchResult> {
    if enhancement_rule(start_level).is_none() {
        return Err(EnhanceError::InvalidLevel(start_level));
    }

    let mut level = start_level;
    let mut outcomes = Vec::with_capacity(max_attempts.min(1024));

    while outcomes.len() < max_attempts && level < target && level < MAX_LEVEL {
        let outcome = resolve_attempt(level, rng)?;
        level = outcome.new_level;
        outcomes.push(outcome);
    }

    Ok(BatchResult {
        final_level: level,
        target_level: target,
        outcomes,
    })
}
