//! Property tests over seeded batches, folds and resets.

use forge::enhancement::{reach_target_probability, resolve_attempt, run_batch, MAX_LEVEL};
use forge::session::EnhanceSession;
use forge::statistics::{aggregate, Statistics};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

proptest! {
    #[test]
    fn batch_stops_exactly_at_first_stop_condition(
        seed in any::<u64>(),
        start in 1u8..=15,
        target in 1u8..=15,
        max_attempts in 0usize..1000,
    ) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let result = run_batch(start, target, max_attempts, &mut rng).unwrap();

        prop_assert!((1..=MAX_LEVEL).contains(&result.final_level));
        prop_assert!(result.outcomes.len() <= max_attempts);

        // No attempt is resolved once a stop condition already holds
        let mut level = start;
        for outcome in &result.outcomes {
            prop_assert!(level < target && level < MAX_LEVEL);
            prop_assert_eq!(outcome.previous_level, level);
            level = outcome.new_level;
        }
        prop_assert_eq!(level, result.final_level);

        let stopped_naturally = result.final_level >= target || result.final_level >= MAX_LEVEL;
        prop_assert!(stopped_naturally || result.outcomes.len() == max_attempts);
    }

    #[test]
    fn full_climb_batch_bounds(seed in any::<u64>()) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let result = run_batch(1, 15, 1000, &mut rng).unwrap();
        prop_assert!((1..=15).contains(&result.final_level));
        prop_assert!(result.outcomes.len() <= 1000);
        prop_assert!(result.final_level == 15 || result.outcomes.len() == 1000);
    }

    #[test]
    fn resolved_level_stays_in_range(seed in any::<u64>(), level in 1u8..=15) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let outcome = resolve_attempt(level, &mut rng).unwrap();
        prop_assert!((1..=MAX_LEVEL).contains(&outcome.new_level));
        if outcome.success {
            prop_assert_eq!(outcome.new_level, (level + 1).min(MAX_LEVEL));
        } else {
            prop_assert!(outcome.new_level <= level);
        }
    }

    #[test]
    fn reach_probability_is_a_probability(current in 0u8..=20, target in 0u8..=20) {
        let p = reach_target_probability(current, target);
        prop_assert!((0.0..=1.0).contains(&p));
        if target <= current {
            prop_assert_eq!(p, 1.0);
        }
    }

    #[test]
    fn aggregate_extends_by_one_record(seed in any::<u64>(), cut in 0usize..200) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let log = run_batch(1, 15, 200, &mut rng).unwrap().outcomes;
        let n = cut.min(log.len().saturating_sub(1));
        prop_assume!(n < log.len());

        let mut prefix = aggregate(&log[..n]);
        prefix.record(&log[n]);
        prop_assert_eq!(prefix, aggregate(&log[..=n]));
    }

    #[test]
    fn reset_is_idempotent(seed in any::<u64>(), attempts in 0usize..100) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut session = EnhanceSession::new();
        session.set_target_level(15).unwrap();
        session.run_batch(attempts, &mut rng).unwrap();

        session.reset();
        prop_assert_eq!(&session, &EnhanceSession::new());
        prop_assert_eq!(session.statistics(), Statistics::new());
        session.reset();
        prop_assert_eq!(&session, &EnhanceSession::new());
    }
}
