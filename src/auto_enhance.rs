//! Periodic auto-enhance driver.
//!
//! [`AutoRun`] is the tick-by-tick state machine: each call to
//! [`AutoRun::step`] checks for a stop request, then for the natural end
//! conditions, and only then resolves a single attempt. With the `auto`
//! feature, [`spawn_auto_enhance`] drives it from a tokio interval.

use crate::enhancement::{AttemptOutcome, MAX_LEVEL};
use crate::error::Result;
use crate::session::EnhanceSession;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Why an auto-enhance run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AutoStop {
    Cancelled,
    ReachedTarget,
    ReachedMax,
}

/// What one tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoStep {
    Attempted(AttemptOutcome),
    Finished(AutoStop),
}

/// Cloneable stop switch for a running [`AutoRun`].
#[derive(Debug, Clone, Default)]
pub struct AutoStopper {
    flag: Arc<AtomicBool>,
}

impl AutoStopper {
    /// Request a stop. Takes effect before the next attempt.
    pub fn stop(&self) {
        self.flag.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

#[derive(Debug, Default)]
pub struct AutoRun {
    stopper: AutoStopper,
    attempts: u64,
}

impl AutoRun {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stopper(&self) -> AutoStopper {
        self.stopper.clone()
    }

    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    /// Advance one tick against the session's current and target level.
    pub fn step(&mut self, session: &mut EnhanceSession, rng: &mut impl Rng) -> Result<AutoStep> {
        if self.stopper.is_stopped() {
            return Ok(AutoStep::Finished(AutoStop::Cancelled));
        }
        if session.current_level() >= session.target_level() {
            return Ok(AutoStep::Finished(AutoStop::ReachedTarget));
        }
        if session.current_level() >= MAX_LEVEL {
            return Ok(AutoStep::Finished(AutoStop::ReachedMax));
        }
        match session.attempt(rng)? {
            Some(outcome) => {
                self.attempts += 1;
                Ok(AutoStep::Attempted(outcome))
            }
            None => Ok(AutoStep::Finished(AutoStop::ReachedMax)),
        }
    }
}

/// Totals reported when an auto-enhance run ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoSummary {
    pub attempts: u64,
    pub stop_reason: AutoStop,
    pub final_level: u8,
}

#[cfg(feature = "auto")]
pub use background::{spawn_auto_enhance, AutoConfig, AutoHandle};

#[cfg(feature = "auto")]
mod background {
    use super::{AutoRun, AutoStep, AutoStopper, AutoSummary};
    use crate::constants::TICK_INTERVAL_MS;
    use crate::enhancement::AttemptOutcome;
    use crate::error::{EnhanceError, Result};
    use crate::session::{Driver, SharedSession};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::time::Duration;
    use tokio::sync::mpsc;
    use tokio::task::JoinHandle;
    use tokio::time::MissedTickBehavior;
    use tracing::info;

    /// Settings for a background auto-enhance run.
    #[derive(Debug, Clone)]
    pub struct AutoConfig {
        /// Delay between attempts
        pub interval: Duration,
        /// Random seed for reproducibility (None = random)
        pub seed: Option<u64>,
    }

    impl Default for AutoConfig {
        fn default() -> Self {
            Self {
                interval: Duration::from_millis(TICK_INTERVAL_MS),
                seed: None,
            }
        }
    }

    /// Handle to a running auto-enhance task. Dropping it stops the run.
    pub struct AutoHandle {
        stopper: AutoStopper,
        outcomes: mpsc::UnboundedReceiver<AttemptOutcome>,
        task: Option<JoinHandle<Result<AutoSummary>>>,
    }

    impl AutoHandle {
        pub fn stop(&self) {
            self.stopper.stop();
        }

        pub fn stopper(&self) -> AutoStopper {
            self.stopper.clone()
        }

        /// Next resolved attempt, or `None` once the run has ended.
        pub async fn next_outcome(&mut self) -> Option<AttemptOutcome> {
            self.outcomes.recv().await
        }

        /// Wait for the run to end. Control of the session has been
        /// released by the time this returns.
        pub async fn join(mut self) -> Result<AutoSummary> {
            let Some(task) = self.task.take() else {
                return Err(EnhanceError::DriverAborted);
            };
            match task.await {
                Ok(summary) => summary,
                Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
                Err(_) => Err(EnhanceError::DriverAborted),
            }
        }
    }

    impl Drop for AutoHandle {
        fn drop(&mut self) {
            self.stopper.stop();
        }
    }

    /// Take control of `shared` and attempt once per interval until stopped,
    /// at the target level, or at the max level.
    pub fn spawn_auto_enhance(shared: SharedSession, config: AutoConfig) -> Result<AutoHandle> {
        shared.acquire(Driver::Auto)?;

        let mut run = AutoRun::new();
        let stopper = run.stopper();
        let (tx, rx) = mpsc::unbounded_channel();
        let mut rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        let period = config.interval;

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick fires immediately; attempts start one interval in.
            interval.tick().await;

            let result = loop {
                interval.tick().await;
                let step = shared
                    .with_session(Driver::Auto, |session| run.step(session, &mut rng))
                    .and_then(|step| step);
                match step {
                    Ok(AutoStep::Attempted(outcome)) => {
                        let _ = tx.send(outcome);
                    }
                    Ok(AutoStep::Finished(reason)) => {
                        let final_level = shared.snapshot().current_level();
                        break Ok(AutoSummary {
                            attempts: run.attempts(),
                            stop_reason: reason,
                            final_level,
                        });
                    }
                    Err(e) => break Err(e),
                }
            };

            shared.release(Driver::Auto);
            if let Ok(summary) = &result {
                info!(
                    attempts = summary.attempts,
                    reason = ?summary.stop_reason,
                    final_level = summary.final_level,
                    "auto-enhance stopped"
                );
            }
            result
        });

        info!(interval_ms = period.as_millis() as u64, "auto-enhance started");
        Ok(AutoHandle {
            stopper,
            outcomes: rx,
            task: Some(task),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_step_stops_at_target() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut session = EnhanceSession::new();
        session.set_target_level(4).unwrap();
        let mut run = AutoRun::new();

        for _ in 0..3 {
            assert!(matches!(
                run.step(&mut session, &mut rng).unwrap(),
                AutoStep::Attempted(_)
            ));
        }
        assert_eq!(
            run.step(&mut session, &mut rng).unwrap(),
            AutoStep::Finished(AutoStop::ReachedTarget)
        );
        assert_eq!(run.attempts(), 3);
        assert_eq!(session.log().len(), 3);
    }

    #[test]
    fn test_stop_request_wins_over_pending_attempt() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut session = EnhanceSession::new();
        let mut run = AutoRun::new();
        run.step(&mut session, &mut rng).unwrap();

        run.stopper().stop();
        assert_eq!(
            run.step(&mut session, &mut rng).unwrap(),
            AutoStep::Finished(AutoStop::Cancelled)
        );
        assert_eq!(session.log().len(), 1);
    }

    #[test]
    fn test_step_at_max_level() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut session = EnhanceSession::new();
        session.set_target_level(MAX_LEVEL).unwrap();
        session.jump_to_level(MAX_LEVEL).unwrap();
        let mut run = AutoRun::new();
        // target == max, so the target check reports first
        assert_eq!(
            run.step(&mut session, &mut rng).unwrap(),
            AutoStep::Finished(AutoStop::ReachedTarget)
        );
    }
}
