//! Single-item enhancement session and its shared, single-driver wrapper.

use crate::constants::DEFAULT_TARGET_LEVEL;
use crate::enhancement::{self, enhancement_rule, AttemptOutcome, BatchResult, MAX_LEVEL, MIN_LEVEL};
use crate::error::{EnhanceError, Result};
use crate::statistics::{aggregate, Statistics};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};

/// Who is allowed to mutate a shared session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Driver {
    Manual,
    Batch,
    Auto,
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Driver::Manual => "manual",
            Driver::Batch => "batch",
            Driver::Auto => "auto-enhance",
        };
        f.write_str(name)
    }
}

/// One gear item being enhanced: current level, target and attempt log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnhanceSession {
    current_level: u8,
    target_level: u8,
    log: Vec<AttemptOutcome>,
}

impl Default for EnhanceSession {
    fn default() -> Self {
        Self::new()
    }
}

impl EnhanceSession {
    pub fn new() -> Self {
        Self {
            current_level: MIN_LEVEL,
            target_level: DEFAULT_TARGET_LEVEL,
            log: Vec::new(),
        }
    }

    pub fn current_level(&self) -> u8 {
        self.current_level
    }

    pub fn target_level(&self) -> u8 {
        self.target_level
    }

    pub fn log(&self) -> &[AttemptOutcome] {
        &self.log
    }

    pub fn is_maxed(&self) -> bool {
        self.current_level >= MAX_LEVEL
    }

    /// Resolve one attempt at the current level and log it.
    /// Returns `Ok(None)` without touching the log when already at max.
    pub fn attempt(&mut self, rng: &mut impl Rng) -> Result<Option<AttemptOutcome>> {
        if self.is_maxed() {
            return Ok(None);
        }
        let outcome = enhancement::resolve_attempt(self.current_level, rng)?;
        debug!(
            from = outcome.previous_level,
            to = outcome.new_level,
            success = outcome.success,
            damage = outcome.damage_occurred,
            "enhancement attempt"
        );
        self.current_level = outcome.new_level;
        self.log.push(outcome);
        Ok(Some(outcome))
    }

    /// Run a batch toward the target level and append its outcomes.
    pub fn run_batch(&mut self, max_attempts: usize, rng: &mut impl Rng) -> Result<BatchResult> {
        let result =
            enhancement::run_batch(self.current_level, self.target_level, max_attempts, rng)?;
        info!(
            start = self.current_level,
            target = self.target_level,
            attempts = result.outcomes.len(),
            final_level = result.final_level,
            "batch finished"
        );
        self.current_level = result.final_level;
        self.log.extend_from_slice(&result.outcomes);
        Ok(result)
    }

    /// Back to level 1 with an empty log and the default target.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Move the item straight to `level`. The log is left as is.
    pub fn jump_to_level(&mut self, level: u8) -> Result<()> {
        enhancement_rule(level).ok_or(EnhanceError::InvalidLevel(level))?;
        self.current_level = level;
        Ok(())
    }

    pub fn set_target_level(&mut self, level: u8) -> Result<()> {
        enhancement_rule(level).ok_or(EnhanceError::InvalidLevel(level))?;
        self.target_level = level;
        Ok(())
    }

    pub fn statistics(&self) -> Statistics {
        aggregate(&self.log)
    }

    /// Zero-failure chance of reaching the target from here.
    pub fn reach_probability(&self) -> f64 {
        enhancement::reach_target_probability(self.current_level, self.target_level)
    }
}

struct SessionSlot {
    session: EnhanceSession,
    driver: Option<Driver>,
}

/// Session shared between a manual trigger and a background driver.
///
/// Each operation holds the lock for one attempt or one batch only. A driver
/// that acquires control keeps it until it calls [`SharedSession::release`];
/// every other driver gets [`EnhanceError::SessionBusy`] in the meantime.
#[derive(Clone)]
pub struct SharedSession {
    inner: Arc<Mutex<SessionSlot>>,
}

impl Default for SharedSession {
    fn default() -> Self {
        Self::new(EnhanceSession::new())
    }
}

impl SharedSession {
    pub fn new(session: EnhanceSession) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SessionSlot {
                session,
                driver: None,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionSlot> {
        // An attempt never leaves the session half-written, so a poisoned
        // lock still guards consistent state.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn check_free(slot: &SessionSlot, driver: Driver) -> Result<()> {
        match slot.driver {
            Some(holder) if holder != driver => {
                warn!(%holder, requested = %driver, "session busy");
                Err(EnhanceError::SessionBusy(holder))
            }
            _ => Ok(()),
        }
    }

    /// Take control of the session for `driver`. Fails while any driver,
    /// including another instance of the same kind, holds control.
    pub fn acquire(&self, driver: Driver) -> Result<()> {
        let mut slot = self.lock();
        if let Some(holder) = slot.driver {
            warn!(%holder, requested = %driver, "session already controlled");
            return Err(EnhanceError::SessionBusy(holder));
        }
        slot.driver = Some(driver);
        info!(%driver, "driver acquired session");
        Ok(())
    }

    /// Give up control. A no-op unless `driver` is the holder.
    pub fn release(&self, driver: Driver) {
        let mut slot = self.lock();
        if slot.driver == Some(driver) {
            slot.driver = None;
            info!(%driver, "driver released session");
        }
    }

    pub fn holder(&self) -> Option<Driver> {
        self.lock().driver
    }

    /// Single manual attempt.
    pub fn attempt(&self, rng: &mut impl Rng) -> Result<Option<AttemptOutcome>> {
        let mut slot = self.lock();
        Self::check_free(&slot, Driver::Manual)?;
        slot.session.attempt(rng)
    }

    pub fn run_batch(&self, max_attempts: usize, rng: &mut impl Rng) -> Result<BatchResult> {
        let mut slot = self.lock();
        Self::check_free(&slot, Driver::Batch)?;
        slot.session.run_batch(max_attempts, rng)
    }

    pub fn reset(&self) -> Result<()> {
        let mut slot = self.lock();
        Self::check_free(&slot, Driver::Manual)?;
        slot.session.reset();
        Ok(())
    }

    pub fn jump_to_level(&self, level: u8) -> Result<()> {
        let mut slot = self.lock();
        Self::check_free(&slot, Driver::Manual)?;
        slot.session.jump_to_level(level)
    }

    pub fn set_target_level(&self, level: u8) -> Result<()> {
        let mut slot = self.lock();
        Self::check_free(&slot, Driver::Manual)?;
        slot.session.set_target_level(level)
    }

    /// Run `f` against the session as `driver`, which must hold control.
    pub fn with_session<T>(
        &self,
        driver: Driver,
        f: impl FnOnce(&mut EnhanceSession) -> T,
    ) -> Result<T> {
        let mut slot = self.lock();
        Self::check_free(&slot, driver)?;
        Ok(f(&mut slot.session))
    }

    /// Copy of the current state for display.
    pub fn snapshot(&self) -> EnhanceSession {
        self.lock().session.clone()
    }

    pub fn statistics(&self) -> Statistics {
        self.lock().session.statistics()
    }
}
