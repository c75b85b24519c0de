//! Forge - gear enhancement outcome engine
//!
//! Rule table and attempt resolver, statistics over attempt logs, a
//! single-item session with driver exclusion, the periodic auto-enhance
//! driver and a Monte Carlo simulator.

pub mod auto_enhance;
pub mod build_info;
pub mod constants;
pub mod enhancement;
pub mod error;
pub mod session;
pub mod simulator;
pub mod statistics;

pub use enhancement::{
    reach_target_probability, resolve_attempt, run_batch, AttemptCost, AttemptOutcome,
    BatchResult, EnhancementRule, MAX_LEVEL, MIN_LEVEL,
};
pub use error::EnhanceError;
pub use session::{Driver, EnhanceSession, SharedSession};
pub use statistics::{aggregate, Statistics};
