//! Monte Carlo simulator for enhancement runs.
//!
//! Runs thousands of independent batch climbs to analyze:
//! - How often a target level is actually reached
//! - Attempts and currency spent per climb
//! - Where runs stall when they hit the attempt limit
//! - Empirical success frequency per level against the rule table
//!
//! Every run goes through `run_batch` and `aggregate`, so results match
//! what a session would see.

mod config;
mod report;
mod runner;

pub use config::SimConfig;
pub use report::{RunStats, SimReport};
pub use runner::run_simulation;
