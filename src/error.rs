//! Error types for the enhancement engine and its sessions.

use crate::session::Driver;
use thiserror::Error;

/// Errors raised by the enhancement core and the session layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EnhanceError {
    /// No enhancement rule exists for the requested level.
    #[error("no enhancement rule for level {0} (valid levels are 1-15)")]
    InvalidLevel(u8),

    /// Another driver currently controls the session.
    #[error("session is controlled by the {0} driver")]
    SessionBusy(Driver),

    /// The background driver task ended without reporting a result.
    #[error("auto-enhance task ended unexpectedly")]
    DriverAborted,
}

pub type Result<T> = std::result::Result<T, EnhanceError>;
