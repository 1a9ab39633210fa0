//! Unified error types for the synchronization core.
//!
//! Follows embedded best practice: a single `Error` enum that every subsystem
//! can convert into, keeping the top-level control loop's error handling
//! uniform. All variants are `Copy` so they can be cheaply passed through
//! task boundaries without allocation.
//!
//! Only configuration errors are fatal. Transient input noise, session
//! timeouts, queue saturation and rendezvous timeouts are all expected
//! operating conditions and are surfaced as ordinary result values by the
//! components that observe them, never through this type.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fatal initialisation failure funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Configuration is invalid (zero-length sequence, zero-capacity
    /// queue, out-of-range interval). Fatal before scheduling starts.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Diagnostic queue saturation
// ---------------------------------------------------------------------------

/// Result of a failed enqueue on the diagnostic queue.
///
/// Saturation is not a crash: task-context callers choose the blocking
/// policy and may see `Timeout`; interrupt-context callers use the
/// non-blocking policy and may see `Full`. Either way the failure is
/// surfaced to the caller and counted by the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitError {
    /// Queue was full and the non-blocking policy was in effect.
    Full,
    /// Queue stayed full for the whole blocking timeout.
    Timeout,
}

impl fmt::Display for EmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full => write!(f, "log queue full"),
            Self::Timeout => write!(f, "log queue full past timeout"),
        }
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
