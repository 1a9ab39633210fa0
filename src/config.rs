//! System configuration parameters
//!
//! All tunable parameters for the synchronization core. Values come
//! from the board support layer at startup; invalid values are fatal
//! before any task is created.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Hard ceiling on the diagnostic queue's backing storage.
/// `log_queue_capacity` may be configured anywhere in `1..=MAX_LOG_QUEUE`.
pub const MAX_LOG_QUEUE: usize = 32;

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    // --- Input filtering ---
    /// Minimum stable-sample duration (milliseconds) to confirm an edge
    pub debounce_interval_ms: u32,

    // --- Sequence matching ---
    /// Inactivity window (milliseconds) after which partial sequence
    /// progress is discarded
    pub sequence_timeout_ms: u32,

    // --- Rendezvous ---
    /// Watchdog's required rendezvous cadence (milliseconds)
    pub barrier_period_ms: u32,

    // --- Diagnostics ---
    /// Backpressure threshold (record count) before enqueue blocks or fails
    pub log_queue_capacity: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            debounce_interval_ms: 20,
            sequence_timeout_ms: 5000,
            barrier_period_ms: 30_000,
            log_queue_capacity: 10,
        }
    }
}

impl SyncConfig {
    /// Fail-fast validation, run once before scheduling starts.
    pub fn validate(&self) -> Result<()> {
        if self.debounce_interval_ms == 0 || self.debounce_interval_ms > 250 {
            return Err(Error::Config("debounce interval out of range (1..=250 ms)"));
        }
        if self.sequence_timeout_ms == 0 {
            return Err(Error::Config("sequence timeout must be nonzero"));
        }
        if self.barrier_period_ms == 0 {
            return Err(Error::Config("barrier period must be nonzero"));
        }
        if self.log_queue_capacity == 0 || self.log_queue_capacity > MAX_LOG_QUEUE {
            return Err(Error::Config("log queue capacity out of range"));
        }
        Ok(())
    }
}
