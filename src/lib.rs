//! Event synchronization and diagnostics core.
//!
//! The reusable substance of a family of preemptive control exercises:
//! signal debouncing, ordered-sequence matching with timeout reset,
//! multi-party rendezvous with timeout-based fault diagnosis, and
//! decoupled asynchronous diagnostic logging.
//!
//! Hardware concerns (pin setup, LED patterns, UART framing, task
//! bootstrap) live in the board support layer; this crate only sees
//! logical samples, discrete events, and monotonic timestamps.

#![deny(unused_must_use)]

pub mod barrier;
pub mod clock;
pub mod config;
pub mod debounce;
pub mod diag;
pub mod error;
pub mod events;
pub mod sequence;
pub mod supervisor;

pub use barrier::{ParticipantSet, RendezvousBarrier, WaitOutcome, WaitPolicy};
pub use clock::{Clock, MonotonicClock};
pub use config::SyncConfig;
pub use debounce::{DebounceFilter, Edge};
pub use diag::{DiagQueue, LogRecord, LogSink};
pub use error::{EmitError, Error, Result};
pub use events::{Event, InputHub};
pub use sequence::{MatchResult, ResetReason, SequenceDelegate, SequenceMatcher};
pub use supervisor::{CycleOutcome, SupervisorState, WatchdogSupervisor};
