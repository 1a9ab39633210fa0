//! Rendezvous barrier over a participant bitmask.
//!
//! Independent producers each own one bit and report arrival with
//! [`RendezvousBarrier::signal`]; a single waiter aggregates arrivals
//! with [`RendezvousBarrier::wait`] under wait-for-all or wait-for-any
//! semantics and an explicit timeout. Bit accumulation is commutative:
//! arrival order never changes the outcome, only the latency.
//!
//! The accumulated mask is the only state shared across execution
//! contexts; it is mutated inside one short critical section, so every
//! `signal` appears atomic to concurrent signalers and to the waiter.
//! Signaling an already-set bit is idempotent.

use std::sync::{Condvar, Mutex};
use std::time::{Duration, Instant};

use crate::error::{Error, Result};

/// Maximum participants in one universe (one `u32` bit each).
pub const MAX_PARTICIPANTS: usize = 32;

// ── Participant universe ──────────────────────────────────────

/// Fixed universe of named participants, one bit each, assigned at
/// configuration time and never reassigned. Bit assignment is
/// injective by construction: participant `i` owns bit `1 << i`.
pub struct ParticipantSet {
    names: heapless::Vec<&'static str, MAX_PARTICIPANTS>,
}

impl ParticipantSet {
    pub fn new(names: &[&'static str]) -> Result<Self> {
        if names.is_empty() {
            return Err(Error::Config("participant set must be non-empty"));
        }
        let names = heapless::Vec::from_slice(names)
            .map_err(|()| Error::Config("too many participants (max 32)"))?;
        Ok(Self { names })
    }

    /// Number of participants.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// The bit owned by participant `index`.
    pub fn bit(&self, index: usize) -> u32 {
        debug_assert!(index < self.names.len());
        1 << index
    }

    /// Mask covering every participant.
    pub fn full_mask(&self) -> u32 {
        if self.names.len() == MAX_PARTICIPANTS {
            u32::MAX
        } else {
            (1 << self.names.len()) - 1
        }
    }

    /// Participant name for a bit index.
    pub fn name(&self, index: usize) -> &'static str {
        self.names[index]
    }

    /// Names of every participant present in `mask`, in bit order.
    pub fn names_in(&self, mask: u32) -> heapless::Vec<&'static str, MAX_PARTICIPANTS> {
        let mut out = heapless::Vec::new();
        for (i, name) in self.names.iter().enumerate() {
            if mask & (1 << i) != 0 {
                let _ = out.push(*name);
            }
        }
        out
    }
}

// ── Barrier ───────────────────────────────────────────────────

/// How `wait` decides it is satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitPolicy {
    /// Unblock only when every required bit has been signaled.
    All,
    /// Unblock on the first required bit.
    Any,
}

/// Result of a `wait` call. Both arms carry the bits present at the
/// moment of unblocking, before any clear-on-exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    Satisfied(u32),
    TimedOut(u32),
}

/// Aggregator of independent arrival signals.
///
/// One waiter at a time per instance; any number of concurrent
/// signalers, including interrupt-context producers (`signal` performs
/// a single OR-and-notify critical section and never blocks on the
/// waiter).
pub struct RendezvousBarrier {
    accumulated: Mutex<u32>,
    arrived: Condvar,
}

impl RendezvousBarrier {
    pub fn new() -> Self {
        Self {
            accumulated: Mutex::new(0),
            arrived: Condvar::new(),
        }
    }

    /// Report arrival of the participants in `bits`. Idempotent per
    /// bit; wakes the waiter so a satisfied wait unblocks promptly.
    pub fn signal(&self, bits: u32) {
        let mut mask = self.accumulated.lock().unwrap();
        *mask |= bits;
        drop(mask);
        self.arrived.notify_one();
    }

    /// Bits currently accumulated.
    pub fn pending(&self) -> u32 {
        *self.accumulated.lock().unwrap()
    }

    /// Wait for the required bits.
    ///
    /// `clear_on_exit` clears the *required* bits atomically as part of
    /// a satisfied unblock, so each barrier cycle starts clean. A
    /// timed-out wait never clears anything, so the caller can inspect
    /// exactly which participants arrived. Call sites intentionally
    /// differ on this flag; it is a parameter, not a policy.
    pub fn wait(
        &self,
        required_mask: u32,
        policy: WaitPolicy,
        clear_on_exit: bool,
        timeout: Duration,
    ) -> WaitOutcome {
        let deadline = Instant::now() + timeout;
        let mut mask = self.accumulated.lock().unwrap();

        loop {
            let present = *mask & required_mask;
            let satisfied = match policy {
                WaitPolicy::All => present == required_mask,
                WaitPolicy::Any => present != 0,
            };
            if satisfied {
                if clear_on_exit {
                    *mask &= !required_mask;
                }
                return WaitOutcome::Satisfied(present);
            }

            let now = Instant::now();
            if now >= deadline {
                return WaitOutcome::TimedOut(present);
            }
            let (guard, _) = self.arrived.wait_timeout(mask, deadline - now).unwrap();
            mask = guard;
        }
    }

    /// Clear accumulated bits outside a wait (a waiter that chooses not
    /// to clear on exit clears inside its own loop instead).
    pub fn clear(&self, bits: u32) {
        let mut mask = self.accumulated.lock().unwrap();
        *mask &= !bits;
    }
}

impl Default for RendezvousBarrier {
    fn default() -> Self {
        Self::new()
    }
}
