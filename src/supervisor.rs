//! Watchdog supervisor.
//!
//! Drives a [`RendezvousBarrier`] on a fixed cadence: every cycle it
//! waits for all participants with the barrier period as timeout. Full
//! success logs the elapsed time since the previous success and keeps
//! monitoring; a partial timeout diagnoses exactly which participants
//! failed to arrive and suspends the supervisor.
//!
//! Suspension is fail-stop by design: a missed deadline means the
//! system is no longer meeting its timing contract, and restarting
//! monitoring automatically would only mask that. [`resume`] is the
//! explicit external intervention.
//!
//! [`resume`]: WatchdogSupervisor::resume

use std::time::Duration;

use log::{error, info};

use crate::barrier::{ParticipantSet, RendezvousBarrier, WaitOutcome, WaitPolicy};
use crate::clock::Clock;
use crate::diag::{DiagQueue, LogRecord};
use crate::error::{Error, Result};

/// Success line, one per completed cycle.
pub const T_RENDEZVOUS_OK: &str = "OK. elapsed ms since last OK: {}";
/// Failure lines, count-matched like the original deadline reports.
pub const T_MISSING_1: &str = "FAIL. participants missing: {}";
pub const T_MISSING_2: &str = "FAIL. participants missing: {} {}";
pub const T_MISSING_3: &str = "FAIL. participants missing: {} {} {}";

/// How long the supervisor (task context) will block to emit a record.
const EMIT_TIMEOUT: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorState {
    /// Issuing periodic wait-for-all cycles.
    Monitoring,
    /// Terminal after a single timeout; requires [`WatchdogSupervisor::resume`].
    Suspended,
}

/// Outcome of one monitoring cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Every participant arrived within the period.
    AllArrived { elapsed_ms: u64 },
    /// Timed out; the supervisor is now (or already was) suspended.
    /// `missing` holds the bits of the absent participants.
    Suspended { missing: u32 },
}

pub struct WatchdogSupervisor {
    participants: ParticipantSet,
    period: Duration,
    state: SupervisorState,
    last_ok_ms: u64,
    missing: u32,
}

impl WatchdogSupervisor {
    pub fn new(participants: ParticipantSet, period_ms: u32) -> Result<Self> {
        if period_ms == 0 {
            return Err(Error::Config("barrier period must be nonzero"));
        }
        Ok(Self {
            participants,
            period: Duration::from_millis(u64::from(period_ms)),
            state: SupervisorState::Monitoring,
            last_ok_ms: 0,
            missing: 0,
        })
    }

    pub fn state(&self) -> SupervisorState {
        self.state
    }

    pub fn is_suspended(&self) -> bool {
        self.state == SupervisorState::Suspended
    }

    /// Bits of the participants that missed the failed cycle (zero
    /// while monitoring).
    pub fn missing(&self) -> u32 {
        self.missing
    }

    /// External intervention: re-arm monitoring after a suspension.
    pub fn resume(&mut self, now_ms: u64) {
        info!("watchdog: resumed by external intervention");
        self.state = SupervisorState::Monitoring;
        self.missing = 0;
        self.last_ok_ms = now_ms;
    }

    /// Run one monitoring cycle: wait for all participants with the
    /// period as timeout, then report through the diagnostic queue.
    ///
    /// On a suspended supervisor this is a no-op returning the stored
    /// failure; no further waits are issued until [`resume`].
    ///
    /// [`resume`]: Self::resume
    pub fn run_cycle(
        &mut self,
        barrier: &RendezvousBarrier,
        diag: &DiagQueue,
        clock: &dyn Clock,
    ) -> CycleOutcome {
        if self.state == SupervisorState::Suspended {
            return CycleOutcome::Suspended {
                missing: self.missing,
            };
        }

        let required = self.participants.full_mask();
        match barrier.wait(required, WaitPolicy::All, true, self.period) {
            WaitOutcome::Satisfied(_) => {
                let now = clock.now_ms();
                let elapsed = now.wrapping_sub(self.last_ok_ms);
                self.last_ok_ms = now;
                self.emit(diag, LogRecord::new(T_RENDEZVOUS_OK, &[elapsed as u32], now));
                CycleOutcome::AllArrived { elapsed_ms: elapsed }
            }
            WaitOutcome::TimedOut(present) => {
                let missing = required & !present;
                self.missing = missing;
                self.state = SupervisorState::Suspended;

                let names = self.participants.names_in(missing);
                error!("watchdog: deadline missed by {:?}, suspending", names.as_slice());
                self.emit_missing(diag, missing, clock.now_ms());
                CycleOutcome::Suspended { missing }
            }
        }
    }

    // ── Internal ──────────────────────────────────────────────

    /// Report the missing participants by identity (1-based participant
    /// numbers, the convention of the deadline reports), in groups of
    /// up to three per record.
    fn emit_missing(&self, diag: &DiagQueue, missing: u32, now_ms: u64) {
        let mut ids: heapless::Vec<u32, 32> = heapless::Vec::new();
        for i in 0..self.participants.len() {
            if missing & (1 << i) != 0 {
                let _ = ids.push(i as u32 + 1);
            }
        }

        for group in ids.chunks(3) {
            let template = match group.len() {
                1 => T_MISSING_1,
                2 => T_MISSING_2,
                _ => T_MISSING_3,
            };
            self.emit(diag, LogRecord::new(template, group, now_ms));
        }
    }

    fn emit(&self, diag: &DiagQueue, record: LogRecord) {
        // Task context: block-until-space, bounded. A saturated queue
        // past the timeout is counted by the queue and traced here.
        if let Err(e) = diag.emit_blocking(record, EMIT_TIMEOUT) {
            log::warn!("watchdog: diagnostic dropped ({e})");
        }
    }
}
