//! Ordered-sequence matcher with timeout reset.
//!
//! Consumes confirmed input events and matches them against a fixed
//! expected sequence (the "unlock code"). Progress is abandoned on a
//! wrong input or when the gap since the last accepted event exceeds
//! the session timeout; a mismatch never receives partial credit and the
//! match always restarts from the sequence origin.
//!
//! Completion is transient: the success delegate fires once and the
//! matcher re-arms to its initial state.

use log::info;

use crate::error::{Error, Result};
use crate::events::Event;

/// Maximum expected-sequence length.
pub const MAX_SEQUENCE: usize = 16;

/// Outcome of feeding one event to the matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchResult {
    /// The event matched; `index` entries are now confirmed.
    Advanced { index: usize },
    /// The full sequence matched. The matcher has re-armed.
    Completed,
    /// Progress was discarded and the session deactivated.
    Reset(ResetReason),
}

/// Why the matcher discarded progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetReason {
    /// The event did not match the expected value at the current index.
    WrongInput,
    /// The gap since the last accepted event exceeded the session timeout.
    Stale,
}

/// Callback fired once per completed sequence.
///
/// The matcher knows nothing about LEDs or locks; the caller decides
/// what "success" does (blink a pattern, release a latch, …).
pub trait SequenceDelegate {
    fn on_sequence_complete(&mut self);
}

/// No-op delegate for callers that only consume the [`MatchResult`].
pub struct NullDelegate;

impl SequenceDelegate for NullDelegate {
    fn on_sequence_complete(&mut self) {}
}

pub struct SequenceMatcher {
    expected: heapless::Vec<u8, MAX_SEQUENCE>,
    timeout_ms: u32,
    index: usize,
    session_active: bool,
    last_accepted_ms: u64,
}

impl SequenceMatcher {
    /// Create a matcher. A zero-length expected sequence is a fatal
    /// configuration error.
    pub fn new(expected: &[u8], timeout_ms: u32) -> Result<Self> {
        if expected.is_empty() {
            return Err(Error::Config("expected sequence must be non-empty"));
        }
        if timeout_ms == 0 {
            return Err(Error::Config("sequence timeout must be nonzero"));
        }
        let expected = heapless::Vec::from_slice(expected)
            .map_err(|()| Error::Config("expected sequence too long"))?;
        Ok(Self {
            expected,
            timeout_ms,
            index: 0,
            session_active: false,
            last_accepted_ms: 0,
        })
    }

    /// Current match index (confirmed entries).
    pub fn index(&self) -> usize {
        self.index
    }

    /// Whether a session is in progress.
    pub fn session_active(&self) -> bool {
        self.session_active
    }

    /// Feed one event value.
    ///
    /// A stale session resets to index 0 *before* the event is
    /// evaluated: the event may start a fresh session (`Advanced`) or,
    /// if it also mismatches, the reported reason stays `Stale`.
    pub fn accept(
        &mut self,
        value: u8,
        now_ms: u64,
        delegate: &mut dyn SequenceDelegate,
    ) -> MatchResult {
        let mut stale = false;
        if self.session_active && now_ms.wrapping_sub(self.last_accepted_ms) > u64::from(self.timeout_ms)
        {
            info!("sequence: stale session, discarding {} entries", self.index);
            self.index = 0;
            self.session_active = false;
            stale = true;
        }

        if !self.session_active {
            self.session_active = true;
        }

        if value == self.expected[self.index] {
            self.index += 1;
            self.last_accepted_ms = now_ms;
            if self.index == self.expected.len() {
                info!("sequence: complete");
                delegate.on_sequence_complete();
                self.index = 0;
                self.session_active = false;
                return MatchResult::Completed;
            }
            MatchResult::Advanced { index: self.index }
        } else {
            self.index = 0;
            self.session_active = false;
            MatchResult::Reset(if stale {
                ResetReason::Stale
            } else {
                ResetReason::WrongInput
            })
        }
    }

    /// Feed a confirmed [`Event`]. Button presses carry the channel id
    /// as the match value; other events are not sequence input.
    pub fn accept_event(
        &mut self,
        event: &Event,
        delegate: &mut dyn SequenceDelegate,
    ) -> Option<MatchResult> {
        match event {
            Event::ButtonPress { channel_id, at_ms } => {
                Some(self.accept(*channel_id, *at_ms, delegate))
            }
            Event::DirectionalTurn { .. } => None,
        }
    }
}
