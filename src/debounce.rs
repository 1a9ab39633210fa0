//! Two-sample debounce filter.
//!
//! Converts noisy raw digital samples into confirmed edge events. The
//! filter is a pure, timestamp-driven state machine: a raw change away
//! from the stable value opens a candidate window; a re-sample after
//! the debounce interval that still differs commits the transition and
//! emits an edge, while a re-sample that reverted cancels the candidate
//! silently. Transient bounces shorter than the interval never surface.
//!
//! No queue, no blocking; safe to drive from a tight poll loop or an
//! interrupt-context sampler. State is single-owner; one filter per
//! physical input channel.

/// Confirmed logical transition of a binary input after debouncing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// Stable value went `false` → `true`.
    Rising,
    /// Stable value went `true` → `false`.
    Falling,
}

/// Internal filter state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FilterState {
    /// No transition pending.
    Idle,
    /// A raw change was observed at `since_ms`; awaiting confirmation.
    Candidate { since_ms: u64 },
}

/// Debounce filter for one input channel.
pub struct DebounceFilter {
    channel_id: u8,
    interval_ms: u32,
    state: FilterState,
    last_raw: bool,
    /// Last confirmed stable value.
    stable: bool,
    /// Timestamp of the last confirmed transition.
    last_edge_ms: u64,
}

impl DebounceFilter {
    /// Create a filter with the given debounce interval and initial
    /// stable value (typically the released/inactive level).
    pub fn new(channel_id: u8, interval_ms: u32, initial: bool) -> Self {
        Self {
            channel_id,
            interval_ms,
            state: FilterState::Idle,
            last_raw: initial,
            stable: initial,
            last_edge_ms: 0,
        }
    }

    /// Input channel this filter monitors.
    pub fn channel_id(&self) -> u8 {
        self.channel_id
    }

    /// Last confirmed stable value.
    pub fn stable(&self) -> bool {
        self.stable
    }

    /// Timestamp (ms) of the last confirmed transition.
    pub fn last_edge_ms(&self) -> u64 {
        self.last_edge_ms
    }

    /// Feed one raw sample. Returns a confirmed edge, if any.
    pub fn sample(&mut self, raw: bool, now_ms: u64) -> Option<Edge> {
        self.last_raw = raw;

        match self.state {
            FilterState::Idle => {
                if raw != self.stable {
                    self.state = FilterState::Candidate { since_ms: now_ms };
                }
                None
            }

            FilterState::Candidate { since_ms } => {
                if raw == self.stable {
                    // Bounced back before confirmation, cancel.
                    self.state = FilterState::Idle;
                    return None;
                }
                if now_ms.wrapping_sub(since_ms) >= u64::from(self.interval_ms) {
                    self.stable = raw;
                    self.last_edge_ms = now_ms;
                    self.state = FilterState::Idle;
                    return Some(if raw { Edge::Rising } else { Edge::Falling });
                }
                None
            }
        }
    }
}
