//! Input events and the producer-facing front end.
//!
//! Events are produced by:
//! - the debounce filters (confirmed button presses)
//! - interrupt-context handlers (rotary encoder direction decode)
//!
//! and consumed exactly once downstream, by the sequence matcher or by
//! forwarding to a rendezvous barrier as a participant signal.
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌─────────────────────┐
//! │ raw samples │────▶│              │     │ SequenceMatcher     │
//! │ (poll/ISR)  │     │   InputHub   │────▶│         or          │
//! │ rotary ISR  │────▶│  (debounce)  │     │ barrier signal      │
//! └─────────────┘     └──────────────┘     └─────────────────────┘
//! ```

use heapless::Vec;

use crate::debounce::{DebounceFilter, Edge};

/// Maximum number of registered input channels.
pub const MAX_CHANNELS: usize = 8;

/// A confirmed input event. Immutable after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// A debounced press on the given channel.
    ButtonPress { channel_id: u8, at_ms: u64 },
    /// One rotary encoder detent, decoded in interrupt context.
    DirectionalTurn { clockwise: bool, at_ms: u64 },
}

impl Event {
    /// Capture timestamp (ms) of the event.
    pub fn at_ms(&self) -> u64 {
        match self {
            Self::ButtonPress { at_ms, .. } | Self::DirectionalTurn { at_ms, .. } => *at_ms,
        }
    }
}

/// Front end between physical sources and the core.
///
/// Owns one [`DebounceFilter`] per registered channel. Raw samples are
/// logical levels: `true` means the source is asserted (the board
/// support layer handles active-low inversion before reporting).
pub struct InputHub {
    channels: Vec<DebounceFilter, MAX_CHANNELS>,
}

impl InputHub {
    pub fn new() -> Self {
        Self {
            channels: Vec::new(),
        }
    }

    /// Register a channel with its debounce interval. Returns `false`
    /// if the hub is full or the id is already taken.
    pub fn register_channel(&mut self, channel_id: u8, debounce_interval_ms: u32) -> bool {
        if self.channels.iter().any(|c| c.channel_id() == channel_id) {
            return false;
        }
        self.channels
            .push(DebounceFilter::new(channel_id, debounce_interval_ms, false))
            .is_ok()
    }

    /// Feed a raw sample for one channel. A confirmed rising edge
    /// (source newly asserted) becomes a [`Event::ButtonPress`];
    /// falling edges and unconfirmed noise produce nothing.
    pub fn report_raw_sample(&mut self, channel_id: u8, value: bool, now_ms: u64) -> Option<Event> {
        let filter = self
            .channels
            .iter_mut()
            .find(|c| c.channel_id() == channel_id)?;

        match filter.sample(value, now_ms)? {
            Edge::Rising => Some(Event::ButtonPress {
                channel_id,
                at_ms: now_ms,
            }),
            Edge::Falling => None,
        }
    }

    /// Pass through an already-discrete event (e.g. from an encoder ISR).
    pub fn report_discrete_event(&self, event: Event) -> Event {
        event
    }

    /// Number of registered channels.
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }
}

impl Default for InputHub {
    fn default() -> Self {
        Self::new()
    }
}
