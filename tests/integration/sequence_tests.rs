//! Raw samples → debounce → sequence matcher, end to end.
//!
//! Timestamps are logical throughout, so these tests run instantly and
//! deterministically.

use evsync::sequence::{MatchResult, ResetReason, SequenceDelegate, SequenceMatcher};
use evsync::{InputHub, SyncConfig};

const CODE: [u8; 5] = [0, 0, 2, 1, 2];

struct CountingDelegate {
    completions: u32,
}

impl SequenceDelegate for CountingDelegate {
    fn on_sequence_complete(&mut self) {
        self.completions += 1;
    }
}

fn hub(config: &SyncConfig) -> InputHub {
    let mut hub = InputHub::new();
    for id in 0..3 {
        assert!(hub.register_channel(id, config.debounce_interval_ms));
    }
    hub
}

/// Simulate one bouncy press-and-release on a channel, returning the
/// confirmed event (if any) and the advanced logical time.
fn bouncy_press(
    hub: &mut InputHub,
    channel: u8,
    start_ms: u64,
    interval_ms: u32,
) -> (Option<evsync::Event>, u64) {
    let mut t = start_ms;
    // Contact bounce shorter than the debounce interval.
    hub.report_raw_sample(channel, true, t);
    hub.report_raw_sample(channel, false, t + 1);
    hub.report_raw_sample(channel, true, t + 2);
    t += 2 + u64::from(interval_ms);
    let event = hub.report_raw_sample(channel, true, t);

    // Clean release so the next press starts from a stable low.
    t += 10;
    hub.report_raw_sample(channel, false, t);
    t += u64::from(interval_ms);
    hub.report_raw_sample(channel, false, t);
    (event, t)
}

#[test]
fn bouncy_unlock_code_completes_exactly_once() {
    let config = SyncConfig::default();
    let mut hub = hub(&config);
    let mut matcher = SequenceMatcher::new(&CODE, config.sequence_timeout_ms).unwrap();
    let mut delegate = CountingDelegate { completions: 0 };

    let mut t = 0u64;
    let mut last = None;
    for &channel in &CODE {
        let (event, next) = bouncy_press(&mut hub, channel, t, config.debounce_interval_ms);
        let event = event.expect("press should confirm after the bounce settles");
        last = matcher.accept_event(&event, &mut delegate);
        t = next + 50;
    }

    assert_eq!(last, Some(MatchResult::Completed));
    assert_eq!(delegate.completions, 1);
    assert_eq!(matcher.index(), 0, "matcher re-armed");
}

#[test]
fn wrong_press_forces_full_restart() {
    let config = SyncConfig::default();
    let mut hub = hub(&config);
    let mut matcher = SequenceMatcher::new(&CODE, config.sequence_timeout_ms).unwrap();
    let mut delegate = CountingDelegate { completions: 0 };

    let mut t = 0u64;
    // First two correct, then a wrong channel.
    for &channel in &[0u8, 0, 1] {
        let (event, next) = bouncy_press(&mut hub, channel, t, config.debounce_interval_ms);
        let result = matcher.accept_event(&event.unwrap(), &mut delegate);
        t = next + 50;
        if channel == 1 {
            assert_eq!(result, Some(MatchResult::Reset(ResetReason::WrongInput)));
        }
    }

    // The remaining tail of the code is not enough after a reset.
    for &channel in &CODE[2..] {
        let (event, next) = bouncy_press(&mut hub, channel, t, config.debounce_interval_ms);
        matcher.accept_event(&event.unwrap(), &mut delegate);
        t = next + 50;
    }
    assert_eq!(delegate.completions, 0);
}

#[test]
fn session_gap_discards_partial_progress() {
    let config = SyncConfig::default();
    let mut hub = hub(&config);
    let mut matcher = SequenceMatcher::new(&CODE, config.sequence_timeout_ms).unwrap();
    let mut delegate = CountingDelegate { completions: 0 };

    let mut t = 0u64;
    for &channel in &CODE[..2] {
        let (event, next) = bouncy_press(&mut hub, channel, t, config.debounce_interval_ms);
        matcher.accept_event(&event.unwrap(), &mut delegate);
        t = next + 50;
    }
    assert_eq!(matcher.index(), 2);

    // Walk away past the session timeout, then finish the code.
    t += u64::from(config.sequence_timeout_ms) + 1000;
    for &channel in &CODE[2..] {
        let (event, next) = bouncy_press(&mut hub, channel, t, config.debounce_interval_ms);
        matcher.accept_event(&event.unwrap(), &mut delegate);
        t = next + 50;
    }
    assert_eq!(delegate.completions, 0, "stale progress must not complete");
}
