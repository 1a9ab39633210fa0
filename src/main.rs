//! Host simulation: wires the full core together and runs a bounded
//! scripted scenario:
//!
//! 1. a noisy button stream is debounced into the unlock sequence,
//! 2. three worker threads rendezvous with the watchdog supervisor for
//!    several cycles,
//! 3. one worker stops signaling and the supervisor fail-stops,
//! 4. a consumer thread renders every diagnostic record to stdout.
//!
//! On real hardware each thread is an RTOS task and the clock is the
//! platform tick counter; the core code is identical.

use std::io::Write as _;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use log::info;

use evsync::clock::{Clock, MonotonicClock};
use evsync::diag::{DiagQueue, LogSink};
use evsync::sequence::{SequenceDelegate, SequenceMatcher};
use evsync::supervisor::{CycleOutcome, WatchdogSupervisor};
use evsync::{InputHub, ParticipantSet, RendezvousBarrier, SyncConfig};

/// Participant names for the rendezvous demo.
const WORKERS: [&str; 3] = ["worker1", "worker2", "worker3"];

/// The unlock code: channel ids in required order.
const UNLOCK_CODE: [u8; 5] = [0, 0, 2, 1, 2];

struct StdoutSink;

impl LogSink for StdoutSink {
    fn write_line(&mut self, line: &str) {
        let mut out = std::io::stdout().lock();
        let _ = writeln!(out, "{line}");
    }
}

struct UnlockAction;

impl SequenceDelegate for UnlockAction {
    fn on_sequence_complete(&mut self) {
        // Board support would blink the unlock pattern here.
        println!("*** unlocked ***");
    }
}

fn main() -> Result<()> {
    let config = SyncConfig {
        // Scaled down so the whole scenario runs in about a second.
        debounce_interval_ms: 5,
        sequence_timeout_ms: 200,
        barrier_period_ms: 60,
        log_queue_capacity: 10,
    };
    config.validate().context("invalid configuration")?;

    let clock = Arc::new(MonotonicClock::new());
    let diag = Arc::new(DiagQueue::new(config.log_queue_capacity)?);
    diag.request_log("system initialized", &[], clock.now_ms())
        .ok();

    // ── Diagnostic consumer ───────────────────────────────────
    let running = Arc::new(AtomicBool::new(true));
    let consumer = {
        let diag = Arc::clone(&diag);
        let running = Arc::clone(&running);
        thread::spawn(move || {
            let mut sink = StdoutSink;
            while running.load(Ordering::Acquire) || !diag.is_empty() {
                if let Some(rec) = diag.drain_timeout(Duration::from_millis(20)) {
                    sink.write_line(&rec.render());
                }
            }
        })
    };

    // ── Unlock sequence demo ──────────────────────────────────
    run_unlock_demo(&config, clock.as_ref(), &diag)?;

    // ── Rendezvous / watchdog demo ────────────────────────────
    run_watchdog_demo(&config, clock.as_ref(), &diag)?;

    running.store(false, Ordering::Release);
    consumer.join().ok();
    Ok(())
}

/// Feed a noisy sample stream through the hub and the matcher.
fn run_unlock_demo(config: &SyncConfig, clock: &dyn Clock, diag: &DiagQueue) -> Result<()> {
    let mut hub = InputHub::new();
    for id in 0..3 {
        hub.register_channel(id, config.debounce_interval_ms);
    }
    let mut matcher = SequenceMatcher::new(&UNLOCK_CODE, config.sequence_timeout_ms)?;
    let mut action = UnlockAction;

    for &channel in &UNLOCK_CODE {
        // Contact bounce: assert, release, assert again, then hold.
        let t = clock.now_ms();
        hub.report_raw_sample(channel, true, t);
        hub.report_raw_sample(channel, false, t + 1);
        hub.report_raw_sample(channel, true, t + 2);
        thread::sleep(Duration::from_millis(u64::from(config.debounce_interval_ms) + 2));

        let t = clock.now_ms();
        if let Some(event) = hub.report_raw_sample(channel, true, t) {
            info!("confirmed {event:?}");
            if let Some(result) = matcher.accept_event(&event, &mut action) {
                diag.request_log("sequence progress: {}", &[matcher.index() as u32], t)
                    .ok();
                info!("match result: {result:?}");
            }
        }

        // Release cleanly before the next press.
        let t = clock.now_ms();
        hub.report_raw_sample(channel, false, t);
        thread::sleep(Duration::from_millis(u64::from(config.debounce_interval_ms) + 2));
        hub.report_raw_sample(channel, false, clock.now_ms());
    }
    Ok(())
}

/// Three workers signal the barrier; worker3 dies after a few cycles.
fn run_watchdog_demo(config: &SyncConfig, clock: &dyn Clock, diag: &DiagQueue) -> Result<()> {
    let barrier = Arc::new(RendezvousBarrier::new());
    let participants = ParticipantSet::new(&WORKERS)?;
    let mut supervisor = WatchdogSupervisor::new(participants, config.barrier_period_ms)?;

    let alive = Arc::new(AtomicBool::new(true));
    let workers: Vec<_> = (0..WORKERS.len())
        .map(|i| {
            let barrier = Arc::clone(&barrier);
            let alive = Arc::clone(&alive);
            thread::spawn(move || {
                let mut cycles = 0u32;
                while alive.load(Ordering::Acquire) {
                    // worker3 stops reporting after 4 cycles.
                    if i != 2 || cycles < 4 {
                        barrier.signal(1 << i);
                    }
                    cycles += 1;
                    thread::sleep(Duration::from_millis(15));
                }
            })
        })
        .collect();

    loop {
        match supervisor.run_cycle(&barrier, diag, clock) {
            CycleOutcome::AllArrived { elapsed_ms } => {
                info!("cycle ok, {elapsed_ms} ms");
            }
            CycleOutcome::Suspended { missing } => {
                info!("supervisor suspended, missing mask {missing:#b}");
                break;
            }
        }
    }

    alive.store(false, Ordering::Release);
    for w in workers {
        w.join().ok();
    }

    // Make the drop policy observable at the end of a run.
    let dropped = diag.dropped_count();
    if dropped > 0 {
        diag.request_log("diagnostics dropped: {}", &[dropped], clock.now_ms())
            .ok();
    }
    Ok(())
}
