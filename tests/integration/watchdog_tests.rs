//! Watchdog supervisor over live signaler threads.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use evsync::clock::MonotonicClock;
use evsync::diag::DiagQueue;
use evsync::supervisor::{CycleOutcome, T_MISSING_1, T_RENDEZVOUS_OK, WatchdogSupervisor};
use evsync::{ParticipantSet, RendezvousBarrier};

#[test]
fn live_workers_then_one_dies() {
    let barrier = Arc::new(RendezvousBarrier::new());
    let diag = DiagQueue::new(32).unwrap();
    let clock = MonotonicClock::new();
    let participants = ParticipantSet::new(&["worker1", "worker2", "worker3"]).unwrap();
    let mut supervisor = WatchdogSupervisor::new(participants, 60).unwrap();

    // worker2 keeps running only while this flag is up.
    let worker2_alive = Arc::new(AtomicBool::new(true));
    let all_alive = Arc::new(AtomicBool::new(true));

    let workers: Vec<_> = (0..3usize)
        .map(|i| {
            let barrier = Arc::clone(&barrier);
            let worker2_alive = Arc::clone(&worker2_alive);
            let all_alive = Arc::clone(&all_alive);
            thread::spawn(move || {
                while all_alive.load(Ordering::Acquire) {
                    if i != 1 || worker2_alive.load(Ordering::Acquire) {
                        barrier.signal(1 << i);
                    }
                    thread::sleep(Duration::from_millis(10));
                }
            })
        })
        .collect();

    // Five clean cycles.
    let mut successes = 0;
    for _ in 0..5 {
        match supervisor.run_cycle(&barrier, &diag, &clock) {
            CycleOutcome::AllArrived { .. } => successes += 1,
            CycleOutcome::Suspended { missing } => panic!("early suspend: {missing:#b}"),
        }
    }
    assert_eq!(successes, 5);

    // Kill worker2. Its residual signal may satisfy at most one more
    // cycle; after that the supervisor must suspend naming exactly it.
    worker2_alive.store(false, Ordering::Release);
    let missing = loop {
        match supervisor.run_cycle(&barrier, &diag, &clock) {
            CycleOutcome::AllArrived { .. } => successes += 1,
            CycleOutcome::Suspended { missing } => break missing,
        }
    };
    assert_eq!(missing, 0b010);
    assert!(supervisor.is_suspended());

    all_alive.store(false, Ordering::Release);
    for w in workers {
        w.join().unwrap();
    }

    // Diagnostics: `successes` OK lines, then exactly one failure line
    // naming participant 2 (1-based identity, not the raw bit).
    for _ in 0..successes {
        let rec = diag.try_drain().expect("success record");
        assert_eq!(rec.template, T_RENDEZVOUS_OK);
    }
    let fail = diag.try_drain().expect("failure record");
    assert_eq!(fail.template, T_MISSING_1);
    assert_eq!(fail.args[0], 2);
    let line = fail.render();
    assert!(
        line.as_str().ends_with("FAIL. participants missing: 2"),
        "unexpected line: {line}"
    );
    assert!(diag.try_drain().is_none(), "no diagnostics after suspension");
}

#[test]
fn success_and_failure_lines_are_distinguishable() {
    // Suspension must be clearly distinguishable in logs from the
    // periodic success message.
    assert_ne!(T_RENDEZVOUS_OK, T_MISSING_1);
    assert!(T_RENDEZVOUS_OK.starts_with("OK."));
    assert!(T_MISSING_1.starts_with("FAIL."));
}
