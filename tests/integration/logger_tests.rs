//! Diagnostic logger under concurrent producers.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use evsync::diag::{DiagQueue, LogRecord, LogSink};
use evsync::error::EmitError;

#[test]
fn per_producer_order_survives_concurrency() {
    let q = Arc::new(DiagQueue::new(8).unwrap());
    const PER_PRODUCER: u32 = 50;

    let producers: Vec<_> = (0..3u32)
        .map(|id| {
            let q = Arc::clone(&q);
            thread::spawn(move || {
                for seq in 0..PER_PRODUCER {
                    q.emit_blocking(
                        LogRecord::new("p{} s{}", &[id, seq], u64::from(seq)),
                        Duration::from_secs(5),
                    )
                    .expect("emit within timeout");
                }
            })
        })
        .collect();

    // Single consumer drains everything.
    let mut seen = [0u32; 3];
    let mut total = 0;
    while total < 3 * PER_PRODUCER {
        let rec = q.drain_blocking();
        let id = rec.args[0] as usize;
        let seq = rec.args[1];
        assert_eq!(seq, seen[id], "FIFO broken for producer {id}");
        seen[id] += 1;
        total += 1;
    }

    for p in producers {
        p.join().unwrap();
    }
    assert!(q.is_empty());
    assert_eq!(q.dropped_count(), 0, "blocking producers never drop");
}

#[test]
fn interrupt_context_drops_are_counted_not_silent() {
    let q = DiagQueue::new(2).unwrap();

    assert!(q.try_emit(LogRecord::new("a", &[], 0)).is_ok());
    assert!(q.try_emit(LogRecord::new("b", &[], 1)).is_ok());
    for _ in 0..5 {
        assert_eq!(q.try_emit(LogRecord::new("x", &[], 2)), Err(EmitError::Full));
    }
    assert_eq!(q.dropped_count(), 5);

    // The queued records are intact and in order.
    assert_eq!(q.drain_blocking().template, "a");
    assert_eq!(q.drain_blocking().template, "b");
}

#[test]
fn records_are_copied_at_enqueue() {
    let q = DiagQueue::new(4).unwrap();

    {
        // Producer-owned record goes out of scope after emit.
        let rec = LogRecord::new("elapsed {} ticks", &[77], 1234);
        q.try_emit(rec).unwrap();
    }

    struct Capture(String);
    impl LogSink for Capture {
        fn write_line(&mut self, line: &str) {
            self.0.push_str(line);
        }
    }

    let mut sink = Capture(String::new());
    q.drain_one_into(&mut sink);
    assert_eq!(sink.0, "1234: elapsed 77 ticks");
}
