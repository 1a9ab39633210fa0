//! Decoupled diagnostic logging.
//!
//! Producers hand small fixed-size records to a bounded FIFO queue;
//! a single consumer drains, renders and emits them, so no producer is
//! ever stalled behind slow serial output.
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ tasks       │────▶│              │     │ consumer     │
//! │ supervisor  │────▶│  DiagQueue   │────▶│ render +     │
//! │ ISR handlers│────▶│  (bounded)   │     │ LogSink      │
//! └─────────────┘     └──────────────┘     └──────────────┘
//! ```
//!
//! ## Overflow policy
//!
//! The policy is explicit per call site, never ambient:
//! - task context: [`DiagQueue::emit_blocking`] blocks until capacity
//!   is available, bounded by an explicit timeout;
//! - interrupt context: [`DiagQueue::try_emit`] never blocks, reports
//!   `EmitError::Full` and counts the drop.
//!
//! Drops are observable through [`DiagQueue::dropped_count`]; there is
//! no silent-drop path.

use core::fmt::Write as _;
use core::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Condvar, Mutex};
use std::time::{Duration, Instant};

use crate::config::MAX_LOG_QUEUE;
use crate::error::{EmitError, Error, Result};

/// Maximum rendered line length.
pub const MAX_LINE: usize = 128;

/// Number of numeric payload fields a record can carry.
pub const MAX_ARGS: usize = 3;

// ── Log record ────────────────────────────────────────────────

/// One diagnostic record. Immutable once enqueued; the queue stores the
/// record by value, so no producer-owned memory is referenced after
/// `emit` returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogRecord {
    /// Fixed-format template. `{}` placeholders are substituted with
    /// the payload fields in order.
    pub template: &'static str,
    pub args: [u32; MAX_ARGS],
    /// Capture timestamp (ms), recorded by the producer.
    pub at_ms: u64,
}

impl LogRecord {
    /// Build a record from up to [`MAX_ARGS`] payload fields; excess
    /// fields are ignored, missing ones render as zero placeholders
    /// only where the template asks for them.
    pub fn new(template: &'static str, args: &[u32], at_ms: u64) -> Self {
        let mut copied = [0u32; MAX_ARGS];
        for (dst, src) in copied.iter_mut().zip(args.iter()) {
            *dst = *src;
        }
        Self {
            template,
            args: copied,
            at_ms,
        }
    }

    /// Render to a text line: capture timestamp, then the template with
    /// `{}` placeholders substituted in order. Output is truncated at
    /// [`MAX_LINE`] bytes.
    pub fn render(&self) -> heapless::String<MAX_LINE> {
        let mut line = heapless::String::new();
        let _ = write!(line, "{}: ", self.at_ms);

        let mut rest = self.template;
        let mut next_arg = 0usize;
        while let Some(pos) = rest.find("{}") {
            let _ = line.push_str(&rest[..pos]);
            if next_arg < MAX_ARGS {
                let _ = write!(line, "{}", self.args[next_arg]);
                next_arg += 1;
            } else {
                let _ = line.push_str("{}");
            }
            rest = &rest[pos + 2..];
        }
        let _ = line.push_str(rest);
        line
    }
}

// ── Sink port ─────────────────────────────────────────────────

/// Output port for rendered lines. Adapters decide where lines go
/// (UART, stdout, a test buffer).
pub trait LogSink {
    fn write_line(&mut self, line: &str);
}

/// Default adapter: forward rendered lines to the `log` facade.
pub struct FacadeSink;

impl LogSink for FacadeSink {
    fn write_line(&mut self, line: &str) {
        log::info!("{line}");
    }
}

// ── Bounded queue ─────────────────────────────────────────────

struct QueueState {
    buf: heapless::Deque<LogRecord, MAX_LOG_QUEUE>,
    cap: usize,
}

/// Bounded FIFO record queue, many producers, single consumer.
///
/// The buffer is guarded by one mutex; every enqueue/drain is a single
/// short critical section, so producers appear atomic to each other and
/// to the consumer. FIFO order across all producers follows enqueue
/// order.
pub struct DiagQueue {
    state: Mutex<QueueState>,
    not_empty: Condvar,
    not_full: Condvar,
    dropped: AtomicU32,
}

impl DiagQueue {
    /// Create a queue with the configured capacity. Zero or
    /// over-the-ceiling capacity is a fatal configuration error.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 || capacity > MAX_LOG_QUEUE {
            return Err(Error::Config("log queue capacity out of range"));
        }
        Ok(Self {
            state: Mutex::new(QueueState {
                buf: heapless::Deque::new(),
                cap: capacity,
            }),
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
            dropped: AtomicU32::new(0),
        })
    }

    /// Configured capacity.
    pub fn capacity(&self) -> usize {
        self.state.lock().unwrap().cap
    }

    /// Records currently queued.
    pub fn len(&self) -> usize {
        self.state.lock().unwrap().buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Records rejected by [`try_emit`](Self::try_emit) since creation.
    pub fn dropped_count(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Non-blocking enqueue for callers that must not suspend
    /// (interrupt context). On saturation the record is rejected,
    /// counted, and the failure returned to the caller.
    pub fn try_emit(&self, record: LogRecord) -> core::result::Result<(), EmitError> {
        let mut state = self.state.lock().unwrap();
        if state.buf.len() >= state.cap {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return Err(EmitError::Full);
        }
        // Capacity checked above; the backing deque is at least `cap`.
        let _ = state.buf.push_back(record);
        drop(state);
        self.not_empty.notify_one();
        Ok(())
    }

    /// Blocking enqueue for task context: waits until capacity is
    /// available, at most `timeout`.
    pub fn emit_blocking(
        &self,
        record: LogRecord,
        timeout: Duration,
    ) -> core::result::Result<(), EmitError> {
        let deadline = Instant::now() + timeout;
        let mut state = self.state.lock().unwrap();
        while state.buf.len() >= state.cap {
            let now = Instant::now();
            if now >= deadline {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                return Err(EmitError::Timeout);
            }
            let (guard, _) = self
                .not_full
                .wait_timeout(state, deadline - now)
                .unwrap();
            state = guard;
        }
        let _ = state.buf.push_back(record);
        drop(state);
        self.not_empty.notify_one();
        Ok(())
    }

    /// Producer convenience matching the interrupt-safe policy:
    /// build a record and [`try_emit`](Self::try_emit) it.
    pub fn request_log(
        &self,
        template: &'static str,
        args: &[u32],
        now_ms: u64,
    ) -> core::result::Result<(), EmitError> {
        self.try_emit(LogRecord::new(template, args, now_ms))
    }

    /// Consumer side: wait (unbounded) for the next record. This is the
    /// one intentionally unbounded wait in the core: the consumer loop
    /// is the system's background sink and runs forever by design.
    pub fn drain_blocking(&self) -> LogRecord {
        let mut state = self.state.lock().unwrap();
        loop {
            if let Some(rec) = state.buf.pop_front() {
                drop(state);
                self.not_full.notify_one();
                return rec;
            }
            state = self.not_empty.wait(state).unwrap();
        }
    }

    /// Consumer side with a bound, for loops that also poll a shutdown
    /// flag (the simulation binary, tests).
    pub fn drain_timeout(&self, timeout: Duration) -> Option<LogRecord> {
        let deadline = Instant::now() + timeout;
        let mut state = self.state.lock().unwrap();
        loop {
            if let Some(rec) = state.buf.pop_front() {
                drop(state);
                self.not_full.notify_one();
                return Some(rec);
            }
            let now = Instant::now();
            if now >= deadline {
                return None;
            }
            let (guard, _) = self
                .not_empty
                .wait_timeout(state, deadline - now)
                .unwrap();
            state = guard;
        }
    }

    /// Non-blocking drain.
    pub fn try_drain(&self) -> Option<LogRecord> {
        let mut state = self.state.lock().unwrap();
        let rec = state.buf.pop_front();
        drop(state);
        if rec.is_some() {
            self.not_full.notify_one();
        }
        rec
    }

    /// Drain one record, render it, hand the line to the sink.
    /// Blocks until a record is available.
    pub fn drain_one_into(&self, sink: &mut dyn LogSink) {
        let rec = self.drain_blocking();
        sink.write_line(&rec.render());
    }
}
