//! Monotonic time port.
//!
//! Components never read a hardware timer directly; timestamps arrive
//! either as `now_ms` arguments (the tick-driven state machines) or
//! through the [`Clock`] port (the blocking supervisor and logger).
//! Tests substitute a scripted clock; production uses
//! [`MonotonicClock`] over the platform's monotonic counter.

/// Read-side port: milliseconds since boot, monotonic.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Host/monotonic clock backed by `std::time::Instant`.
pub struct MonotonicClock {
    start: std::time::Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            start: std::time::Instant::now(),
        }
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}
