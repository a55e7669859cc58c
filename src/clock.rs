//! Monotonic time source for the cache.
//!
//! Mirrors the teacher's use of `quanta` for a cheap, monotonic, mockable
//! clock (see `sync::cache::Inner::current_time_from_expiration_clock` in
//! the original `moka` source), but exposes nanoseconds as a plain `i64` so
//! the facade never has to reach into `quanta::Instant` internals.

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

/// A monotonic, non-decreasing nanosecond time source.
///
/// `now()` must never return a value smaller than any value it has
/// previously returned, even across threads.
pub trait Clock: Send + Sync {
    /// Current time in nanoseconds since some fixed (but unspecified) epoch.
    fn now(&self) -> i64;
}

/// The production clock, backed by `quanta`'s monotonic counter.
#[derive(Debug)]
pub struct SystemClock {
    inner: quanta::Clock,
    epoch: quanta::Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    pub fn new() -> Self {
        let inner = quanta::Clock::new();
        let epoch = inner.now();
        Self { inner, epoch }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        self.inner.now().duration_since(self.epoch).as_nanos() as i64
    }
}

/// A deterministic clock for tests: starts at 0 and only moves when told to.
///
/// Used the way the teacher's tests use `quanta::Clock::mock()` (see the
/// `time_to_live`/`time_to_idle` tests in `sync::cache`), but as a plain
/// atomic counter rather than a `quanta` mock clock, so it has no dependency
/// on `quanta`'s internal mocking machinery.
#[derive(Debug, Default)]
pub struct FakeClock {
    nanos: AtomicI64,
}

impl FakeClock {
    pub fn new() -> Self {
        Self {
            nanos: AtomicI64::new(0),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.nanos
            .fetch_add(by.as_nanos() as i64, Ordering::SeqCst);
    }

    pub fn set(&self, nanos: i64) {
        self.nanos.store(nanos, Ordering::SeqCst);
    }
}

impl Clock for FakeClock {
    fn now(&self) -> i64 {
        self.nanos.load(Ordering::SeqCst)
    }
}
