//! Thread-safe counters and running-average timers for the cache.
//!
//! Counter updates are lock-free atomics, in the same spirit as the
//! teacher's `Inner` struct keeping `AtomicBool`/`AtomicU8` state alongside
//! its mutex-protected deques (see `sync::cache::Inner` in the original
//! `moka` source) — state that many threads touch on every operation stays
//! out of the facade's lock.

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

/// A point-in-time, internally-consistent view of the cache's counters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricsSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub puts: u64,
    pub evictions: u64,
    pub expired: u64,
    pub read_time_ns: u64,
    pub write_time_ns: u64,
    pub memory_bytes: i64,
    /// `hits / (hits + misses)`, or `0.0` when no reads have completed.
    pub hit_rate: f64,
    /// `read_time_ns / (hits + misses)`, or `0` when no reads have completed.
    pub avg_read_time_ns: u64,
    /// `write_time_ns / puts`, or `0` when no writes have completed.
    pub avg_write_time_ns: u64,
}

/// Lock-free counters and timers, plus a facade-maintained memory estimate.
#[derive(Debug, Default)]
pub struct Metrics {
    hits: AtomicU64,
    misses: AtomicU64,
    puts: AtomicU64,
    evictions: AtomicU64,
    expired: AtomicU64,
    read_time_ns: AtomicU64,
    write_time_ns: AtomicU64,
    memory_bytes: AtomicI64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a completed `get`. `hit` distinguishes a live-entry return
    /// from a miss (including an expired entry observed as a miss).
    pub fn record_read(&self, elapsed_ns: u64, hit: bool) {
        if hit {
            self.hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
        }
        self.read_time_ns.fetch_add(elapsed_ns, Ordering::Relaxed);
    }

    /// Records a completed `put`.
    pub fn record_write(&self, elapsed_ns: u64) {
        self.puts.fetch_add(1, Ordering::Relaxed);
        self.write_time_ns.fetch_add(elapsed_ns, Ordering::Relaxed);
    }

    pub fn record_eviction(&self) {
        self.evictions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_expired(&self) {
        self.expired.fetch_add(1, Ordering::Relaxed);
    }

    /// Adjusts the running memory estimate. `delta` may be negative (an
    /// entry shrinking, being evicted, or being removed).
    pub fn adjust_memory(&self, delta: i64) {
        self.memory_bytes.fetch_add(delta, Ordering::Relaxed);
    }

    pub fn reset_memory(&self) {
        self.memory_bytes.store(0, Ordering::Relaxed);
    }

    pub fn memory_bytes(&self) -> i64 {
        self.memory_bytes.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let puts = self.puts.load(Ordering::Relaxed);
        let read_time_ns = self.read_time_ns.load(Ordering::Relaxed);
        let write_time_ns = self.write_time_ns.load(Ordering::Relaxed);
        let reads = hits + misses;

        MetricsSnapshot {
            hits,
            misses,
            puts,
            evictions: self.evictions.load(Ordering::Relaxed),
            expired: self.expired.load(Ordering::Relaxed),
            read_time_ns,
            write_time_ns,
            memory_bytes: self.memory_bytes(),
            hit_rate: if reads == 0 {
                0.0
            } else {
                hits as f64 / reads as f64
            },
            avg_read_time_ns: if reads == 0 { 0 } else { read_time_ns / reads },
            avg_write_time_ns: if puts == 0 { 0 } else { write_time_ns / puts },
        }
    }
}
