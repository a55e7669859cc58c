//! The cache facade: ties the indexed recency list, metrics registry, clock,
//! and snapshot codec together behind a single mutex, and applies the
//! capacity and TTL policies (spec §4.4).
//!
//! Structurally this keeps the teacher's own shape — a cheaply `Clone`-able
//! handle (`Cache<V, S>`) wrapping `Arc<Inner<V, S>>` — while replacing the
//! teacher's W-TinyLFU admission/eviction machinery (crossbeam-channel
//! read/write logs, a background housekeeper thread, `cht::SegmentedHashMap`)
//! with the single-mutex, arena-indexed-list design spec §5 calls canonical.

use std::collections::hash_map::RandomState;
use std::hash::BuildHasher;
use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::builder::CacheBuilder;
use crate::clock::Clock;
use crate::error::Result;
use crate::list::IndexedRecencyList;
use crate::metrics::{Metrics, MetricsSnapshot};
use crate::snapshot::{SnapshotDocument, SnapshotEntry};
use crate::value::{CacheValue, ENTRY_OVERHEAD_BYTES};

struct CachedEntry<V> {
    value: V,
    inserted_at: i64,
}

fn entry_bytes<V: CacheValue>(value: &V) -> i64 {
    (value.size_estimate() + ENTRY_OVERHEAD_BYTES) as i64
}

struct Inner<V, S> {
    capacity: usize,
    ttl_ns: u64,
    list: Mutex<IndexedRecencyList<i64, CachedEntry<V>, S>>,
    metrics: Metrics,
    clock: Arc<dyn Clock>,
}

/// A concurrent, in-process LRU cache with optional TTL expiration.
///
/// Keyed by a 64-bit integer identifier (spec §3). Cloning a `Cache` is
/// cheap and yields another handle to the same underlying store, the way
/// cloning the teacher's `Cache<K, V, S>` shares its `Arc<Inner>`.
pub struct Cache<V, S = RandomState>
where
    V: CacheValue,
    S: BuildHasher + Clone,
{
    inner: Arc<Inner<V, S>>,
}

impl<V, S> std::fmt::Debug for Cache<V, S>
where
    V: CacheValue,
    S: BuildHasher + Clone,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cache").finish_non_exhaustive()
    }
}

impl<V, S> Clone for Cache<V, S>
where
    V: CacheValue,
    S: BuildHasher + Clone,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V> Cache<V, RandomState>
where
    V: CacheValue,
{
    /// Creates a cache with the given capacity and no expiration.
    ///
    /// # Panics
    /// Panics if `capacity` is 0. Use [`CacheBuilder`] if you need to handle
    /// an invalid capacity as a recoverable error.
    pub fn new(capacity: usize) -> Self {
        CacheBuilder::new(capacity)
            .build()
            .expect("Cache::new requires capacity >= 1; use CacheBuilder::build for a Result")
    }
}

impl<V, S> Cache<V, S>
where
    V: CacheValue,
    S: BuildHasher + Clone,
{
    pub(crate) fn from_parts(capacity: usize, ttl_ns: u64, hasher: S, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Arc::new(Inner {
                capacity,
                ttl_ns,
                list: Mutex::new(IndexedRecencyList::with_hasher(hasher)),
                metrics: Metrics::new(),
                clock,
            }),
        }
    }

    pub fn capacity(&self) -> usize {
        self.inner.capacity
    }

    /// Configured TTL in nanoseconds. `0` means expiration is disabled.
    pub fn time_to_live_ns(&self) -> u64 {
        self.inner.ttl_ns
    }

    /// Current number of live entries. Never exceeds `capacity()`.
    pub fn len(&self) -> usize {
        self.inner.list.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.inner.metrics.snapshot()
    }

    /// Admits or replaces the entry for `key`. Never fails.
    ///
    /// Replacing an existing key does not count as an eviction (spec §9):
    /// only admitting past capacity does.
    pub fn put(&self, key: i64, value: V) {
        let start = self.inner.clock.now();
        let mut list = self.inner.list.lock();

        if let Some(handle) = list.find(&key) {
            if let Some((_, old)) = list.unlink(handle) {
                self.inner.metrics.adjust_memory(-entry_bytes(&old.value));
            }
        }

        let now = self.inner.clock.now();
        let new_bytes = entry_bytes(&value);
        list.push_front(
            key,
            CachedEntry {
                value,
                inserted_at: now,
            },
        );
        self.inner.metrics.adjust_memory(new_bytes);

        if list.len() > self.inner.capacity {
            if let Some((evicted_key, evicted)) = list.pop_back() {
                self.inner.metrics.adjust_memory(-entry_bytes(&evicted.value));
                self.inner.metrics.record_eviction();
                tracing::debug!(key = evicted_key, "evicted least recently used entry");
            }
        }

        drop(list);
        let elapsed = (self.inner.clock.now() - start).max(0) as u64;
        self.inner.metrics.record_write(elapsed);
    }

    /// Looks up `key`, promoting it to most-recently-used on a hit.
    ///
    /// Returns a clone of the value, never a reference into the cache's
    /// internals (spec §4.4). An expired entry is removed and counted as
    /// both an expiry and a miss.
    pub fn get(&self, key: i64) -> Option<V> {
        let start = self.inner.clock.now();
        let mut list = self.inner.list.lock();

        let handle = match list.find(&key) {
            Some(h) => h,
            None => {
                drop(list);
                self.finish_read(start, false);
                return None;
            }
        };

        if self.inner.ttl_ns > 0 {
            let inserted_at = list.get(handle).expect("handle from find is valid").1.inserted_at;
            let now = self.inner.clock.now();
            if is_expired(now, inserted_at, self.inner.ttl_ns) {
                let (_, expired) = list.unlink(handle).expect("handle from find is valid");
                self.inner.metrics.adjust_memory(-entry_bytes(&expired.value));
                drop(list);
                self.inner.metrics.record_expired();
                tracing::debug!(key, "removed expired entry on access");
                self.finish_read(start, false);
                return None;
            }
        }

        list.promote(handle);
        let value = list
            .get(handle)
            .expect("handle from find is valid")
            .1
            .value
            .clone();
        drop(list);
        self.finish_read(start, true);
        Some(value)
    }

    /// Looks up `key` without promoting it. Does not evaluate TTL, so a
    /// logically expired entry may still be returned — see spec §5's
    /// "hypothetical `peek` that does not promote."
    pub fn peek(&self, key: i64) -> Option<V> {
        let list = self.inner.list.lock();
        list.find(&key)
            .and_then(|h| list.get(h))
            .map(|(_, e)| e.value.clone())
    }

    fn finish_read(&self, start: i64, hit: bool) {
        let elapsed = (self.inner.clock.now() - start).max(0) as u64;
        self.inner.metrics.record_read(elapsed, hit);
    }

    /// Removes `key`, returning whether it was present.
    pub fn remove(&self, key: i64) -> bool {
        let mut list = self.inner.list.lock();
        match list.find(&key) {
            Some(handle) => {
                let (_, entry) = list.unlink(handle).expect("handle from find is valid");
                self.inner.metrics.adjust_memory(-entry_bytes(&entry.value));
                true
            }
            None => false,
        }
    }

    /// Drops all entries. Counters are left untouched (spec §4.4), except
    /// the memory estimate, which tracks the now-empty cache.
    pub fn clear(&self) {
        let mut list = self.inner.list.lock();
        while list.pop_back().is_some() {}
        self.inner.metrics.reset_memory();
    }

    /// Writes a whole-cache snapshot to `path`, atomically (spec §4.5).
    pub fn save(&self, path: &Path) -> Result<()> {
        let list = self.inner.list.lock();
        let entries: Vec<SnapshotEntry<V>> = list
            .iter_front_to_back()
            .map(|(key, entry)| SnapshotEntry {
                key: *key,
                value: entry.value.clone(),
                inserted_at_ns: entry.inserted_at,
            })
            .collect();
        drop(list);

        let document = SnapshotDocument::new(self.inner.capacity, self.inner.ttl_ns, entries);
        match document.write_atomic(path) {
            Ok(()) => {
                tracing::info!(path = %path.display(), "wrote cache snapshot");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to write cache snapshot");
                Err(e)
            }
        }
    }

    /// Replaces the cache's contents with the snapshot at `path`.
    ///
    /// Restored timestamps continue from their saved values (spec §9's
    /// "continue from saved" resolution); the cache's own `capacity` is
    /// respected, truncating the tail of a longer saved array. On any
    /// failure the in-memory cache is left unchanged.
    pub fn load(&self, path: &Path) -> Result<()> {
        self.load_impl(path, false)
    }

    /// Like [`Cache::load`], but if every restored entry would already be
    /// expired relative to the current clock, all restored timestamps are
    /// clamped to `now()` instead of being dropped on the very next `get`.
    /// Off by default; see spec §9's TTL-on-load open question.
    pub fn load_with_clamping(&self, path: &Path) -> Result<()> {
        self.load_impl(path, true)
    }

    fn load_impl(&self, path: &Path, clamp_if_all_expired: bool) -> Result<()> {
        let document = SnapshotDocument::<V>::read(path)?;
        let now = self.inner.clock.now();

        let mut kept: Vec<SnapshotEntry<V>> = document.entries;
        kept.truncate(self.inner.capacity);

        let should_clamp = clamp_if_all_expired
            && self.inner.ttl_ns > 0
            && !kept.is_empty()
            && kept
                .iter()
                .all(|e| is_expired(now, e.inserted_at_ns, self.inner.ttl_ns));

        let mut list = self.inner.list.lock();
        while list.pop_back().is_some() {}
        self.inner.metrics.reset_memory();

        // `kept` is front-to-back (most recent first); push_front in
        // reverse so the first element ends up at the front again.
        for entry in kept.into_iter().rev() {
            let inserted_at = if should_clamp { now } else { entry.inserted_at_ns };
            self.inner.metrics.adjust_memory(entry_bytes(&entry.value));
            list.push_front(
                entry.key,
                CachedEntry {
                    value: entry.value,
                    inserted_at,
                },
            );
        }
        drop(list);

        tracing::info!(path = %path.display(), "loaded cache snapshot");
        Ok(())
    }
}

fn is_expired(now: i64, inserted_at: i64, ttl_ns: u64) -> bool {
    let age = now.saturating_sub(inserted_at).max(0) as u64;
    age >= ttl_ns
}
