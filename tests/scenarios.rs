//! Concrete end-to-end scenarios, independent of the in-module unit tests.
//! These drive the crate purely through its public API, the way a caller
//! would.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use ttl_lru_cache::{Cache, CacheBuilder, CacheValue, FakeClock};

#[derive(Clone, Serialize, Deserialize, PartialEq, Debug)]
struct Letter(String);

impl CacheValue for Letter {
    fn size_estimate(&self) -> usize {
        self.0.len()
    }
}

#[test]
fn s1_basic_recency() {
    let cache = Cache::<Letter>::new(3);
    cache.put(1, Letter("a".to_string()));
    cache.put(2, Letter("b".to_string()));
    cache.put(3, Letter("c".to_string()));
    cache.get(1);
    cache.put(4, Letter("d".to_string()));

    assert!(cache.peek(1).is_some());
    assert!(cache.peek(2).is_none());
    assert!(cache.peek(3).is_some());
    assert!(cache.peek(4).is_some());
    assert_eq!(cache.metrics().evictions, 1);
}

#[test]
fn s2_replace() {
    let cache = Cache::<Letter>::new(2);
    cache.put(1, Letter("a".to_string()));
    cache.put(2, Letter("b".to_string()));
    cache.put(1, Letter("A".to_string()));
    cache.put(3, Letter("c".to_string()));

    assert_eq!(cache.get(1), Some(Letter("A".to_string())));
    assert!(cache.peek(2).is_none());
    assert!(cache.peek(3).is_some());
    assert_eq!(cache.metrics().evictions, 1);
}

#[test]
fn s3_ttl_expiry() {
    let clock = Arc::new(FakeClock::new());
    let cache = CacheBuilder::<Letter>::new(10)
        .time_to_live(Duration::from_nanos(100))
        .clock(clock.clone())
        .build()
        .unwrap();

    cache.put(1, Letter("x".to_string()));
    clock.set(100);

    assert_eq!(cache.get(1), None);
    let snap = cache.metrics();
    assert_eq!(snap.expired, 1);
    assert_eq!(snap.misses, 1);
}

#[test]
fn s4_metric_accuracy() {
    let cache = Cache::<Letter>::new(2);
    cache.put(1, Letter("a".to_string()));
    cache.put(2, Letter("b".to_string()));
    cache.put(3, Letter("c".to_string())); // evicts 1

    cache.get(2); // hit
    cache.get(3); // hit
    cache.get(1); // miss
    cache.get(42); // miss
    cache.get(43); // miss

    let snap = cache.metrics();
    assert_eq!(snap.puts, 3);
    assert_eq!(snap.evictions, 1);
    assert_eq!(snap.hits, 2);
    assert_eq!(snap.misses, 3);
    assert_eq!(snap.hit_rate, 0.4);
}

#[test]
fn s5_snapshot_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("snapshot.json");

    let cache = Cache::<Letter>::new(4);
    cache.put(1, Letter("one".to_string()));
    cache.put(2, Letter("two".to_string()));
    cache.put(3, Letter("three".to_string()));
    cache.put(4, Letter("four".to_string()));
    cache.get(2);
    cache.save(&path).unwrap();

    let restored = Cache::<Letter>::new(4);
    restored.load(&path).unwrap();

    assert_eq!(restored.peek(2), Some(Letter("two".to_string())));
    assert_eq!(restored.peek(4), Some(Letter("four".to_string())));
    assert_eq!(restored.peek(3), Some(Letter("three".to_string())));
    assert_eq!(restored.peek(1), Some(Letter("one".to_string())));

    // Recency order front-to-back must be [2, 4, 3, 1]: pushing one more
    // key evicts 1, the LRU entry.
    restored.put(5, Letter("five".to_string()));
    assert!(restored.peek(1).is_none());
    assert!(restored.peek(5).is_some());
}

#[test]
fn capacity_one_boundary() {
    let cache = Cache::<Letter>::new(1);
    cache.put(1, Letter("a".to_string()));
    cache.put(2, Letter("b".to_string()));
    assert!(cache.peek(1).is_none());
    assert_eq!(cache.metrics().evictions, 1);
}

#[test]
fn ttl_zero_is_disabled() {
    let clock = Arc::new(FakeClock::new());
    let cache = CacheBuilder::<Letter>::new(10)
        .clock(clock.clone())
        .build()
        .unwrap();
    cache.put(1, Letter("x".to_string()));
    clock.advance(Duration::from_secs(3600));
    assert!(cache.get(1).is_some());
    assert_eq!(cache.metrics().expired, 0);
}
