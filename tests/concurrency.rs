//! S6 — concurrent safety: many threads mixing puts and gets against a
//! shared cache, checked for the invariants that survive threading (no
//! duplicate keys, `len` never exceeds capacity, counters add up).

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use ttl_lru_cache::{Cache, CacheValue};

#[derive(Clone, Serialize, Deserialize)]
struct Payload(u64);

impl CacheValue for Payload {
    fn size_estimate(&self) -> usize {
        8
    }
}

#[test]
fn s6_concurrent_mixed_load() {
    const THREADS: usize = 8;
    const OPS_PER_THREAD: usize = 2_000;
    const CAPACITY: usize = 64;
    const KEY_SPACE: i64 = 128;

    let cache: Cache<Payload> = Cache::new(CAPACITY);
    let total_puts = Arc::new(AtomicU64::new(0));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let cache = cache.clone();
            let total_puts = Arc::clone(&total_puts);
            std::thread::spawn(move || {
                // A small xorshift-style PRNG avoids pulling `rand` into a
                // tight per-op loop across threads.
                let mut state: u64 = 0x9E3779B97F4A7C15 ^ (t as u64 + 1);
                for i in 0..OPS_PER_THREAD {
                    state ^= state << 13;
                    state ^= state >> 7;
                    state ^= state << 17;
                    let key = (state % KEY_SPACE as u64) as i64;

                    if state % 5 < 3 {
                        cache.put(key, Payload(i as u64));
                        total_puts.fetch_add(1, Ordering::Relaxed);
                    } else {
                        cache.get(key);
                    }
                }
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }

    assert!(cache.len() <= CAPACITY);

    let snapshot = cache.metrics();
    assert_eq!(snapshot.puts, total_puts.load(Ordering::Relaxed));
    assert_eq!(snapshot.hits + snapshot.misses, {
        let total_gets = (THREADS * OPS_PER_THREAD) as u64 - snapshot.puts;
        total_gets
    });

    // No key appears twice: walk every key in range and count how many are
    // resident, which must not exceed len().
    let resident = (0..KEY_SPACE).filter(|k| cache.peek(*k).is_some()).count();
    assert_eq!(resident, cache.len());
}
