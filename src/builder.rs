//! Construction of a [`Cache`], mirroring the teacher's split between a
//! quick-start `Cache::new(capacity)` and a configurable builder (the
//! teacher's own test suite refers to `crate::sync::Builder`, built here as
//! `CacheBuilder`).

use std::collections::hash_map::RandomState;
use std::convert::TryInto;
use std::hash::BuildHasher;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::Cache;
use crate::clock::{Clock, SystemClock};
use crate::error::{CacheError, Result};
use crate::value::CacheValue;

/// Builds a [`Cache`] with a validated configuration.
///
/// Capacity must be at least 1 and TTL, if given, must be representable in
/// nanoseconds without overflow (spec §7: `ConfigError` for capacity < 1 or
/// a negative TTL — negative durations are unrepresentable by
/// `std::time::Duration`, so this builder instead rejects overflow).
pub struct CacheBuilder<V, S = RandomState> {
    capacity: usize,
    ttl: Option<Duration>,
    hasher: S,
    clock: Arc<dyn Clock>,
    _value: std::marker::PhantomData<V>,
}

impl<V> CacheBuilder<V, RandomState>
where
    V: CacheValue,
{
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            ttl: None,
            hasher: RandomState::default(),
            clock: Arc::new(SystemClock::new()),
            _value: std::marker::PhantomData,
        }
    }
}

impl<V, S> CacheBuilder<V, S>
where
    V: CacheValue,
    S: BuildHasher + Clone,
{
    /// Sets the time-to-live. Omitting this call (or passing `Duration::ZERO`)
    /// disables expiration, per spec §4.4.
    pub fn time_to_live(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub fn hasher<S2: BuildHasher + Clone>(self, hasher: S2) -> CacheBuilder<V, S2> {
        CacheBuilder {
            capacity: self.capacity,
            ttl: self.ttl,
            hasher,
            clock: self.clock,
            _value: std::marker::PhantomData,
        }
    }

    /// Overrides the time source. Intended for tests (see [`crate::clock::FakeClock`]).
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn build(self) -> Result<Cache<V, S>> {
        if self.capacity < 1 {
            return Err(CacheError::Config(
                "capacity must be at least 1".to_string(),
            ));
        }
        let ttl_ns: u64 = match self.ttl {
            None => 0,
            Some(d) => d
                .as_nanos()
                .try_into()
                .map_err(|_| CacheError::Config("ttl is too large to represent".to_string()))?,
        };

        Ok(Cache::from_parts(
            self.capacity,
            ttl_ns,
            self.hasher,
            self.clock,
        ))
    }
}
