//! `ttl-lru-cache` is a concurrent, in-process cache keyed by 64-bit integer
//! identifiers, combining an LRU eviction policy with optional per-entry TTL
//! expiration (checked lazily, on access — there is no background sweeper).
//!
//! ```
//! use ttl_lru_cache::Cache;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Clone, Serialize, Deserialize)]
//! struct Greeting(String);
//!
//! impl ttl_lru_cache::CacheValue for Greeting {
//!     fn size_estimate(&self) -> usize {
//!         self.0.len()
//!     }
//! }
//!
//! let cache = Cache::<Greeting>::new(128);
//! cache.put(1, Greeting("hello".to_string()));
//! assert!(cache.get(1).is_some());
//! ```
//!
//! Construction beyond the capacity-only quick start goes through
//! [`CacheBuilder`], which can set a TTL, a custom hasher, or an injected
//! [`Clock`] (primarily for tests — see [`FakeClock`]).

mod builder;
mod cache;
mod clock;
mod error;
mod list;
mod metrics;
mod snapshot;
mod value;

pub use builder::CacheBuilder;
pub use cache::Cache;
pub use clock::{Clock, FakeClock, SystemClock};
pub use error::{CacheError, Result};
pub use metrics::MetricsSnapshot;
pub use value::{CacheValue, ENTRY_OVERHEAD_BYTES};
