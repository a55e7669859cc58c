//! The value contract the cache requires of a stored record.
//!
//! The cache itself is agnostic to the record schema (out of scope per the
//! design — see `demos/record.rs` for a worked example implementation); it
//! only needs a deterministic serialized form, for the snapshot codec, and a
//! size estimate, for the memory-usage metric.

use serde::de::DeserializeOwned;
use serde::Serialize;

/// A value admissible into the cache.
///
/// Any type that is cheaply cloned (values are returned by-copy from `get`,
/// never by reference into the cache's internals — see spec §4.4) and can
/// serialize/deserialize itself and estimate its own heap footprint may be
/// used as a cache value.
pub trait CacheValue: Clone + Serialize + DeserializeOwned {
    /// An estimate, in bytes, of the heap memory this value occupies.
    ///
    /// Used to compute the cache's `memory_bytes` metric. Need not be
    /// byte-exact — see spec §4.4's "principled estimate, not an allocator
    /// query."
    fn size_estimate(&self) -> usize;
}

/// Per-entry overhead added on top of each value's `size_estimate()` to
/// account for the list node and hash map slot (spec §4.4).
pub const ENTRY_OVERHEAD_BYTES: usize = 64;
