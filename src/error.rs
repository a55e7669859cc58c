//! Error types for the cache's fallible operations.
//!
//! Only construction and snapshot I/O can fail (spec: `get`/`put`/`remove`/
//! `clear`/`len`/`metrics` are infallible by contract). Styled after the
//! teacher's own (feature-gated) `thiserror` dependency; variant shape
//! cross-checked against `velesdb-core/src/error.rs`'s message-per-variant,
//! `#[from]`-for-io convention.

use thiserror::Error;

/// Errors produced by [`crate::CacheBuilder::build`] and by
/// [`crate::Cache::save`]/[`crate::Cache::load`].
#[derive(Error, Debug)]
pub enum CacheError {
    /// A filesystem read or write failed during `save`/`load`.
    #[error("I/O error accessing cache snapshot: {0}")]
    Io(#[from] std::io::Error),

    /// The snapshot document was malformed, had an unknown schema version,
    /// or had a field of the wrong type.
    #[error("malformed cache snapshot: {0}")]
    Format(String),

    /// Invalid construction arguments (capacity < 1, negative TTL).
    #[error("invalid cache configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, CacheError>;
