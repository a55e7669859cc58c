//! Whole-cache snapshot persistence: a single self-describing JSON document,
//! written atomically (temp file + rename) so a crash never yields a
//! partially written snapshot (spec §4.5).
//!
//! The teacher (`moka`) has no persistence feature to generalize from; the
//! serde-based document shape and dependency are pulled in from this pack's
//! `velesdb-core` and `kremis-core`, which both persist self-describing
//! documents this way.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CacheError, Result};
use crate::value::CacheValue;

/// Current snapshot schema version. Bump and add a migration path if the
/// on-disk shape ever changes.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
pub struct SnapshotEntry<V> {
    pub key: i64,
    pub value: V,
    pub inserted_at_ns: i64,
}

/// The persisted form of a cache: front-to-back in recency order, so the
/// first element of `entries` is the most-recently-used entry.
#[derive(Debug, Serialize, Deserialize)]
pub struct SnapshotDocument<V> {
    pub version: u32,
    pub capacity: usize,
    pub ttl_ns: u64,
    pub entries: Vec<SnapshotEntry<V>>,
}

impl<V> SnapshotDocument<V>
where
    V: CacheValue,
{
    pub fn new(capacity: usize, ttl_ns: u64, entries: Vec<SnapshotEntry<V>>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            capacity,
            ttl_ns,
            entries,
        }
    }

    /// Serializes and writes the document atomically: write to `path` with a
    /// `.tmp` suffix, then rename over the target. A reader can never
    /// observe a partially written file at `path`.
    pub fn write_atomic(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_vec_pretty(self)
            .map_err(|e| CacheError::Format(format!("failed to serialize snapshot: {e}")))?;

        let tmp_path = tmp_path_for(path);
        fs::write(&tmp_path, &json)?;
        fs::rename(&tmp_path, path).map_err(|e| {
            // Best-effort cleanup; the original io::Error is what matters.
            let _ = fs::remove_file(&tmp_path);
            e
        })?;
        Ok(())
    }

    pub fn read(path: &Path) -> Result<Self> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(CacheError::Io(e)),
            Err(e) => return Err(CacheError::Io(e)),
        };

        let document: Self = serde_json::from_slice(&bytes)
            .map_err(|e| CacheError::Format(format!("failed to parse snapshot: {e}")))?;

        if document.version != SNAPSHOT_VERSION {
            return Err(CacheError::Format(format!(
                "unsupported snapshot version {} (expected {})",
                document.version, SNAPSHOT_VERSION
            )));
        }

        Ok(document)
    }
}

fn tmp_path_for(path: &Path) -> std::path::PathBuf {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    std::path::PathBuf::from(tmp)
}
