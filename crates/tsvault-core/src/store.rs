//! Record store: sorted, copy-on-write snapshots of measurements.
//!
//! The store keeps one immutable `Arc<[Measurement]>` sorted by timestamp.
//! Readers clone the `Arc` and scan without holding any lock, so a scan
//! never observes records inserted after it began and never observes a
//! partially written record. Bulk load sorts the new batch off-lock and
//! holds the write lock only for the pointer swap.

use std::sync::{Arc, RwLock};

use crate::error::{Result, TsVaultError};
use crate::model::Measurement;
use crate::query::TimeRange;

/// In-memory snapshot store.
#[derive(Debug)]
pub struct SnapshotStore {
    current: RwLock<Arc<[Measurement]>>,
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self {
            current: RwLock::new(Arc::from(Vec::new())),
        }
    }

    /// Build a store pre-populated with `batch`.
    pub fn from_records(batch: Vec<Measurement>) -> Self {
        Self {
            current: RwLock::new(sorted(batch)),
        }
    }

    /// Current snapshot (cheap `Arc` clone).
    pub fn snapshot(&self) -> Result<Arc<[Measurement]>> {
        self.current
            .read()
            .map(|g| Arc::clone(&*g))
            .map_err(|_| TsVaultError::StorageUnavailable("snapshot lock poisoned".into()))
    }

    /// Scan records in ascending timestamp order, optionally bounded by an
    /// inclusive range. No match yields an empty scan, never an error.
    pub fn scan(&self, range: Option<TimeRange>) -> Result<Scan> {
        let snapshot = self.snapshot()?;
        let (lo, hi) = match range {
            None => (0, snapshot.len()),
            Some(r) => {
                let lo = snapshot.partition_point(|m| m.timestamp < r.start);
                let hi = snapshot.partition_point(|m| m.timestamp <= r.end);
                // start > end leaves hi behind lo.
                (lo, hi.max(lo))
            }
        };
        Ok(Scan { snapshot, lo, hi })
    }

    /// Clear the store, then insert `batch`. Returns the stored count.
    pub fn replace_all(&self, batch: Vec<Measurement>) -> Result<usize> {
        let next = sorted(batch);
        let count = next.len();
        let mut guard = self
            .current
            .write()
            .map_err(|_| TsVaultError::StorageUnavailable("snapshot lock poisoned".into()))?;
        *guard = next;
        Ok(count)
    }

    pub fn clear(&self) -> Result<()> {
        self.replace_all(Vec::new()).map(|_| ())
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.snapshot()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

fn sorted(mut batch: Vec<Measurement>) -> Arc<[Measurement]> {
    // Stable: equal timestamps keep load order.
    batch.sort_by_key(|m| m.timestamp);
    Arc::from(batch)
}

/// Lazy view over a contiguous slice of one snapshot.
#[derive(Debug, Clone)]
pub struct Scan {
    snapshot: Arc<[Measurement]>,
    lo: usize,
    hi: usize,
}

impl Scan {
    pub fn as_slice(&self) -> &[Measurement] {
        self.snapshot.get(self.lo..self.hi).unwrap_or(&[])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Measurement> {
        self.as_slice().iter()
    }

    pub fn len(&self) -> usize {
        self.hi - self.lo
    }

    pub fn is_empty(&self) -> bool {
        self.lo == self.hi
    }
}

impl<'a> IntoIterator for &'a Scan {
    type Item = &'a Measurement;
    type IntoIter = std::slice::Iter<'a, Measurement>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
