//! Storage backend seam.
//!
//! Handlers talk to an `Arc<dyn MeasurementStore>` injected through
//! `AppState`; nothing reaches for a process-wide handle. The backend is
//! opened at startup and closed on graceful shutdown. Storage I/O is the
//! only place the query path suspends.

pub mod snapshot;

use async_trait::async_trait;

use tsvault_core::error::Result;
use tsvault_core::{Measurement, Scan, TimeRange};

pub use snapshot::SnapshotBackend;

/// Read path plus the administrative bulk-load surface.
#[async_trait]
pub trait MeasurementStore: Send + Sync {
    /// Ascending-timestamp scan, inclusive on both range ends.
    async fn scan(&self, range: Option<TimeRange>) -> Result<Scan>;

    /// Clear every record, then insert `batch`. Administrative only.
    async fn replace_all(&self, batch: Vec<Measurement>) -> Result<usize>;

    async fn len(&self) -> Result<usize>;

    /// Release the backend; later calls fail with `StorageUnavailable`.
    async fn close(&self) -> Result<()>;

    fn is_open(&self) -> bool;
}
