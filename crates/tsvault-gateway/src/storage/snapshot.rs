use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use tsvault_core::error::{Result, TsVaultError};
use tsvault_core::{Measurement, Scan, SnapshotStore, TimeRange};

use super::MeasurementStore;
use crate::config::StorageSection;

/// Snapshot store with optional write-through JSON persistence.
///
/// Bulk loads are serialized by `load_lock` so the file on disk and the
/// in-memory snapshot always describe the same batch. Scans never take it.
#[derive(Debug)]
pub struct SnapshotBackend {
    store: SnapshotStore,
    data_path: Option<PathBuf>,
    load_lock: Mutex<()>,
    open: AtomicBool,
}

impl SnapshotBackend {
    /// In-memory backend with no persistence.
    pub fn in_memory() -> Self {
        Self::with_store(SnapshotStore::new(), None)
    }

    /// In-memory backend pre-populated with `batch`.
    pub fn from_records(batch: Vec<Measurement>) -> Self {
        Self::with_store(SnapshotStore::from_records(batch), None)
    }

    fn with_store(store: SnapshotStore, data_path: Option<PathBuf>) -> Self {
        Self {
            store,
            data_path,
            load_lock: Mutex::new(()),
            open: AtomicBool::new(true),
        }
    }

    /// Open per config. A missing data file is an empty store, not an error.
    pub async fn open(cfg: &StorageSection) -> Result<Self> {
        let Some(path) = cfg.data_path.clone() else {
            tracing::info!("storage: in-memory (no data_path configured)");
            return Ok(Self::in_memory());
        };

        let records = read_snapshot(&path).await?;
        tracing::info!(path = %path.display(), records = records.len(), "storage: snapshot loaded");
        Ok(Self::with_store(SnapshotStore::from_records(records), Some(path)))
    }

    fn ensure_open(&self) -> Result<()> {
        if self.open.load(Ordering::Acquire) {
            Ok(())
        } else {
            Err(TsVaultError::StorageUnavailable("store is closed".into()))
        }
    }
}

#[async_trait]
impl MeasurementStore for SnapshotBackend {
    async fn scan(&self, range: Option<TimeRange>) -> Result<Scan> {
        self.ensure_open()?;
        self.store.scan(range)
    }

    async fn replace_all(&self, batch: Vec<Measurement>) -> Result<usize> {
        self.ensure_open()?;
        let _guard = self.load_lock.lock().await;
        // `close` may have won the lock while this load was queued.
        self.ensure_open()?;
        if let Some(path) = &self.data_path {
            write_snapshot(path, &batch).await?;
        }
        self.store.replace_all(batch)
    }

    async fn len(&self) -> Result<usize> {
        self.ensure_open()?;
        self.store.len()
    }

    async fn close(&self) -> Result<()> {
        // Wait out an in-flight bulk load before refusing further calls.
        let _guard = self.load_lock.lock().await;
        if self.open.swap(false, Ordering::AcqRel) {
            tracing::info!("storage: closed");
        }
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }
}

async fn read_snapshot(path: &Path) -> Result<Vec<Measurement>> {
    let raw = match tokio::fs::read(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::warn!(path = %path.display(), "storage: data file missing, starting empty");
            return Ok(Vec::new());
        }
        Err(e) => {
            return Err(TsVaultError::StorageUnavailable(format!(
                "read {} failed: {e}",
                path.display()
            )))
        }
    };
    serde_json::from_slice(&raw).map_err(|e| {
        TsVaultError::StorageUnavailable(format!("corrupt snapshot {}: {e}", path.display()))
    })
}

/// Temp file + rename so readers of the file never see a torn write.
async fn write_snapshot(path: &Path, batch: &[Measurement]) -> Result<()> {
    let body = serde_json::to_vec(batch)
        .map_err(|e| TsVaultError::Internal(format!("encode snapshot failed: {e}")))?;

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(dir).await.map_err(|e| {
            TsVaultError::StorageUnavailable(format!("create {} failed: {e}", dir.display()))
        })?;
    }

    let tmp = path.with_extension("tmp");
    tokio::fs::write(&tmp, &body).await.map_err(|e| {
        TsVaultError::StorageUnavailable(format!("write {} failed: {e}", tmp.display()))
    })?;
    tokio::fs::rename(&tmp, path).await.map_err(|e| {
        TsVaultError::StorageUnavailable(format!("rename to {} failed: {e}", path.display()))
    })?;
    Ok(())
}
