//! Shared application state for the tsvault gateway.
//!
//! The storage handle is injected here once at startup and handed to every
//! handler through axum's `State`; the query path only ever reads it.

use std::sync::Arc;

use rand::{rngs::StdRng, SeedableRng};

use tsvault_core::error::Result;

use crate::config::TsVaultConfig;
use crate::obs::QueryMetrics;
use crate::seed;
use crate::storage::{MeasurementStore, SnapshotBackend};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    store: Arc<dyn MeasurementStore>,
    metrics: Arc<QueryMetrics>,
}

struct AppStateInner {
    cfg: TsVaultConfig,
}

impl AppState {
    /// Wire state around an already-open store.
    pub fn new(cfg: TsVaultConfig, store: Arc<dyn MeasurementStore>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { cfg }),
            store,
            metrics: Arc::new(QueryMetrics::default()),
        }
    }

    /// Open the configured backend and apply `storage.seed_on_start`.
    /// Returns Result so main can handle errors gracefully (no panic).
    pub async fn open(cfg: TsVaultConfig) -> Result<Self> {
        let backend = SnapshotBackend::open(&cfg.storage).await?;
        let state = Self::new(cfg, Arc::new(backend));

        if state.cfg().storage.seed_on_start {
            let mut rng = StdRng::from_entropy();
            let n = seed::seed_if_empty(state.store.as_ref(), &state.cfg().seed, &mut rng).await?;
            if n > 0 {
                state.metrics.bulk_loads.inc(&[("source", "seed_on_start")]);
            }
        }

        Ok(state)
    }

    pub fn cfg(&self) -> &TsVaultConfig {
        &self.inner.cfg
    }

    pub fn store(&self) -> Arc<dyn MeasurementStore> {
        Arc::clone(&self.store)
    }

    pub fn metrics(&self) -> Arc<QueryMetrics> {
        Arc::clone(&self.metrics)
    }

    pub fn is_draining(&self) -> bool {
        self.metrics.is_draining()
    }

    pub fn set_draining(&self) {
        self.metrics.set_draining();
    }

    /// Extra gauge lines for `/metrics`. An unavailable store reports nothing.
    pub async fn metrics_extra(&self) -> Vec<(&'static str, u64)> {
        match self.store.len().await {
            Ok(n) => vec![("tsvault_records", n as u64)],
            Err(_) => Vec::new(),
        }
    }
}
