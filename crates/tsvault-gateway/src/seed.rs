//! Administrative bulk load and sample-data generation.
//!
//! Never reachable from the query path; used by the `tsvault-seed` binary
//! and by `storage.seed_on_start` at gateway boot.

use chrono::Duration;
use rand::Rng;

use tsvault_core::error::{Result, TsVaultError};
use tsvault_core::query::parse_date_bound;
use tsvault_core::stats::round2;
use tsvault_core::Measurement;

use crate::config::SeedSection;
use crate::storage::MeasurementStore;

/// Generate `cfg.records` samples spaced `cfg.interval_secs` apart from
/// `cfg.start`: field1 in [20, 30), field2 in [60, 80), field3 in [400, 500),
/// each rounded to two decimals.
pub fn generate_sample<R: Rng + ?Sized>(cfg: &SeedSection, rng: &mut R) -> Result<Vec<Measurement>> {
    let start = parse_date_bound(&cfg.start)
        .map_err(|_| TsVaultError::Config(format!("seed.start is not a date: {}", cfg.start)))?;
    let step = i64::try_from(cfg.interval_secs)
        .ok()
        .and_then(Duration::try_seconds)
        .ok_or_else(|| TsVaultError::Config("seed.interval_secs out of range".into()))?;

    let mut out = Vec::with_capacity(cfg.records);
    let mut ts = start;
    for _ in 0..cfg.records {
        out.push(Measurement::new(
            ts,
            round2(rng.gen_range(20.0..30.0)),
            round2(rng.gen_range(60.0..80.0)),
            round2(rng.gen_range(400.0..500.0)),
        ));
        ts = ts
            .checked_add_signed(step)
            .ok_or_else(|| TsVaultError::Config("seed time range overflows".into()))?;
    }
    Ok(out)
}

/// Clear the store and insert `batch`.
pub async fn bulk_load(store: &dyn MeasurementStore, batch: Vec<Measurement>) -> Result<usize> {
    let n = batch.len();
    let stored = store.replace_all(batch).await?;
    tracing::info!(requested = n, stored, "bulk load: cleared existing data and inserted batch");
    Ok(stored)
}

/// Seed only when the store holds no records. Returns the inserted count.
pub async fn seed_if_empty<R: Rng + ?Sized>(
    store: &dyn MeasurementStore,
    cfg: &SeedSection,
    rng: &mut R,
) -> Result<usize> {
    if store.len().await? > 0 {
        tracing::info!("seed_on_start: store already populated, skipping");
        return Ok(0);
    }
    let batch = generate_sample(cfg, rng)?;
    bulk_load(store, batch).await
}
