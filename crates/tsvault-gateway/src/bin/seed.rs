//! tsvault-seed: clear the configured store and bulk-load a generated sample.
//!
//! Uses the same config file as the gateway (`TSVAULT_CONFIG`, default
//! `tsvault.yaml`); `seed.*` controls the sample shape.

use tsvault_core::error::Result;
use tsvault_gateway::storage::{MeasurementStore, SnapshotBackend};
use tsvault_gateway::{config, obs, seed};

#[tokio::main]
async fn main() {
    obs::init_tracing();

    if let Err(e) = run().await {
        tracing::error!(error = %e, code = e.client_code().as_str(), "seeding failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cfg = config::load_from_file(&config::config_path())?;
    if cfg.storage.data_path.is_none() {
        tracing::warn!("storage.data_path is not set; seeded data will not outlive this process");
    }

    let store = SnapshotBackend::open(&cfg.storage).await?;
    let batch = seed::generate_sample(&cfg.seed, &mut rand::thread_rng())?;
    let stored = seed::bulk_load(&store, batch).await?;
    store.close().await?;

    tracing::info!(stored, "seeding complete");
    Ok(())
}
