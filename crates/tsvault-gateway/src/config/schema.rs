use std::net::SocketAddr;
use std::path::PathBuf;

use serde::Deserialize;
use tsvault_core::error::{Result, TsVaultError};
use tsvault_core::query::parse_date_bound;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TsVaultConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub storage: StorageSection,

    #[serde(default)]
    pub seed: SeedSection,
}

impl TsVaultConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(TsVaultError::Config(format!(
                "unsupported config version {}",
                self.version
            )));
        }

        self.server.validate()?;
        self.seed.validate()?;

        Ok(())
    }
}

impl Default for TsVaultConfig {
    fn default() -> Self {
        Self {
            version: 1,
            server: ServerSection::default(),
            storage: StorageSection::default(),
            seed: SeedSection::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Serve files from this directory for paths no API route matches.
    #[serde(default)]
    pub static_dir: Option<PathBuf>,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            static_dir: None,
        }
    }
}

impl ServerSection {
    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|_| {
            TsVaultError::Config(format!(
                "server.listen must be a valid SocketAddr, got {:?}",
                self.listen
            ))
        })
    }

    pub fn validate(&self) -> Result<()> {
        self.listen_addr().map(|_| ())
    }
}

fn default_listen() -> String {
    "0.0.0.0:3000".into()
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageSection {
    /// JSON snapshot file. Absent means in-memory only.
    #[serde(default)]
    pub data_path: Option<PathBuf>,

    /// Bulk-load a generated sample at boot when the store is empty.
    #[serde(default)]
    pub seed_on_start: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedSection {
    #[serde(default = "default_seed_records")]
    pub records: usize,

    #[serde(default = "default_seed_start")]
    pub start: String,

    #[serde(default = "default_seed_interval_secs")]
    pub interval_secs: u64,
}

impl Default for SeedSection {
    fn default() -> Self {
        Self {
            records: default_seed_records(),
            start: default_seed_start(),
            interval_secs: default_seed_interval_secs(),
        }
    }
}

impl SeedSection {
    pub fn validate(&self) -> Result<()> {
        if !(1..=1_000_000).contains(&self.records) {
            return Err(TsVaultError::Config(
                "seed.records must be between 1 and 1000000".into(),
            ));
        }
        if !(1..=86_400).contains(&self.interval_secs) {
            return Err(TsVaultError::Config(
                "seed.interval_secs must be between 1 and 86400".into(),
            ));
        }
        parse_date_bound(&self.start)
            .map_err(|_| TsVaultError::Config(format!("seed.start is not a date: {}", self.start)))?;
        Ok(())
    }
}

fn default_seed_records() -> usize {
    100
}
fn default_seed_start() -> String {
    "2025-01-01".into()
}
fn default_seed_interval_secs() -> u64 {
    3600
}
