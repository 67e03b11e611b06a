//! Gateway config loader (strict parsing).

pub mod schema;

use std::fs;

use tsvault_core::error::{Result, TsVaultError};

pub use schema::{SeedSection, ServerSection, StorageSection, TsVaultConfig};

/// Environment variable overriding the config path.
pub const CONFIG_ENV: &str = "TSVAULT_CONFIG";
/// Config path used when [`CONFIG_ENV`] is unset.
pub const DEFAULT_CONFIG_PATH: &str = "tsvault.yaml";

pub fn config_path() -> String {
    std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
}

pub fn load_from_file(path: &str) -> Result<TsVaultConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| TsVaultError::Config(format!("read config {path} failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<TsVaultConfig> {
    let cfg: TsVaultConfig = serde_yaml::from_str(s)
        .map_err(|e| TsVaultError::Config(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
