//! Subcommand implementations.

pub mod batch;
pub mod config;
pub mod process;

use std::path::{Path, PathBuf};

use fridge_core::FridgeConfig;
use tracing::debug;

/// Location of the user configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("fridge")
        .join("config.json")
}

/// Load the explicit config file, else the user file if present, else defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<FridgeConfig> {
    if let Some(path) = config_path {
        debug!("Loading config from {}", path);
        return Ok(FridgeConfig::from_file(Path::new(path))?);
    }

    let user_path = default_config_path();
    if user_path.exists() {
        debug!("Loading config from {}", user_path.display());
        Ok(FridgeConfig::from_file(&user_path)?)
    } else {
        Ok(FridgeConfig::default())
    }
}
