pub mod schema;

pub use schema::GateConfig;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Default toolgate home directory (~/.toolgate).
pub fn default_home_dir() -> PathBuf {
    directories::BaseDirs::new()
        .map(|d| d.home_dir().join(".toolgate"))
        .unwrap_or_else(|| PathBuf::from(".toolgate"))
}

/// Load config from the given path, or return defaults.
pub fn load_config(path: &Path) -> Result<GateConfig> {
    if path.exists() {
        let contents = std::fs::read_to_string(path).context("Failed to read toolgate config file")?;
        let config: GateConfig =
            toml::from_str(&contents).context("Failed to parse toolgate config (TOML)")?;
        Ok(config)
    } else {
        Ok(GateConfig::default())
    }
}

/// Load config and apply process environment overrides.
pub fn load_config_with_env(path: &Path) -> Result<GateConfig> {
    let mut config = load_config(path)?;
    config.apply_env(|key| std::env::var(key).ok());
    Ok(config)
}
