//! Config file discovery and loading.

use crate::schema::VisprobeConfig;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Default config file name within the config directory.
const CONFIG_FILE_NAME: &str = "config.yaml";

/// Resolve the visprobe config directory.
/// Priority: `VISPROBE_CONFIG_DIR` env > platform config dir > `./.visprobe`
pub fn config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("VISPROBE_CONFIG_DIR") {
        if !dir.is_empty() {
            return PathBuf::from(dir);
        }
    }
    dirs::config_dir()
        .map(|base| base.join("visprobe"))
        .unwrap_or_else(|| PathBuf::from(".visprobe"))
}

/// Resolve the full path to the main config file.
pub fn config_file_path(config_dir: &Path) -> PathBuf {
    config_dir.join(CONFIG_FILE_NAME)
}

/// Parse config YAML. An empty document yields the default config.
pub fn parse_config(raw: &str) -> Result<VisprobeConfig> {
    if raw.trim().is_empty() {
        return Ok(VisprobeConfig::default());
    }
    serde_yaml::from_str(raw).context("Failed to parse config YAML")
}

/// Load and parse the config from disk.
///
/// Returns `Ok(Default::default())` if the file doesn't exist (first run).
pub async fn load_config(path: &Path) -> Result<VisprobeConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "Config file does not exist; using defaults");
        return Ok(VisprobeConfig::default());
    }

    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config = parse_config(&raw)
        .with_context(|| format!("Invalid config at: {}", path.display()))?;

    info!(path = %path.display(), "Loaded config");
    Ok(config)
}
