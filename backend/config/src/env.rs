//! Environment variable overrides.
//!
//! `VISPROBE_BIND`, `VISPROBE_PORT`, `VISPROBE_LOG_LEVEL` and
//! `VISPROBE_LOG_DIR` take precedence over the file. Empty values are ignored.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::debug;

use crate::schema::{GatewayConfig, LoggingConfig, VisprobeConfig};

pub const ENV_BIND: &str = "VISPROBE_BIND";
pub const ENV_PORT: &str = "VISPROBE_PORT";
pub const ENV_LOG_LEVEL: &str = "VISPROBE_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "VISPROBE_LOG_DIR";

/// Apply overrides from the process environment.
pub fn apply_env_overrides(config: VisprobeConfig) -> Result<VisprobeConfig> {
    apply_env_overrides_with(config, &std::env::vars().collect())
}

/// Apply overrides from a provided map (useful for testing).
pub fn apply_env_overrides_with(
    mut config: VisprobeConfig,
    env: &HashMap<String, String>,
) -> Result<VisprobeConfig> {
    let lookup = |key: &str| env.get(key).map(String::as_str).filter(|v| !v.is_empty());

    if let Some(bind) = lookup(ENV_BIND) {
        debug!(var = ENV_BIND, "Overriding gateway bind address");
        config.gateway.get_or_insert_with(GatewayConfig::default).bind = Some(bind.to_string());
    }

    if let Some(port) = lookup(ENV_PORT) {
        let port: u16 = port
            .parse()
            .with_context(|| format!("{ENV_PORT} must be a port number, got '{port}'"))?;
        debug!(var = ENV_PORT, port, "Overriding gateway port");
        config.gateway.get_or_insert_with(GatewayConfig::default).port = Some(port);
    }

    if let Some(level) = lookup(ENV_LOG_LEVEL) {
        debug!(var = ENV_LOG_LEVEL, "Overriding log level");
        config.logging.get_or_insert_with(LoggingConfig::default).level = Some(level.to_string());
    }

    if let Some(dir) = lookup(ENV_LOG_DIR) {
        debug!(var = ENV_LOG_DIR, "Overriding log directory");
        config.logging.get_or_insert_with(LoggingConfig::default).dir = Some(PathBuf::from(dir));
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn overrides_port_and_bind() {
        let cfg = apply_env_overrides_with(
            VisprobeConfig::default(),
            &env(&[(ENV_PORT, "9100"), (ENV_BIND, "0.0.0.0")]),
        )
        .unwrap();
        assert_eq!(cfg.port(), 9100);
        assert_eq!(cfg.bind(), "0.0.0.0");
    }

    #[test]
    fn env_wins_over_file_value() {
        let file: VisprobeConfig = serde_yaml::from_str("logging:\n  level: warn\n").unwrap();
        let cfg = apply_env_overrides_with(file, &env(&[(ENV_LOG_LEVEL, "debug")])).unwrap();
        assert_eq!(cfg.log_level(), "debug");
    }

    #[test]
    fn empty_values_are_ignored() {
        let cfg = apply_env_overrides_with(VisprobeConfig::default(), &env(&[(ENV_LOG_DIR, "")]))
            .unwrap();
        assert!(cfg.logging.is_none());
    }

    #[test]
    fn error_on_bad_port() {
        let result =
            apply_env_overrides_with(VisprobeConfig::default(), &env(&[(ENV_PORT, "http")]));
        assert!(result.unwrap_err().to_string().contains(ENV_PORT));
    }
}
