//! `visprobe-config` — runtime configuration for the visprobe server.
//!
//! Provides:
//! - Typed config schema (gateway, logging, service, scene)
//! - YAML loading with a defaults fallback for missing files
//! - `VISPROBE_*` environment overrides
//! - Default value application
//! - Validation with errors and warnings

pub mod defaults;
pub mod env;
pub mod io;
pub mod schema;
pub mod validation;

pub use defaults::apply_all_defaults;
pub use env::{apply_env_overrides, apply_env_overrides_with};
pub use io::{config_dir, config_file_path, load_config, parse_config};
pub use schema::{GatewayConfig, LoggingConfig, SceneConfig, ServiceConfig, VisprobeConfig};
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{bail, Result};
use std::path::Path;

/// Load, apply env overrides and defaults, then validate a config file.
///
/// This is the main entry point for loading a config at runtime. Warnings
/// are logged; any error fails the load.
pub async fn load_and_prepare(path: &Path) -> Result<VisprobeConfig> {
    let config = load_config(path).await?;
    let config = apply_env_overrides(config)?;
    let config = apply_all_defaults(config);
    check(&config)?;
    Ok(config)
}

/// Validate, log every finding, and fail if there are errors.
pub fn check(config: &VisprobeConfig) -> Result<()> {
    let report = validate(config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    for error in &report.errors {
        tracing::error!(path = %error.path, message = %error.message, "Config error");
    }
    if !report.is_valid() {
        let messages: Vec<String> = report.errors.iter().map(ToString::to_string).collect();
        bail!("Invalid configuration:\n{}", messages.join("\n"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_and_prepare_missing_file() {
        let cfg = load_and_prepare(Path::new("/definitely/not/here/config.yaml"))
            .await
            .unwrap();
        assert!(cfg.gateway.is_some());
        assert!(cfg.service.is_some());
    }

    #[test]
    fn test_check_rejects_errors() {
        let cfg = VisprobeConfig {
            service: Some(ServiceConfig {
                queue_capacity: Some(0),
                ..Default::default()
            }),
            ..Default::default()
        };
        let err = check(&cfg).unwrap_err();
        assert!(err.to_string().contains("queueCapacity"));
    }
}
