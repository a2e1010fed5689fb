//! Config validation with user-friendly error messages.

use once_cell::sync::Lazy;
use regex::Regex;
use std::net::IpAddr;
use thiserror::Error;

use crate::schema::VisprobeConfig;

/// One `EnvFilter` directive: an optional `target=` prefix and a level.
static LEVEL_DIRECTIVE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[A-Za-z_][A-Za-z0-9_:\-]*=)?(?:trace|debug|info|warn|error|off)$")
        .expect("level directive pattern")
});

/// Hostname label syntax for non-IP bind addresses.
static HOSTNAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9](?:[A-Za-z0-9\-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9\-]*[A-Za-z0-9])?)*$")
        .expect("hostname pattern")
});

/// Requests above this timeout are almost certainly a unit mistake.
const MAX_SANE_TIMEOUT_MS: u64 = 10 * 60 * 1000;

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &VisprobeConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_gateway(config, &mut report);
    validate_logging(config, &mut report);
    validate_service(config, &mut report);
    validate_scene(config, &mut report);
    report
}

fn validate_gateway(config: &VisprobeConfig, report: &mut ValidationReport) {
    let Some(gw) = &config.gateway else { return };
    if let Some(bind) = &gw.bind {
        if bind.parse::<IpAddr>().is_err() && !HOSTNAME.is_match(bind) {
            report.error("gateway.bind", format!("'{bind}' is not an IP address or hostname"));
        }
    }
    if let Some(port) = gw.port {
        if port == 0 {
            report.error("gateway.port", "Port must be > 0");
        } else if port < 1024 {
            report.warn(
                "gateway.port",
                format!("Port {port} requires elevated privileges; consider using a port >= 1024"),
            );
        }
    }
}

fn validate_logging(config: &VisprobeConfig, report: &mut ValidationReport) {
    let Some(logging) = &config.logging else { return };
    if let Some(level) = &logging.level {
        let unknown: Vec<&str> = level
            .split(',')
            .map(str::trim)
            .filter(|d| !d.is_empty() && !LEVEL_DIRECTIVE.is_match(d))
            .collect();
        if !unknown.is_empty() {
            report.warn(
                "logging.level",
                format!("Unrecognized log directives {unknown:?}; they may be ignored"),
            );
        }
    }
}

fn validate_service(config: &VisprobeConfig, report: &mut ValidationReport) {
    let Some(service) = &config.service else { return };
    if service.queue_capacity == Some(0) {
        report.error("service.queueCapacity", "queueCapacity must be >= 1");
    }
    if let Some(ms) = service.request_timeout_ms {
        if ms > MAX_SANE_TIMEOUT_MS {
            report.warn(
                "service.requestTimeoutMs",
                format!("Timeout of {ms} ms is unusually long; the value is in milliseconds"),
            );
        }
    }
}

fn validate_scene(config: &VisprobeConfig, report: &mut ValidationReport) {
    let Some(markup) = config.scene_markup() else { return };
    if !markup.exists() {
        report.error(
            "scene.markup",
            format!("Markup file not found: {}", markup.display()),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{GatewayConfig, LoggingConfig, SceneConfig, ServiceConfig};

    #[test]
    fn empty_config_is_valid() {
        let report = validate(&VisprobeConfig::default());
        assert!(report.is_valid(), "errors: {:?}", report.errors);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn defaults_are_valid() {
        let cfg = crate::apply_all_defaults(VisprobeConfig::default());
        assert!(validate(&cfg).is_valid());
    }

    #[test]
    fn zero_queue_capacity_is_error() {
        let cfg = VisprobeConfig {
            service: Some(ServiceConfig {
                queue_capacity: Some(0),
                ..Default::default()
            }),
            ..Default::default()
        };
        let report = validate(&cfg);
        assert!(!report.is_valid());
        assert_eq!(report.errors[0].path, "service.queueCapacity");
    }

    #[test]
    fn bad_bind_is_error_and_hostname_is_fine() {
        let mut cfg = VisprobeConfig {
            gateway: Some(GatewayConfig {
                bind: Some("not a host".into()),
                port: Some(8080),
            }),
            ..Default::default()
        };
        assert!(!validate(&cfg).is_valid());

        cfg.gateway.as_mut().unwrap().bind = Some("localhost".into());
        assert!(validate(&cfg).is_valid());
    }

    #[test]
    fn privileged_port_warns() {
        let cfg = VisprobeConfig {
            gateway: Some(GatewayConfig {
                bind: None,
                port: Some(80),
            }),
            ..Default::default()
        };
        let report = validate(&cfg);
        assert!(report.is_valid());
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn level_directives() {
        let mut cfg = VisprobeConfig {
            logging: Some(LoggingConfig {
                level: Some("visprobe_tree=debug,info".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert!(validate(&cfg).warnings.is_empty());

        cfg.logging.as_mut().unwrap().level = Some("loud".into());
        assert_eq!(validate(&cfg).warnings[0].path, "logging.level");
    }

    #[test]
    fn missing_scene_file_is_error() {
        let cfg = VisprobeConfig {
            scene: Some(SceneConfig {
                markup: Some("/definitely/not/here/window.yaml".into()),
            }),
            ..Default::default()
        };
        let report = validate(&cfg);
        assert!(report.errors[0].message.contains("Markup file not found"));
    }
}
