//! Config defaults: applies default values to parsed config.

use crate::schema::{GatewayConfig, LoggingConfig, ServiceConfig, VisprobeConfig};

pub const DEFAULT_BIND: &str = "127.0.0.1";

pub const DEFAULT_PORT: u16 = 7410;

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Matches the dispatcher's own default queue depth.
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 30_000;

/// Apply all defaults to a freshly loaded config.
pub fn apply_all_defaults(config: VisprobeConfig) -> VisprobeConfig {
    let config = apply_gateway_defaults(config);
    let config = apply_logging_defaults(config);
    apply_service_defaults(config)
}

fn apply_gateway_defaults(mut config: VisprobeConfig) -> VisprobeConfig {
    let gateway = config.gateway.get_or_insert_with(GatewayConfig::default);
    if gateway.bind.is_none() {
        gateway.bind = Some(DEFAULT_BIND.to_string());
    }
    if gateway.port.is_none() {
        gateway.port = Some(DEFAULT_PORT);
    }
    config
}

fn apply_logging_defaults(mut config: VisprobeConfig) -> VisprobeConfig {
    let logging = config.logging.get_or_insert_with(LoggingConfig::default);
    if logging.level.is_none() {
        logging.level = Some(DEFAULT_LOG_LEVEL.to_string());
    }
    if logging.json.is_none() {
        logging.json = Some(false);
    }
    config
}

fn apply_service_defaults(mut config: VisprobeConfig) -> VisprobeConfig {
    let service = config.service.get_or_insert_with(ServiceConfig::default);
    if service.queue_capacity.is_none() {
        service.queue_capacity = Some(DEFAULT_QUEUE_CAPACITY);
    }
    if service.request_timeout_ms.is_none() {
        service.request_timeout_ms = Some(DEFAULT_REQUEST_TIMEOUT_MS);
    }
    config
}
