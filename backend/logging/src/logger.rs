//! Structured Logger
//!
//! Wraps `tracing` with a console layer (plain or JSON), an optional rolling
//! NDJSON file layer, and `RUST_LOG`-style level control.

use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the global structured logger.
///
/// `RUST_LOG` wins over `level` when set. With `log_dir`, events are also
/// written to `visprobe.log.YYYY-MM-DD` there. Calling this twice is a no-op.
pub fn init_logger(log_dir: Option<&Path>, level: &str, json: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    let file_layer = log_dir.map(|dir| {
        let file_appender = RollingFileAppender::new(Rotation::DAILY, dir, "visprobe.log");
        fmt::layer()
            .json()
            .with_writer(file_appender)
            .with_ansi(false)
    });

    let console_plain = (!json).then(|| {
        fmt::layer()
            .with_writer(std::io::stdout)
            .with_target(false)
            .with_ansi(true)
    });
    let console_json = json.then(|| fmt::layer().json().with_writer(std::io::stdout));

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_plain)
        .with(console_json)
        .with(file_layer)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_is_harmless() {
        let dir = std::env::temp_dir().join(format!("visprobe-log-{}", std::process::id()));
        init_logger(Some(&dir), "debug", true);
        init_logger(None, "info", false);
        tracing::info!(component = "test", "logger initialised");
    }
}
