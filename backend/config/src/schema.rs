//! visprobe runtime configuration schema.
//!
//! Every field is optional on disk; [`crate::apply_all_defaults`] fills the
//! gaps after loading.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisprobeConfig {
    /// HTTP gateway settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway: Option<GatewayConfig>,

    /// Log level, file directory and format
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,

    /// Dispatcher queue and request timeout
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<ServiceConfig>,

    /// Scene preloaded at startup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scene: Option<SceneConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    /// `EnvFilter` directives, e.g. `info` or `visprobe_tree=debug,info`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    /// Directory for the daily rolling log file. Console only when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub queue_capacity: Option<usize>,
    /// 0 disables the timeout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneConfig {
    /// Window markup file shown when the service starts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markup: Option<PathBuf>,
}

impl VisprobeConfig {
    pub fn bind(&self) -> &str {
        self.gateway
            .as_ref()
            .and_then(|g| g.bind.as_deref())
            .unwrap_or(crate::defaults::DEFAULT_BIND)
    }

    pub fn port(&self) -> u16 {
        self.gateway
            .as_ref()
            .and_then(|g| g.port)
            .unwrap_or(crate::defaults::DEFAULT_PORT)
    }

    pub fn log_level(&self) -> &str {
        self.logging
            .as_ref()
            .and_then(|l| l.level.as_deref())
            .unwrap_or(crate::defaults::DEFAULT_LOG_LEVEL)
    }

    pub fn log_dir(&self) -> Option<&std::path::Path> {
        self.logging.as_ref().and_then(|l| l.dir.as_deref())
    }

    pub fn log_json(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }

    pub fn queue_capacity(&self) -> usize {
        self.service
            .as_ref()
            .and_then(|s| s.queue_capacity)
            .unwrap_or(crate::defaults::DEFAULT_QUEUE_CAPACITY)
    }

    /// `None` when the timeout is disabled.
    pub fn request_timeout_ms(&self) -> Option<u64> {
        let ms = self
            .service
            .as_ref()
            .and_then(|s| s.request_timeout_ms)
            .unwrap_or(crate::defaults::DEFAULT_REQUEST_TIMEOUT_MS);
        (ms > 0).then_some(ms)
    }

    pub fn scene_markup(&self) -> Option<&std::path::Path> {
        self.scene.as_ref().and_then(|s| s.markup.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_camel_case_yaml() {
        let raw = "
gateway:
  port: 9000
service:
  queueCapacity: 8
  requestTimeoutMs: 0
scene:
  markup: ./window.yaml
";
        let cfg: VisprobeConfig = serde_yaml::from_str(raw).unwrap();
        assert_eq!(cfg.port(), 9000);
        assert_eq!(cfg.queue_capacity(), 8);
        assert_eq!(cfg.request_timeout_ms(), None);
        assert_eq!(cfg.scene_markup(), Some(std::path::Path::new("./window.yaml")));
    }

    #[test]
    fn test_accessors_fall_back_to_defaults() {
        let cfg = VisprobeConfig::default();
        assert_eq!(cfg.bind(), "127.0.0.1");
        assert_eq!(cfg.log_level(), "info");
        assert!(!cfg.log_json());
        assert!(cfg.log_dir().is_none());
        assert_eq!(cfg.request_timeout_ms(), Some(30_000));
    }
}
