use thiserror::Error;

use crate::node::Capability;

/// Top-level error type for visprobe.
///
/// Identity lookup misses are not errors: the registry answers `None`.
///
/// Everything except [`ProbeError::ChannelClosed`] and [`ProbeError::Timeout`]
/// is recoverable: request handlers fold it into the reply's error messages.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("{0}")]
    Resolution(String),

    #[error("Could not evaluate background brush of type '{fill_kind}' on '{node_type}'")]
    UnsupportedFill { fill_kind: String, node_type: String },

    #[error("Element of type '{node_type}' does not support {capability}")]
    CapabilityMismatch {
        node_type: String,
        capability: Capability,
    },

    #[error("{0}")]
    Property(String),

    #[error("markup error: {0}")]
    Markup(String),

    #[error("screen capture failed: {0}")]
    Capture(String),

    #[error("tree owner closed: {0}")]
    ChannelClosed(String),

    #[error("request timed out after {0} ms")]
    Timeout(u64),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ProbeError {
    /// Whether the error should be reported in a reply rather than failing the request.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, ProbeError::ChannelClosed(_) | ProbeError::Timeout(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_fill_message() {
        let err = ProbeError::UnsupportedFill {
            fill_kind: "LinearGradientBrush".into(),
            node_type: "Grid".into(),
        };
        assert_eq!(
            err.to_string(),
            "Could not evaluate background brush of type 'LinearGradientBrush' on 'Grid'"
        );
    }

    #[test]
    fn test_recoverable() {
        assert!(ProbeError::Resolution("x".into()).is_recoverable());
        assert!(!ProbeError::ChannelClosed("x".into()).is_recoverable());
        assert!(!ProbeError::Timeout(10).is_recoverable());
        assert!(ProbeError::Markup("x".into()).is_recoverable());
    }
}
