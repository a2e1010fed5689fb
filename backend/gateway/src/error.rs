//! Mapping of service faults onto HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::warn;

use visprobe_core::ProbeError;

/// A request that could not be handled at all. Recoverable failures never
/// get here; they travel in the reply's `errorMessages`.
#[derive(Debug)]
pub struct ApiError(pub ProbeError);

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub error: String,
    pub error_messages: Vec<String>,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            err if err.is_recoverable() => StatusCode::INTERNAL_SERVER_ERROR,
            ProbeError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl From<ProbeError> for ApiError {
    fn from(err: ProbeError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.0.to_string();
        warn!(status = status.as_u16(), error = %message, "Request failed in dispatcher");
        let body = ErrorBody {
            error: status
                .canonical_reason()
                .unwrap_or("error")
                .to_string(),
            error_messages: vec![message],
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closed_dispatcher_is_unavailable() {
        let err = ApiError(ProbeError::ChannelClosed("gone".into()));
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_timeout_status() {
        let err = ApiError::from(ProbeError::Timeout(50));
        assert_eq!(err.status(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn test_recoverable_error_reaching_transport_is_internal() {
        let err = ApiError::from(ProbeError::Resolution("Query did not contain any steps".into()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let err = ApiError::from(ProbeError::Other(anyhow::anyhow!("spawn failed")));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
