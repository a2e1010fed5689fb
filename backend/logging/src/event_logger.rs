//! Request audit events.
//!
//! One structured event per handled request, emitted through `tracing` under
//! the `request_events` target so the file layer picks it up as NDJSON.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RequestEvent {
    Handled {
        operation: String,
        element_id: Option<String>,
        error_count: usize,
    },
    /// Text input is recorded by length only.
    TextInput {
        element_id: Option<String>,
        text_len: usize,
    },
    Failed {
        operation: String,
        error_msg: String,
    },
}

impl RequestEvent {
    pub fn handled(operation: &str, element_id: Option<&str>, error_count: usize) -> Self {
        RequestEvent::Handled {
            operation: operation.to_string(),
            element_id: element_id.map(str::to_string),
            error_count,
        }
    }

    pub fn text_input(element_id: Option<&str>, text: &str) -> Self {
        RequestEvent::TextInput {
            element_id: element_id.map(str::to_string),
            text_len: text.chars().count(),
        }
    }

    pub fn failed(operation: &str, error: impl std::fmt::Display) -> Self {
        RequestEvent::Failed {
            operation: operation.to_string(),
            error_msg: error.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RequestEventEntry {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
    pub event: RequestEvent,
}

pub struct RequestEventLogger;

impl RequestEventLogger {
    /// Stamps and emits an event, returning the logged entry.
    pub fn log_event(request_id: &str, event: RequestEvent) -> RequestEventEntry {
        let entry = RequestEventEntry {
            request_id: request_id.into(),
            timestamp: Utc::now(),
            event,
        };

        match &entry.event {
            RequestEvent::Failed { .. } => {
                warn!(target: "request_events", event = ?entry, "Request failed")
            }
            _ => info!(target: "request_events", event = ?entry, "Request handled"),
        }
        entry
    }
}
