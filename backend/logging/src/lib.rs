//! Structured logging for visprobe.
//!
//! Console output, daily-rotated NDJSON files, and per-request audit events.

pub mod event_logger;
pub mod logger;

pub use event_logger::{RequestEvent, RequestEventEntry, RequestEventLogger};
pub use logger::init_logger;
