//! `visprobe-service` — the request surface of visprobe.
//!
//! [`ProbeService`] accepts requests from any thread or task and runs them on
//! a single tree-owner thread through the [`Dispatcher`], where the
//! [`Host`] handlers resolve elements and act on them.

pub mod dispatcher;
pub mod handlers;
pub mod host;
pub mod protocol;
pub mod service;

pub use dispatcher::{Dispatcher, DEFAULT_QUEUE_CAPACITY};
pub use host::Host;
pub use protocol::*;
pub use service::{ProbeService, ServiceOptions};
