//! visprobe gateway HTTP API server
//!
//! Exposes every service operation as a JSON POST route plus a health check.

pub mod error;
pub mod health_api;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use server::{router, start_server, GatewayState};
