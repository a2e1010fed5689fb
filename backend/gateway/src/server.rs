//! Main HTTP gateway server.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, instrument};

use visprobe_service::ProbeService;

use crate::{health_api, routes};

/// Application state shared across routes.
#[derive(Clone, Debug)]
pub struct GatewayState {
    pub service: Arc<ProbeService>,
    pub started: Instant,
}

impl GatewayState {
    pub fn new(service: Arc<ProbeService>) -> Self {
        Self {
            service,
            started: Instant::now(),
        }
    }
}

/// Builds the gateway router.
pub fn router(state: GatewayState) -> Router {
    Router::new()
        .route("/api/health", get(health_api::get_health))
        .route("/v1/windows", post(routes::windows))
        .route("/v1/main-window", post(routes::main_window))
        .route("/v1/element", post(routes::element))
        .route("/v1/property/get", post(routes::get_property))
        .route("/v1/property/set", post(routes::set_property))
        .route("/v1/background", post(routes::background))
        .route("/v1/resource", post(routes::resource))
        .route("/v1/coordinates", post(routes::coordinates))
        .route("/v1/application/initialize", post(routes::initialize_application))
        .route("/v1/window", post(routes::create_window))
        .route("/v1/image", post(routes::image))
        .route("/v1/focus", post(routes::focus))
        .route("/v1/input", post(routes::input))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves the gateway until the listener fails or `shutdown` resolves.
#[instrument(skip(state, shutdown))]
pub async fn start_server<F>(addr: SocketAddr, state: GatewayState, shutdown: F) -> Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let app = router(state);

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind gateway to {addr}"))?;
    info!("Gateway HTTP server listening on {}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("gateway server failed")?;

    info!("Gateway HTTP server stopped");
    Ok(())
}
