//! `visprobe serve`: config, logging, service and gateway wiring.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{error, info, warn};

use visprobe_config::{
    apply_all_defaults, apply_env_overrides, check, config_dir, config_file_path, load_config,
    GatewayConfig, SceneConfig, VisprobeConfig,
};
use visprobe_gateway::{start_server, GatewayState};
use visprobe_service::{ProbeService, ServiceOptions};

use crate::scene::{load_scene, read_scene};

/// Loads the config with command-line flags layered over env and file.
async fn prepare_config(
    path: Option<PathBuf>,
    port: Option<u16>,
    scene: Option<PathBuf>,
) -> Result<VisprobeConfig> {
    let path = path.unwrap_or_else(|| config_file_path(&config_dir()));
    let mut config = apply_env_overrides(load_config(&path).await?)?;

    if let Some(port) = port {
        config.gateway.get_or_insert_with(GatewayConfig::default).port = Some(port);
    }
    if let Some(scene) = scene {
        config.scene.get_or_insert_with(SceneConfig::default).markup = Some(scene);
    }
    Ok(apply_all_defaults(config))
}

pub fn service_options(config: &VisprobeConfig) -> ServiceOptions {
    ServiceOptions {
        queue_capacity: config.queue_capacity(),
        request_timeout: config.request_timeout_ms().map(Duration::from_millis),
    }
}

pub async fn run(path: Option<PathBuf>, port: Option<u16>, scene: Option<PathBuf>) -> Result<()> {
    let config = prepare_config(path, port, scene).await?;

    visprobe_logging::init_logger(config.log_dir(), config.log_level(), config.log_json());
    check(&config)?;

    let addr: SocketAddr = tokio::net::lookup_host((config.bind(), config.port()))
        .await
        .with_context(|| format!("Failed to resolve gateway address {}", config.bind()))?
        .next()
        .with_context(|| format!("No address found for {}", config.bind()))?;

    info!(
        addr = %addr,
        queue_capacity = config.queue_capacity(),
        timeout_ms = ?config.request_timeout_ms(),
        "Starting visprobe"
    );

    let service = ProbeService::headless(service_options(&config))?;
    if let Some(markup) = config.scene_markup() {
        let raw = read_scene(markup).await?;
        let windows = load_scene(&service, &raw).await?;
        info!(scene = %markup.display(), windows = windows.len(), "Preloaded scene");
    }

    let service = Arc::new(service);
    let state = GatewayState::new(Arc::clone(&service));
    start_server(addr, state, shutdown_signal()).await?;

    match Arc::try_unwrap(service) {
        Ok(service) => service.shutdown().await?,
        Err(_) => warn!("Service still referenced at exit; skipping orderly shutdown"),
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
