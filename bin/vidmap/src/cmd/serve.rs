//! Serve command - HTTP server for the sitemap routes

use std::{path::Path, sync::Arc};

use color_eyre::eyre::{Result, WrapErr};
use tokio::net::TcpListener;

use super::load_config;
use crate::{
    server::{ServerState, create_router},
    source::JsonFileSource,
};

/// Run the serve command.
///
/// Serves `/image-sitemap.xml` and `/video-sitemap.xml`, with the public
/// directory as fallback.
pub async fn run(config_path: &Path, port: Option<u16>, base_url: Option<&str>) -> Result<()> {
    let mut config = load_config(config_path, base_url)?;
    if let Some(port) = port {
        config.server.port = port;
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let source = JsonFileSource::new(&config.source.path);
    tracing::info!(%addr, source = ?source.path(), "Starting server");

    let app = create_router(Arc::new(ServerState::new(config, source)));

    let listener = TcpListener::bind(&addr)
        .await
        .wrap_err_with(|| format!("Failed to bind to {addr}"))?;

    println!();
    println!("  Sitemaps served at http://{addr}");
    println!("  Press Ctrl+C to stop");
    println!();

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .wrap_err("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
    }
}
