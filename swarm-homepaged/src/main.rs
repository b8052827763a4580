mod api;
mod config;
mod discovery;

use std::sync::Arc;
use anyhow::{Context, Result};
use crate::config::Config;
use crate::discovery::{Discovery, DockerSource, TraefikSource};

const DEFAULT_CONFIG_PATH: &str = "/etc/swarm-homepage/homepaged.toml";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("swarm_homepaged=info")),
        )
        .init();

    tracing::info!("Starting swarm-homepaged");

    // Load config; an explicit path is required to exist, the default is not
    let config = match std::env::args().nth(1) {
        Some(path) => {
            let mut config = Config::load(&path)
                .with_context(|| format!("Failed to load config from {}", path))?;
            tracing::info!("Loaded config from {}", path);
            config.apply_env();
            config
        }
        None => Config::load_or_default(DEFAULT_CONFIG_PATH)?,
    };

    // The Docker connection is established once and injected; if it fails
    // the source stays degraded and discovery falls back to Traefik.
    let docker = DockerSource::connect(&config.docker).await;
    let traefik = TraefikSource::new(&config.traefik)?;
    let discovery = Discovery::new(Box::new(docker), Box::new(traefik));

    // Build API router
    let state = api::routes::AppState {
        discovery: Arc::new(discovery),
    };
    let app = api::routes::router(state);

    // Bind HTTP server
    let listener = tokio::net::TcpListener::bind(&config.api.listen)
        .await
        .with_context(|| format!("Failed to bind to {}", config.api.listen))?;

    tracing::info!("API listening on {}", config.api.listen);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutdown signal received");
        })
        .await
        .context("Server error")?;

    tracing::info!("Shutdown complete");
    Ok(())
}
