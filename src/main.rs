//! BCV Exchange Rate API
//!
//! Scrapes the official USD rate from bcv.org.ve with a headless browser
//! and serves it over a small REST API.

mod cli;
mod config;
mod retry;
mod routes;
mod scraper;
mod types;

use axum::{routing::get, Router};
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Commands};
use crate::config::AppConfig;
use crate::routes::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { host, port } => run_server(Some(host), Some(port)).await,
        Commands::Fetch { retries, pretty } => {
            init_logging();
            cli::run_fetch(retries, pretty).await
        }
    }
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bcv_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Run the API server.
async fn run_server(host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    init_logging();

    // Load configuration
    let mut config = AppConfig::load()?;

    // Override with CLI args
    if let Some(h) = host {
        config.server.host = h;
    }
    if let Some(p) = port {
        config.server.port = p;
    }

    tracing::info!("Configuration loaded");
    tracing::info!("Scrape target: {}", config.scraper.url);
    tracing::info!(
        "Launch target: {}",
        if config.scraper.serverless {
            "serverless"
        } else {
            "local"
        }
    );

    // Create application state
    let state = Arc::new(AppState {
        config: config.clone(),
    });

    // Build router
    let app = Router::new()
        .route("/health", get(routes::health))
        .route("/api/bcv", get(routes::bcv_rate))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    // Start server
    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
