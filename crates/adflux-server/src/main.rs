//! # AdFlux Server
//!
//! Main binary: loads configuration, opens the database pool once and
//! serves the catalog API together with the local media directory.

use adflux_api::{AppState, build_router};
use adflux_common::config::{self, AppConfig, LogFormat};
use adflux_db::{AdStore, Database};
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "adflux", version, about = "Media-asset catalog server")]
struct Cli {
    /// Config file to load instead of ./config.toml
    #[arg(short, long, env = "ADFLUX_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the HTTP API (default)
    Serve,
    /// Connect to the database, run a test query and exit
    CheckDb,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = config::load(cli.config.as_deref()).context("Failed to load configuration")?;

    init_tracing(&config);

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::CheckDb => check_db(config).await,
    }
}

fn init_tracing(config: &AppConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "adflux=debug,tower_http=debug".into());

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    match config.log.format {
        LogFormat::Pretty => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

async fn serve(config: AppConfig) -> anyhow::Result<()> {
    tracing::info!("Starting AdFlux v{}", env!("CARGO_PKG_VERSION"));

    // Connect to the database
    let db = Database::connect(&config.database).await?;

    match &config.server.public_url {
        Some(origin) => tracing::info!(%origin, "Media URLs resolve against configured public origin"),
        None => tracing::info!(
            trust_proxy = config.server.trust_proxy,
            "Media URLs resolve against each request's origin"
        ),
    }
    tracing::info!(
        dir = %config.media.dir,
        prefix = %config.media.prefix,
        "Serving local media"
    );

    let state = AppState::new(Arc::new(db), &config);
    let router = build_router(state);

    let addr = SocketAddr::new(
        config
            .server
            .host
            .parse()
            .with_context(|| format!("Invalid server.host {:?}", config.server.host))?,
        config.server.port,
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("REST API listening on http://{addr}");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn check_db(config: AppConfig) -> anyhow::Result<()> {
    let db = Database::connect(&config.database).await?;
    let result = db.ping().await.context("Database query failed")?;
    tracing::info!(result, "Database connection verified");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutdown signal received");
}
