//! pgrid-server - Main entry point
//!
//! Catalog and filter resolution service for the dynamic grid. Owns the
//! SQLite catalog of posts and taxonomy terms, and answers the endpoint
//! queries the grid engine issues on every filter change.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pgrid_server::config::{ConfigOverrides, ServerConfig};
use pgrid_server::{build_router, db, AppState};

/// Command-line arguments for pgrid-server
#[derive(Parser, Debug)]
#[command(name = "pgrid-server")]
#[command(about = "Catalog and filter resolution service for the dynamic grid")]
#[command(version)]
struct Args {
    /// Path to the server TOML config (defaults to the platform config dir)
    #[arg(short, long, env = "PGRID_SERVER_CONFIG")]
    config: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long, env = "PGRID_SERVER_PORT")]
    port: Option<u16>,

    /// Path to the SQLite catalog file
    #[arg(short, long, env = "PGRID_DATABASE")]
    database: Option<PathBuf>,

    /// Populate an empty catalog with the demo data set
    #[arg(long)]
    seed_demo: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pgrid_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse command-line arguments
    let args = Args::parse();

    info!("Starting pgrid-server v{}", env!("CARGO_PKG_VERSION"));

    let overrides = ConfigOverrides {
        port: args.port,
        database_path: args.database,
    };
    let config_path = args
        .config
        .or_else(|| pgrid_common::config::default_config_path("server.toml"));
    let config = match config_path {
        Some(path) => ServerConfig::load(&path, overrides)
            .context("Failed to load server configuration")?,
        None => ServerConfig::default().with_overrides(overrides),
    };

    // Open the catalog and make sure the schema exists
    let pool = db::connect(&config.database_path)
        .await
        .context("Failed to open catalog database")?;
    db::init_schema(&pool)
        .await
        .context("Failed to initialize catalog schema")?;

    if args.seed_demo {
        db::seed::seed_demo(&pool)
            .await
            .context("Failed to seed demo catalog")?;
    }

    // Build the application router
    let state = AppState::new(pool);
    let app = build_router(state);

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));

    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
