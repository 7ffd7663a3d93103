//! newsdesk-api - News curation REST service
//!
//! Ingests articles from external news aggregators, deduplicates them by
//! url, and exposes the review, state-assignment, and reporting endpoints.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use newsdesk_api::AppState;
use newsdesk_common::config::Config;

/// Command-line arguments for newsdesk-api
#[derive(Parser, Debug)]
#[command(name = "newsdesk-api")]
#[command(about = "News curation REST service")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "4020", env = "NEWSDESK_PORT")]
    port: u16,

    /// Path to the SQLite database file (overrides env and config file)
    #[arg(short, long)]
    database: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "newsdesk_api=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    info!("Starting newsdesk-api on port {}", args.port);
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config = Config::resolve(args.database.clone()).context("Failed to resolve config")?;
    info!("Database: {}", config.database_path.display());

    let pool = newsdesk_common::db::init_database(&config.database_path)
        .await
        .context("Failed to initialize database")?;

    let state = AppState::new(pool, config);
    let app = newsdesk_api::build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("Listening on http://{}", addr);

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
        }
        _ = terminate => {
            info!("Received SIGTERM, shutting down");
        }
    }
}
