use anyhow::Context;
use clap::{Parser, Subcommand};
use std::sync::Arc;

use crate::auth::FirebaseVerifier;
use crate::config::{AppConfig, StoreBackend};
use crate::database::memory::{MemoryDonorRepository, MemoryRequestRepository};
use crate::database::postgres::{PgDonorRepository, PgRequestRepository};
use crate::database::DatabaseManager;
use crate::state::AppState;

#[derive(Parser)]
#[command(name = "blood-donation-api")]
#[command(about = "REST backend for blood donors and donation requests")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve {
        #[arg(long, help = "Port to listen on, overrides PORT")]
        port: Option<u16>,
    },

    #[command(about = "Apply database migrations and exit")]
    Migrate,
}

pub async fn run(cli: Cli, config: &AppConfig) -> anyhow::Result<()> {
    match cli.command.unwrap_or(Commands::Serve { port: None }) {
        Commands::Serve { port } => serve(config, port).await,
        Commands::Migrate => migrate(config).await,
    }
}

async fn migrate(config: &AppConfig) -> anyhow::Result<()> {
    if config.database.backend == StoreBackend::Memory {
        tracing::info!("Memory store selected, nothing to migrate");
        return Ok(());
    }

    let pool = DatabaseManager::connect(&config.database).await?;
    DatabaseManager::migrate(&pool).await?;
    Ok(())
}

async fn build_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let verifier = FirebaseVerifier::from_config(&config.auth).context("identity provider setup failed")?;

    let state = match config.database.backend {
        StoreBackend::Postgres => {
            let pool = DatabaseManager::connect(&config.database)
                .await
                .context("could not connect to the database")?;
            if config.database.run_migrations {
                DatabaseManager::migrate(&pool).await?;
            }
            AppState::new(
                Arc::new(PgDonorRepository::new(pool.clone())),
                Arc::new(PgRequestRepository::new(pool)),
                Arc::new(verifier),
            )
        }
        StoreBackend::Memory => {
            tracing::warn!("Using the in-memory store; data is lost on restart");
            AppState::new(
                Arc::new(MemoryDonorRepository::new()),
                Arc::new(MemoryRequestRepository::new()),
                Arc::new(verifier),
            )
        }
    };

    Ok(state)
}

async fn serve(config: &AppConfig, port: Option<u16>) -> anyhow::Result<()> {
    let state = build_state(config).await?;
    let app = crate::routes::app(state, config);

    let bind_addr = format!("{}:{}", config.server.host, port.unwrap_or(config.server.port));
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Blood donation API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {e}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => tracing::error!("failed to install SIGTERM handler: {e}"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
