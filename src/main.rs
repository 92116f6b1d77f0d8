use clap::Parser;
use tracing_subscriber::EnvFilter;

use blood_donation_api::cli::{self, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so DATABASE_URL, FIREBASE_CREDENTIALS, etc. are picked up
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,tower_http=info")),
        )
        .init();

    let cli = Cli::parse();

    // Initialize configuration (this loads the config singleton)
    let config = blood_donation_api::config::config();
    tracing::info!("Starting blood donation API in {:?} mode", config.environment);

    cli::run(cli, config).await
}
