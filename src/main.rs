//! AnimeStream Server
//!
//! Main entry point that wires all crates together and starts the server.

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use animestream_api::{build_state, run_server};
use animestream_core::config::{AppConfig, CONFIG_PATH_ENV};
use animestream_database::Stores;

/// Anime catalog and video delivery server.
#[derive(Debug, Parser)]
#[command(name = "animestream-server", version, about)]
struct Cli {
    /// Extra configuration file layered over `config/default.toml`.
    #[arg(long, env = CONFIG_PATH_ENV)]
    config: Option<String>,

    /// Insert the sample anime before serving.
    #[arg(long)]
    seed_sample: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match AppConfig::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config, cli.seed_sample).await {
        tracing::error!("Server error: {e:#}");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig, seed_sample: bool) -> anyhow::Result<()> {
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        provider = ?config.database.provider,
        upload_dir = %config.storage.upload_dir,
        "Starting AnimeStream"
    );

    let stores = Stores::from_config(&config)
        .await
        .context("Failed to initialize stores")?;

    let state = build_state(config, stores.clone())
        .await
        .context("Failed to build application state")?;

    if seed_sample {
        match state.catalog_service.seed_sample().await {
            Ok(Some(anime)) => tracing::info!(anime_id = %anime.id, "Sample anime created"),
            Ok(None) => tracing::info!("Sample anime already present"),
            Err(e) => tracing::error!(error = %e, "Error creating sample anime"),
        }
    }

    let result = run_server(state).await.context("HTTP server failed");

    stores.close().await;
    tracing::info!("AnimeStream server shut down");
    result
}
