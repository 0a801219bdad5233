//! Pelilauta API server
//!
//! ```bash
//! # Run with ./pelilauta.toml (written with defaults when missing)
//! pelilauta-server
//!
//! # Use another config file
//! pelilauta-server /etc/pelilauta.toml
//!
//! # Override the bind address, enable debug logging
//! PELILAUTA_BIND=0.0.0.0:8080 RUST_LOG=pelilauta=debug pelilauta-server
//! ```

use anyhow::Context;
use pelilauta_engine::{Database, PelilautaConfig, CONFIG_FILE_NAME};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pelilauta=info,tower_http=info".into()),
        )
        .init();

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));

    PelilautaConfig::write_default_if_missing(&config_path)
        .with_context(|| format!("failed to write {}", config_path.display()))?;
    let config = PelilautaConfig::from_file(&config_path)
        .with_context(|| format!("failed to load {}", config_path.display()))?
        .apply_env();
    info!(target: "pelilauta::api", config = %config_path.display(), bind = %config.bind, "Configuration loaded");

    let db = Database::open(config).context("failed to open database")?;
    pelilauta_api::serve(db).await
}
