//! Catalog Server Binary
//!
//! Serves a catalog file over HTTP.

use std::sync::Arc;

use catalog::http::Server;
use catalog::{CatalogStore, Config};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

/// Catalog Server
#[derive(Parser, Debug)]
#[command(name = "catalog-server")]
#[command(about = "HTTP server for a file-backed product catalog")]
#[command(version)]
struct Args {
    /// Catalog file
    #[arg(short, long, default_value = "./productos.json")]
    catalog: String,

    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    listen: String,

    /// Skip fsync before replacing the catalog file
    #[arg(long)]
    no_sync: bool,
}

#[tokio::main]
async fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,catalog=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("Catalog Server v{}", catalog::VERSION);
    tracing::info!("Catalog file: {}", args.catalog);
    tracing::info!("Listen address: {}", args.listen);

    // Build config from args
    let config = Config::builder()
        .catalog_path(&args.catalog)
        .listen_addr(&args.listen)
        .sync_on_persist(!args.no_sync)
        .build();

    // Open store
    let store = match CatalogStore::open(&config) {
        Ok(s) => Arc::new(s),
        Err(e) => {
            tracing::error!("Failed to open catalog: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Catalog opened ({} products)", store.len());

    // Serve until Ctrl+C
    let server = Server::new(config, store);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
