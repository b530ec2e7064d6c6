//! HTTP Server
//!
//! Binds the listen address and serves the catalog router until shutdown.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use crate::backend::{Backend, FileBackend};
use crate::config::Config;
use crate::error::{CatalogError, Result};
use crate::store::CatalogStore;

use super::router;

/// HTTP server for a catalog store
pub struct Server<B: Backend = FileBackend> {
    config: Config,
    store: Arc<CatalogStore<B>>,
}

impl<B: Backend + 'static> Server<B> {
    /// Create a new server with the given config and store
    pub fn new(config: Config, store: Arc<CatalogStore<B>>) -> Self {
        Self { config, store }
    }

    /// Bind `listen_addr` and serve until Ctrl+C
    pub async fn run(self) -> Result<()> {
        let listener = TcpListener::bind(self.config.listen_addr.as_str())
            .await
            .map_err(|e| {
                tracing::error!("Failed to bind {}: {}", self.config.listen_addr, e);
                CatalogError::from(e)
            })?;

        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an already-bound listener until `shutdown` resolves
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr: SocketAddr = listener.local_addr()?;
        tracing::info!("Catalog server listening on http://{}", addr);

        axum::serve(listener, router(self.store))
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("Catalog server stopped");
        Ok(())
    }

    pub fn store(&self) -> &Arc<CatalogStore<B>> {
        &self.store
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Received Ctrl+C, initiating shutdown...");
}
