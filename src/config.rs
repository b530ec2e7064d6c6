//! Configuration for the catalog
//!
//! Centralized configuration with sensible defaults.

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::{CatalogError, Result};

/// Main configuration for a catalog instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Path of the durable catalog file (a pretty-printed JSON array)
    pub catalog_path: PathBuf,

    /// fsync the staged file before it replaces the catalog
    pub sync_on_persist: bool,

    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// HTTP listen address
    pub listen_addr: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from("./productos.json"),
            sync_on_persist: true,
            listen_addr: "127.0.0.1:8080".to_string(),
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check that the configuration can be used to open a store and serve it
    pub fn validate(&self) -> Result<()> {
        if self.catalog_path.as_os_str().is_empty() {
            return Err(CatalogError::Config("catalog path is empty".to_string()));
        }
        if self.catalog_path.file_name().is_none() {
            return Err(CatalogError::Config(format!(
                "catalog path {} does not name a file",
                self.catalog_path.display()
            )));
        }
        self.listen_addr.parse::<SocketAddr>().map_err(|e| {
            CatalogError::Config(format!("invalid listen address {:?}: {}", self.listen_addr, e))
        })?;
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the durable catalog file path
    pub fn catalog_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.catalog_path = path.into();
        self
    }

    /// Enable or disable fsync before the catalog file is replaced
    pub fn sync_on_persist(mut self, sync: bool) -> Self {
        self.config.sync_on_persist = sync;
        self
    }

    /// Set the HTTP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
