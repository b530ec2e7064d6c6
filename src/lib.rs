//! # Catalog
//!
//! A file-backed product catalog with:
//! - A single pretty-printed JSON file as the durable store
//! - Reload-before-every-operation consistency
//! - Store-assigned, monotonically increasing product ids
//! - Unique product codes
//! - An HTTP surface for listing and CRUD
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      HTTP Server                            │
//! │                (axum, Multiple Clients)                     │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                    Catalog Store                            │
//! │          (one operation at a time per store)                │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  reload / persist
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │ FileBackend │          │MemoryBackend│
//!   │ (tmp+rename)│          │  (tests)    │
//!   └─────────────┘          └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod product;
pub mod backend;
pub mod store;
pub mod query;
pub mod http;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{CatalogError, Result};
pub use config::Config;
pub use product::{NewProduct, Product, ProductFields};
pub use store::{CatalogStore, Listing};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of the catalog
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
