//! Error types for the catalog
//!
//! Provides a unified error type for all store operations. Every variant is
//! logged where it occurs; callers match on the variant instead of inferring
//! failure from an absent value.

use thiserror::Error;

/// Result type alias using CatalogError
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Unified error type for catalog operations
#[derive(Debug, Error)]
pub enum CatalogError {
    // -------------------------------------------------------------------------
    // Durable File Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse catalog file: {0}")]
    Parse(String),

    #[error("Failed to encode catalog: {0}")]
    Encode(String),

    // -------------------------------------------------------------------------
    // Record Errors
    // -------------------------------------------------------------------------
    #[error("Missing required fields: {}", .0.join(", "))]
    Validation(Vec<&'static str>),

    #[error("A product with code {0:?} already exists")]
    DuplicateCode(String),

    #[error("Product {0} not found")]
    NotFound(u64),

    #[error("No product ids left to assign")]
    IdsExhausted,

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CatalogError {
    /// Short, stable name of the failure kind (used in logs)
    pub fn kind(&self) -> &'static str {
        match self {
            CatalogError::Io(_) => "io",
            CatalogError::Parse(_) => "parse",
            CatalogError::Encode(_) => "encode",
            CatalogError::Validation(_) => "validation",
            CatalogError::DuplicateCode(_) => "duplicate_code",
            CatalogError::NotFound(_) => "not_found",
            CatalogError::IdsExhausted => "ids_exhausted",
            CatalogError::Config(_) => "config",
        }
    }
}
