//! Store Module
//!
//! The catalog store: the authoritative product collection and its durable
//! mirror.
//!
//! ## Responsibilities
//! - Resynchronize from the backend before every operation
//! - Validate and id-assign new records
//! - Persist the whole collection after every mutation
//!
//! ## Operation Shape
//! ```text
//!   lock ──► reload ──► compute ──► persist ──► unlock
//!              │                       │
//!              ▼                       ▼
//!        Backend::read()        Backend::write()
//! ```

mod catalog;
mod listing;

pub use catalog::{CatalogStore, LoadState};
pub use listing::Listing;
