//! Backend Module
//!
//! Durable storage for the serialized catalog.
//!
//! ## Responsibilities
//! - Hand back the whole catalog document, or nothing if it was never written
//! - Replace the whole document in one step
//!
//! The store never appends or patches: every write is the full collection,
//! so a backend only has to make each replacement all-or-nothing.
//!
//! ## Implementations
//! - `FileBackend`: a single file, replaced via write-to-temp + rename
//! - `MemoryBackend`: a shared in-memory buffer for tests and tooling

mod file;
mod memory;

use bytes::Bytes;

use crate::error::Result;

pub use file::FileBackend;
pub use memory::MemoryBackend;

/// Whole-document storage used by the catalog store
pub trait Backend: Send + Sync {
    /// Read the stored document
    ///
    /// Returns:
    /// - `Ok(Some(bytes))` — the document (possibly empty)
    /// - `Ok(None)` — nothing has been stored yet
    fn read(&self) -> Result<Option<Bytes>>;

    /// Replace the stored document with `data`
    fn write(&self, data: &[u8]) -> Result<()>;

    /// Human-readable location, for logs
    fn describe(&self) -> String;
}

impl<B: Backend + ?Sized> Backend for Box<B> {
    fn read(&self) -> Result<Option<Bytes>> {
        (**self).read()
    }

    fn write(&self, data: &[u8]) -> Result<()> {
        (**self).write(data)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
