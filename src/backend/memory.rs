//! In-memory backend
//!
//! Clones share one buffer, so a test can hand one clone to a store and keep
//! another to inspect or tamper with what was "written to disk".

use std::sync::Arc;

use bytes::Bytes;
use parking_lot::RwLock;

use crate::error::Result;

use super::Backend;

/// Shared in-memory document
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    data: Arc<RwLock<Option<Bytes>>>,
}

impl MemoryBackend {
    /// Create an empty backend (nothing stored yet)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend that already holds `data`
    pub fn with_contents(data: impl Into<Bytes>) -> Self {
        Self {
            data: Arc::new(RwLock::new(Some(data.into()))),
        }
    }

    /// Current document, if any
    pub fn contents(&self) -> Option<Bytes> {
        self.data.read().clone()
    }

    /// Overwrite the document out-of-band
    pub fn set_contents(&self, data: impl Into<Bytes>) {
        *self.data.write() = Some(data.into());
    }

    /// Forget the document, as if the file were deleted
    pub fn clear(&self) {
        *self.data.write() = None;
    }
}

impl Backend for MemoryBackend {
    fn read(&self) -> Result<Option<Bytes>> {
        Ok(self.data.read().clone())
    }

    fn write(&self, data: &[u8]) -> Result<()> {
        *self.data.write() = Some(Bytes::copy_from_slice(data));
        Ok(())
    }

    fn describe(&self) -> String {
        "<memory>".to_string()
    }
}
