//! File backend
//!
//! Stores the catalog as one file. Writes go to a sibling temp file which is
//! synced and then renamed over the catalog, so a reader sees either the old
//! document or the new one, never a truncated mix.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use bytes::Bytes;

use crate::error::{CatalogError, Result};

use super::Backend;

/// Single-file backend
#[derive(Debug, Clone)]
pub struct FileBackend {
    /// Catalog file path
    path: PathBuf,

    /// Staging file, renamed over `path` on every write
    staging_path: PathBuf,

    /// fsync the staging file before the rename
    sync: bool,
}

impl FileBackend {
    /// Open a backend for `path`, creating its parent directory if needed
    ///
    /// The catalog file itself is not created until the first write.
    pub fn open(path: impl Into<PathBuf>, sync: bool) -> Result<Self> {
        let path = path.into();

        let file_name = path.file_name().ok_or_else(|| {
            CatalogError::Config(format!("catalog path {} does not name a file", path.display()))
        })?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut staging_name = OsString::from(".");
        staging_name.push(file_name);
        staging_name.push(".tmp");
        let staging_path = path.with_file_name(staging_name);

        Ok(Self {
            path,
            staging_path,
            sync,
        })
    }

    /// Get the catalog file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_staging(&self, data: &[u8]) -> Result<()> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&self.staging_path)?;

        let mut writer = BufWriter::new(file);
        writer.write_all(data)?;
        writer.flush()?;

        let file: File = writer.into_inner().map_err(|e| e.into_error())?;
        if self.sync {
            file.sync_all()?;
        }
        Ok(())
    }
}

impl Backend for FileBackend {
    fn read(&self) -> Result<Option<Bytes>> {
        match fs::read(&self.path) {
            Ok(data) => Ok(Some(Bytes::from(data))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, data: &[u8]) -> Result<()> {
        if let Err(e) = self.write_staging(data) {
            let _ = fs::remove_file(&self.staging_path);
            return Err(e);
        }

        if let Err(e) = fs::rename(&self.staging_path, &self.path) {
            let _ = fs::remove_file(&self.staging_path);
            return Err(e.into());
        }

        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
