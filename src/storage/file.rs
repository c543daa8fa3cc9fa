//! Flat-file storage backend for production use.
//!
//! The snapshot lives in a single line-delimited text file. Every store
//! writes the new snapshot to a sibling temporary file and renames it into
//! place, so a crash mid-write never leaves a truncated store visible.

use super::SnapshotBackend;
use crate::error::{Result, StoreError};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Durable flat-file snapshot storage.
///
/// This is the production backend. It provides:
/// - Atomic snapshot replacement (write-temp-then-rename)
/// - Missing-file-as-empty semantics on first access
/// - Parent directory creation on first store
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    /// Create a backend persisting to the given file path.
    ///
    /// The file does not need to exist yet; an absent file loads as an
    /// empty graph.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SnapshotBackend for FileBackend {
    fn load(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StoreError::storage(
                format!("Failed to read store file {:?}", self.path),
                Some(err),
            )),
        }
    }

    fn store(&mut self, contents: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    StoreError::storage(
                        format!("Failed to create store directory {parent:?}"),
                        Some(e),
                    )
                })?;
            }
        }

        let tmp = self.temp_path();
        let mut file = fs::File::create(&tmp).map_err(|e| {
            StoreError::storage(format!("Failed to create temp file {tmp:?}"), Some(e))
        })?;
        file.write_all(contents.as_bytes())
            .and_then(|_| file.sync_all())
            .map_err(|e| {
                StoreError::storage(format!("Failed to write temp file {tmp:?}"), Some(e))
            })?;
        drop(file);

        fs::rename(&tmp, &self.path).map_err(|e| {
            StoreError::storage(
                format!("Failed to move snapshot into place at {:?}", self.path),
                Some(e),
            )
        })
    }
}
