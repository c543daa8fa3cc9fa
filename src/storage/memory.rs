//! In-memory storage backend for testing.
//!
//! **Warning**: All data is lost when the backend is dropped. Only use for
//! testing and ephemeral graphs.

use super::SnapshotBackend;
use crate::error::Result;

/// In-memory snapshot storage.
///
/// Holds the serialized snapshot as a plain string behind the same trait as
/// [`FileBackend`](super::FileBackend), so store logic is exercised
/// identically in tests.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    snapshot: Option<String>,
}

impl MemoryBackend {
    /// Create an empty in-memory backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend pre-seeded with snapshot contents.
    ///
    /// Useful for testing load behavior against hand-written record files.
    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            snapshot: Some(contents.into()),
        }
    }
}

impl SnapshotBackend for MemoryBackend {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.snapshot.clone())
    }

    fn store(&mut self, contents: &str) -> Result<()> {
        self.snapshot = Some(contents.to_string());
        Ok(())
    }
}
