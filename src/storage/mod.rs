//! Snapshot storage abstractions and implementations.
//!
//! This module defines the [`SnapshotBackend`] trait and provides implementations:
//! - [`FileBackend`]: durable flat-file storage with atomic replacement
//! - [`MemoryBackend`]: in-memory storage for testing
//!
//! ## Design Philosophy
//!
//! - **Whole-Snapshot Writes**: the store persists the complete graph on every
//!   mutation; the backend's unit of work is the full serialized snapshot
//! - **Crash Safety**: a store must never expose a partially-written snapshot
//! - **Fail Fast**: a failed store aborts the mutating call; no silent success

mod file;
mod memory;

pub use file::FileBackend;
pub use memory::MemoryBackend;

use crate::error::Result;

/// Trait defining the snapshot storage interface.
///
/// Implementations must guarantee that `store` is atomic: after a crash at
/// any point, `load` returns either the previous snapshot or the new one,
/// never a truncated mix.
pub trait SnapshotBackend: Send + Sync {
    /// Load the current snapshot.
    ///
    /// Returns `Ok(None)` if no snapshot has ever been stored; the caller
    /// treats that as an empty graph, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Storage`](crate::StoreError::Storage) if the
    /// read fails for any reason other than absence.
    fn load(&self) -> Result<Option<String>>;

    /// Atomically replace the snapshot with new contents.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Storage`](crate::StoreError::Storage) if the
    /// write could not complete. The previous snapshot must remain intact.
    fn store(&mut self, contents: &str) -> Result<()>;
}
