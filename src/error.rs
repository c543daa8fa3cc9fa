//! Error types for store operations.
//!
//! All fallible operations return [`Result<T>`] with context-rich error messages.
//!
//! Per-item batch conditions (an unknown entity name in `add_observations`, a
//! relation endpoint that does not exist) are deliberately NOT variants here:
//! they never abort a batch and are reported in the operation's outcome type
//! instead. This enum covers only failures that abort the whole call.

use thiserror::Error;

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Error type for operations on the entity-relation store.
///
/// A `Storage` error on a mutating call means the mutation was NOT committed;
/// callers must not treat the batch as applied.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Durable write or read could not complete (storage unavailable,
    /// permission denied, disk full).
    #[error("Storage error: {message}")]
    Storage {
        /// Detailed error message
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Serialization of the graph for persistence failed.
    ///
    /// Deserialization of individual persisted records never produces this:
    /// corrupt lines are skipped with a log notice on load.
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error details
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl StoreError {
    /// Create a storage error from a message and optional source.
    pub fn storage<E>(message: impl Into<String>, source: Option<E>) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Storage {
            message: message.into(),
            source: source.map(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>),
        }
    }

    /// Create a serialization error from a message and optional source.
    pub fn serialization<E>(message: impl Into<String>, source: Option<E>) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Serialization {
            message: message.into(),
            source: source.map(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>),
        }
    }
}
