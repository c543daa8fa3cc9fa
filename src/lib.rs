//! # factgraph
//!
//! A small persistent entity-relation store for free-text knowledge.
//!
//! ## Core Principles
//!
//! - **Referential Integrity**: relations never dangle; deleting an entity
//!   cascades to every relation touching it
//! - **Idempotent Writes**: re-creating an existing entity, relation, or
//!   observation is a silent no-op, visible only as absence from the "added"
//!   list of the response
//! - **Crash-Safe Persistence**: every mutation rewrites the backing file via
//!   temp-file-then-rename, so readers never see a truncated store
//! - **Zero Magic**: an explicit store instance, no ambient globals
//!
//! ## Architecture
//!
//! factgraph is organized in layers:
//!
//! ```text
//! Collaborators (protocol layer, reviewers)
//!     ↓
//! GraphStore (batch mutations, snapshot reads, locking)
//!     ↓
//! Query functions (search, open, filter)   Codec (line-oriented records)
//!     ↓
//! Snapshot Backend (flat file, memory)
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use factgraph::{Entity, GraphStore};
//! use std::path::Path;
//!
//! // Explicit store creation with persistent flat-file storage
//! let store = GraphStore::open(Path::new("./memory.jsonl"));
//!
//! let added = store
//!     .create_entities(vec![Entity::new("Alice", "Expert")])
//!     .unwrap();
//! assert_eq!(added.len(), 1);
//!
//! // Case-insensitive substring search over names, types, and observations
//! let hits = store.search_nodes("alice").unwrap();
//! assert_eq!(hits.entities.len(), 1);
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod codec;
pub mod error;
pub mod graph;
pub mod query;
pub mod storage;

// Re-export main types
pub use error::{Result, StoreError};
pub use graph::{
    Direction, Entity, Graph, GraphStore, ObservationDeletion, ObservationInput,
    ObservationOutcome, ObservationReport, RejectedRelation, Relation, RelationOutcome,
};
pub use storage::{FileBackend, MemoryBackend, SnapshotBackend};
