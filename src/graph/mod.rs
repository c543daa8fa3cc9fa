//! Core model types and the store.
//!
//! This module defines the fundamental building blocks:
//! - [`Entity`]: named records carrying free-text observations
//! - [`Relation`]: directed, typed edges between entity names
//! - [`GraphStore`]: the store interface enforcing the graph invariants

mod store;
mod types;

pub use store::{
    GraphStore, ObservationDeletion, ObservationInput, ObservationOutcome, ObservationReport,
    RejectedRelation, RelationOutcome,
};
pub use types::{Direction, Entity, Graph, Relation};

pub(crate) use types::GraphState;
