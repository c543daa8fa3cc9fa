//! Main GraphStore interface for store operations.

use super::types::{Direction, Entity, Graph, GraphState, Relation};
use crate::codec;
use crate::error::Result;
use crate::query;
use crate::storage::{FileBackend, MemoryBackend, SnapshotBackend};
use log::{debug, info, trace};
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Input for adding observations to a named entity.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ObservationInput {
    /// Name of the entity to extend
    #[serde(rename = "entityName")]
    pub entity_name: String,
    /// Observation strings to append (duplicates of stored text are ignored)
    pub contents: Vec<String>,
}

/// Per-entity result of an `add_observations` call.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ObservationReport {
    /// Name of the entity that was extended
    #[serde(rename = "entityName")]
    pub entity_name: String,
    /// Observation strings actually appended (duplicates excluded)
    #[serde(rename = "addedObservations")]
    pub added_observations: Vec<String>,
}

/// Full outcome of an `add_observations` batch.
///
/// Items naming an unknown entity fail individually; the rest of the batch
/// still applies.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ObservationOutcome {
    /// Per-entity reports for items whose entity exists
    pub applied: Vec<ObservationReport>,
    /// Entity names that do not exist in the store (NotFound, per item)
    #[serde(rename = "unknownEntities")]
    pub unknown_entities: Vec<String>,
}

/// Input for deleting observation strings from a named entity.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ObservationDeletion {
    /// Name of the entity to trim
    #[serde(rename = "entityName")]
    pub entity_name: String,
    /// Observation strings to remove (absent strings are a no-op)
    pub observations: Vec<String>,
}

/// A relation rejected by `create_relations` because an endpoint is unknown.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RejectedRelation {
    /// The relation as submitted
    pub relation: Relation,
    /// Endpoint names that do not exist in the store
    #[serde(rename = "missingEndpoints")]
    pub missing_endpoints: Vec<String>,
}

/// Full outcome of a `create_relations` batch.
///
/// Duplicated triples are silently skipped (absent from both lists);
/// relations with unknown endpoints land in `rejected` without aborting
/// their siblings.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RelationOutcome {
    /// Relations actually added
    pub added: Vec<Relation>,
    /// Relations rejected for referential violations
    pub rejected: Vec<RejectedRelation>,
}

/// The persistent entity-relation store.
///
/// `GraphStore` owns the canonical on-disk state and is the single public
/// interface collaborators use: batch mutations, full-snapshot reads, and
/// query passthroughs. Every mutating call is one read-modify-write-persist
/// unit under an exclusive lock; reads share the lock and never observe a
/// mid-write snapshot. The store holds no cached state between calls, so it
/// is safe to recover after a writer panic.
///
/// Wire the system together by creating one instance and handing out
/// references; there is no ambient global.
pub struct GraphStore {
    backend: RwLock<Box<dyn SnapshotBackend>>,
}

impl GraphStore {
    /// Create a store persisting to a flat file at the given path.
    ///
    /// Nothing is read until the first operation; an absent file is an empty
    /// graph, not an error.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        info!("Opening graph store at path: {:?}", path.as_ref());
        Self::with_backend(Box::new(FileBackend::new(path)))
    }

    /// Create an in-memory store for testing.
    ///
    /// **Warning**: All data is lost when the store is dropped.
    pub fn in_memory() -> Self {
        Self::with_backend(Box::new(MemoryBackend::new()))
    }

    /// Create a store over an explicit snapshot backend.
    ///
    /// This is the seam for custom storage; [`GraphStore::open`] and
    /// [`GraphStore::in_memory`] are conveniences over it.
    pub fn with_backend(backend: Box<dyn SnapshotBackend>) -> Self {
        Self {
            backend: RwLock::new(backend),
        }
    }

    /// Add each entity whose name is not already present.
    ///
    /// Colliding names are silently skipped (idempotent create), including
    /// collisions within the batch itself. Duplicate observation strings in
    /// an incoming entity are collapsed, first occurrence wins.
    ///
    /// # Returns
    ///
    /// The subset of entities actually added.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Storage`](crate::StoreError::Storage) if
    /// persistence fails; no entity from the batch is committed in that case.
    pub fn create_entities(&self, entities: Vec<Entity>) -> Result<Vec<Entity>> {
        debug!("Creating batch of {} entities", entities.len());
        self.mutate(|state| {
            let mut added = Vec::new();
            for entity in entities {
                if state.entities.contains_key(&entity.name) {
                    trace!("Entity '{}' already exists; skipping", entity.name);
                    continue;
                }
                let name = entity.name.clone();
                state.upsert_entity(entity);
                added.push(state.entities[&name].clone());
            }
            added
        })
    }

    /// Add each relation triple not already present whose endpoints both
    /// resolve to existing entities.
    ///
    /// A relation naming an unknown endpoint is rejected individually and
    /// reported in the outcome; the rest of the batch proceeds. Re-creating
    /// an existing triple is a silent no-op.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Storage`](crate::StoreError::Storage) if
    /// persistence fails; nothing from the batch is committed in that case.
    pub fn create_relations(&self, relations: Vec<Relation>) -> Result<RelationOutcome> {
        debug!("Creating batch of {} relations", relations.len());
        self.mutate(|state| {
            let mut outcome = RelationOutcome::default();
            for relation in relations {
                let mut missing = Vec::new();
                if !state.entities.contains_key(&relation.from) {
                    missing.push(relation.from.clone());
                }
                if !state.entities.contains_key(&relation.to) {
                    missing.push(relation.to.clone());
                }
                if !missing.is_empty() {
                    debug!(
                        "Rejecting relation {} -> {} ({}): unknown endpoint",
                        relation.from, relation.to, relation.relation_type
                    );
                    outcome.rejected.push(RejectedRelation {
                        relation,
                        missing_endpoints: missing,
                    });
                    continue;
                }
                if state.insert_relation(relation.clone()) {
                    outcome.added.push(relation);
                }
            }
            outcome
        })
    }

    /// Append observation strings to named entities.
    ///
    /// Strings already present verbatim are ignored. An item naming an
    /// unknown entity fails with a NotFound condition, reported in the
    /// outcome, while its siblings still apply.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Storage`](crate::StoreError::Storage) if
    /// persistence fails; nothing from the batch is committed in that case.
    pub fn add_observations(&self, inputs: Vec<ObservationInput>) -> Result<ObservationOutcome> {
        debug!("Adding observations for {} entities", inputs.len());
        self.mutate(|state| {
            let mut outcome = ObservationOutcome::default();
            for input in inputs {
                let Some(entity) = state.entities.get_mut(&input.entity_name) else {
                    debug!("Entity '{}' not found for observations", input.entity_name);
                    outcome.unknown_entities.push(input.entity_name);
                    continue;
                };
                let mut added = Vec::new();
                for obs in input.contents {
                    if !entity.observations.contains(&obs) {
                        entity.observations.push(obs.clone());
                        added.push(obs);
                    }
                }
                outcome.applied.push(ObservationReport {
                    entity_name: input.entity_name,
                    added_observations: added,
                });
            }
            outcome
        })
    }

    /// Remove named entities and cascade to every relation touching them.
    ///
    /// Absence of a name is a no-op for that item, never an error.
    ///
    /// # Returns
    ///
    /// The number of entities actually removed.
    pub fn delete_entities(&self, names: &[String]) -> Result<usize> {
        debug!("Deleting {} entities", names.len());
        let doomed: BTreeSet<&String> = names.iter().collect();
        self.mutate(|state| {
            let before = state.entities.len();
            state.entities.retain(|name, _| !doomed.contains(name));
            let removed = before - state.entities.len();

            let relations_before = state.relations.len();
            state
                .relations
                .retain(|rel| !doomed.contains(&rel.from) && !doomed.contains(&rel.to));
            trace!(
                "Removed {} entities, cascaded {} relations",
                removed,
                relations_before - state.relations.len()
            );
            removed
        })
    }

    /// Remove observation strings from named entities.
    ///
    /// Absence of the entity or of a given string is a no-op for that item.
    pub fn delete_observations(&self, deletions: &[ObservationDeletion]) -> Result<()> {
        debug!("Deleting observations for {} entities", deletions.len());
        self.mutate(|state| {
            for deletion in deletions {
                if let Some(entity) = state.entities.get_mut(&deletion.entity_name) {
                    entity
                        .observations
                        .retain(|obs| !deletion.observations.contains(obs));
                }
            }
        })
    }

    /// Remove matching relation triples.
    ///
    /// Absence of a triple is a no-op for that item.
    ///
    /// # Returns
    ///
    /// The number of relations actually removed.
    pub fn delete_relations(&self, relations: &[Relation]) -> Result<usize> {
        debug!("Deleting {} relations", relations.len());
        self.mutate(|state| {
            let before = state.relations.len();
            state.relations.retain(|rel| !relations.contains(rel));
            before - state.relations.len()
        })
    }

    /// Return an immutable snapshot of the full current graph.
    pub fn read_graph(&self) -> Result<Graph> {
        Ok(self.read_state()?.to_graph())
    }

    /// Drop all entities and relations and persist the empty graph.
    ///
    /// This is a destructive operation that cannot be undone.
    pub fn clear(&self) -> Result<()> {
        debug!("Clearing graph store");
        self.mutate(|state| *state = GraphState::default())
    }

    /// Total number of entities in the store.
    pub fn entity_count(&self) -> Result<usize> {
        Ok(self.read_state()?.entities.len())
    }

    /// Total number of relations in the store.
    pub fn relation_count(&self) -> Result<usize> {
        Ok(self.read_state()?.relations.len())
    }

    /// Case-insensitive substring search over entity names, type tags, and
    /// observation text.
    ///
    /// See [`query::search_nodes`] for the containment rule on relations.
    pub fn search_nodes(&self, needle: &str) -> Result<Graph> {
        let graph = self.read_graph()?;
        Ok(query::search_nodes(&graph, needle))
    }

    /// Retrieve exactly the entities with the requested names.
    ///
    /// Unknown names are ignored, not an error. See [`query::open_nodes`].
    pub fn open_nodes(&self, names: &[String]) -> Result<Graph> {
        let graph = self.read_graph()?;
        Ok(query::open_nodes(&graph, names))
    }

    /// All entities carrying the exact type tag.
    pub fn entities_by_type(&self, entity_type: &str) -> Result<Vec<Entity>> {
        let graph = self.read_graph()?;
        Ok(query::entities_by_type(&graph, entity_type))
    }

    /// Neighbors of the named entity, following relations in the given
    /// direction, optionally filtered by relation type.
    pub fn related_entities(
        &self,
        name: &str,
        relation_type: Option<&str>,
        direction: Direction,
    ) -> Result<Vec<Entity>> {
        let graph = self.read_graph()?;
        Ok(query::related_entities(&graph, name, relation_type, direction))
    }

    // Private helper methods

    /// One read-modify-write-persist unit under the exclusive lock.
    ///
    /// The batch is applied fully in memory before anything is persisted; a
    /// failed persist aborts the call and nothing is committed.
    fn mutate<T>(&self, apply: impl FnOnce(&mut GraphState) -> T) -> Result<T> {
        let mut backend = self.write_lock();
        let mut state = load_state(backend.as_ref())?;
        let output = apply(&mut state);
        let encoded = codec::encode_graph(&state)?;
        backend.store(&encoded)?;
        trace!(
            "Persisted snapshot: {} entities, {} relations",
            state.entities.len(),
            state.relations.len()
        );
        Ok(output)
    }

    fn read_state(&self) -> Result<GraphState> {
        let backend = self.read_lock();
        load_state(backend.as_ref())
    }

    // All state lives behind the backend; a panicking writer leaves nothing
    // partially applied in memory, so a poisoned lock can be recovered.
    fn write_lock(&self) -> RwLockWriteGuard<'_, Box<dyn SnapshotBackend>> {
        self.backend.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn read_lock(&self) -> RwLockReadGuard<'_, Box<dyn SnapshotBackend>> {
        self.backend.read().unwrap_or_else(PoisonError::into_inner)
    }
}

fn load_state(backend: &dyn SnapshotBackend) -> Result<GraphState> {
    Ok(match backend.load()? {
        Some(contents) => codec::decode_graph(&contents),
        None => GraphState::default(),
    })
}
