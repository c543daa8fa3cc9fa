//! Core model types: entities, relations, and graph snapshots.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A named record with a type tag and a deduplicated list of free-text facts.
///
/// The `name` is the entity's globally unique key within a graph. Observations
/// keep their insertion order; duplicate strings are never stored twice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Unique name of the entity (serves as its key)
    pub name: String,
    /// Free-form type tag (e.g., "Expert", "review")
    #[serde(rename = "entityType")]
    pub entity_type: String,
    /// Free-text facts about the entity, insertion-ordered, no duplicates
    #[serde(default)]
    pub observations: Vec<String>,
}

impl Entity {
    /// Create an entity with no observations.
    pub fn new(name: impl Into<String>, entity_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entity_type: entity_type.into(),
            observations: Vec::new(),
        }
    }

    /// Builder pattern: append an observation and return self.
    pub fn with_observation(mut self, observation: impl Into<String>) -> Self {
        self.observations.push(observation.into());
        self
    }
}

/// A directed, typed edge between two entity names.
///
/// Identity is the whole triple: no two relations in a graph may share
/// `(from, to, relation_type)`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Relation {
    /// Source entity name
    pub from: String,
    /// Target entity name
    pub to: String,
    /// Free-form relationship tag (e.g., "authored", "reviewed_by")
    #[serde(rename = "relationType")]
    pub relation_type: String,
}

impl Relation {
    /// Create a relation triple.
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        relation_type: impl Into<String>,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            relation_type: relation_type.into(),
        }
    }

    /// Whether either endpoint equals the given entity name.
    pub fn touches(&self, name: &str) -> bool {
        self.from == name || self.to == name
    }
}

/// A complete copy-out snapshot of the store's current state.
///
/// Returned by every read operation. Never aliases the store's internal
/// structures; mutating a snapshot has no effect on the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    /// All entities, keyed by unique name
    pub entities: Vec<Entity>,
    /// All relations; every endpoint names an entity in `entities`
    pub relations: Vec<Relation>,
}

/// Direction for related-entity queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Follow outgoing relations (from this entity)
    Outgoing,
    /// Follow incoming relations (to this entity)
    Incoming,
    /// Follow relations in both directions
    Both,
}

/// Internal keyed representation the store and codec operate on.
///
/// Upholds the graph invariants structurally: entity names are map keys,
/// relations deduplicate on the full triple. Converted to [`Graph`] for
/// every value handed to a caller.
#[derive(Debug, Clone, Default)]
pub(crate) struct GraphState {
    pub(crate) entities: BTreeMap<String, Entity>,
    pub(crate) relations: Vec<Relation>,
}

impl GraphState {
    /// Insert an entity, overwriting any previous record under the same name.
    ///
    /// Observation duplicates in the incoming record are collapsed, first
    /// occurrence wins.
    pub(crate) fn upsert_entity(&mut self, entity: Entity) {
        let mut deduped = Entity::new(entity.name.clone(), entity.entity_type);
        for obs in entity.observations {
            if !deduped.observations.contains(&obs) {
                deduped.observations.push(obs);
            }
        }
        self.entities.insert(deduped.name.clone(), deduped);
    }

    /// Insert a relation if the identical triple is not already present.
    ///
    /// Returns `true` if the relation was added. Endpoint existence is the
    /// caller's responsibility.
    pub(crate) fn insert_relation(&mut self, relation: Relation) -> bool {
        if self.relations.contains(&relation) {
            return false;
        }
        self.relations.push(relation);
        true
    }

    /// Copy out an immutable snapshot.
    pub(crate) fn to_graph(&self) -> Graph {
        Graph {
            entities: self.entities.values().cloned().collect(),
            relations: self.relations.clone(),
        }
    }
}
