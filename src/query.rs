//! Read-only search and filter operations over a graph snapshot.
//!
//! Every function here is a pure function of an immutable [`Graph`]: the
//! store takes the shared side of its lock, copies out a snapshot, and hands
//! it to these. Matching is full-scan; there is no index.

use crate::graph::{Direction, Entity, Graph, Relation};
use std::collections::BTreeSet;

/// Case-insensitive substring search over names, type tags, and observations.
///
/// A relation is included only when BOTH endpoints are in the matched entity
/// set, so the result never contains an edge pointing at an entity the
/// caller did not receive.
pub fn search_nodes(graph: &Graph, needle: &str) -> Graph {
    let needle = needle.to_lowercase();
    let entities: Vec<Entity> = graph
        .entities
        .iter()
        .filter(|entity| entity_matches(entity, &needle))
        .cloned()
        .collect();

    let relations = contained_relations(graph, &entities);
    Graph { entities, relations }
}

/// Retrieve exactly the entities whose name is in the given set.
///
/// Names not found are ignored, not an error. Relations are included only
/// when both endpoints are in the returned entity set.
pub fn open_nodes(graph: &Graph, names: &[String]) -> Graph {
    let wanted: BTreeSet<&String> = names.iter().collect();
    let entities: Vec<Entity> = graph
        .entities
        .iter()
        .filter(|entity| wanted.contains(&entity.name))
        .cloned()
        .collect();

    let relations = contained_relations(graph, &entities);
    Graph { entities, relations }
}

/// All entities carrying the exact type tag.
pub fn entities_by_type(graph: &Graph, entity_type: &str) -> Vec<Entity> {
    graph
        .entities
        .iter()
        .filter(|entity| entity.entity_type == entity_type)
        .cloned()
        .collect()
}

/// Neighbors of the named entity, following relations in the given
/// direction, optionally filtered by relation type.
///
/// An unknown name yields an empty result. Each neighbor appears once even
/// when multiple relations connect it.
pub fn related_entities(
    graph: &Graph,
    name: &str,
    relation_type: Option<&str>,
    direction: Direction,
) -> Vec<Entity> {
    let mut neighbor_names = BTreeSet::new();

    for relation in &graph.relations {
        if let Some(tag) = relation_type {
            if relation.relation_type != tag {
                continue;
            }
        }
        let follow_out = matches!(direction, Direction::Outgoing | Direction::Both);
        let follow_in = matches!(direction, Direction::Incoming | Direction::Both);

        if follow_out && relation.from == name {
            neighbor_names.insert(relation.to.as_str());
        }
        if follow_in && relation.to == name {
            neighbor_names.insert(relation.from.as_str());
        }
    }

    graph
        .entities
        .iter()
        .filter(|entity| neighbor_names.contains(entity.name.as_str()))
        .cloned()
        .collect()
}

fn entity_matches(entity: &Entity, lowered_needle: &str) -> bool {
    entity.name.to_lowercase().contains(lowered_needle)
        || entity.entity_type.to_lowercase().contains(lowered_needle)
        || entity
            .observations
            .iter()
            .any(|obs| obs.to_lowercase().contains(lowered_needle))
}

/// Relations whose both endpoints are in the given entity set.
fn contained_relations(graph: &Graph, entities: &[Entity]) -> Vec<Relation> {
    let names: BTreeSet<&str> = entities.iter().map(|e| e.name.as_str()).collect();
    graph
        .relations
        .iter()
        .filter(|rel| names.contains(rel.from.as_str()) && names.contains(rel.to.as_str()))
        .cloned()
        .collect()
}
