//! Line-oriented record codec for the persisted graph.
//!
//! The persisted representation is a sequence of self-describing records,
//! one JSON object per line, each tagged as either an entity or a relation:
//!
//! ```text
//! {"type":"entity","name":"Alice","entityType":"Expert","observations":["..."]}
//! {"type":"relation","from":"review_1","to":"Alice","relationType":"authored"}
//! ```
//!
//! Decoding is lenient: a malformed line is skipped with a log notice and the
//! load continues. Encoding always serializes the entire graph; atomic
//! replacement of the previous file is the storage backend's job.

use crate::error::{Result, StoreError};
use crate::graph::{Entity, GraphState, Relation};
use log::warn;
use serde::{Deserialize, Serialize};

/// One persisted line: an entity or a relation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Record {
    /// Entity record carrying name, type tag, and observations
    Entity(Entity),
    /// Relation record carrying the `(from, to, relationType)` triple
    Relation(Relation),
}

/// Serialize the full graph into the line-oriented record format.
///
/// Entity records come first, then relation records, one per line with a
/// trailing newline. Output is deterministic: entities in name order.
///
/// # Errors
///
/// Returns [`StoreError::Serialization`] if a record cannot be encoded.
pub(crate) fn encode_graph(state: &GraphState) -> Result<String> {
    let mut out = String::new();

    for entity in state.entities.values() {
        let line = serde_json::to_string(&Record::Entity(entity.clone()))
            .map_err(|e| StoreError::serialization("Failed to encode entity record", Some(e)))?;
        out.push_str(&line);
        out.push('\n');
    }

    for relation in &state.relations {
        let line = serde_json::to_string(&Record::Relation(relation.clone()))
            .map_err(|e| StoreError::serialization("Failed to encode relation record", Some(e)))?;
        out.push_str(&line);
        out.push('\n');
    }

    Ok(out)
}

/// Replay persisted records into the keyed collections.
///
/// Deterministic conflict handling: a later entity record for an existing
/// name overwrites the earlier one; a repeated relation triple is ignored.
/// Malformed lines and relations whose endpoints never appear are dropped
/// with a non-fatal log notice, so a partially damaged file still loads the
/// remaining valid records.
pub(crate) fn decode_graph(contents: &str) -> GraphState {
    let mut state = GraphState::default();
    let mut pending_relations: Vec<Relation> = Vec::new();

    for (index, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<Record>(line) {
            Ok(Record::Entity(entity)) => {
                if state.entities.contains_key(&entity.name) {
                    warn!(
                        "Duplicate entity record for '{}' on line {}; later record wins",
                        entity.name,
                        index + 1
                    );
                }
                state.upsert_entity(entity);
            }
            Ok(Record::Relation(relation)) => pending_relations.push(relation),
            Err(err) => {
                warn!("Skipping corrupt record on line {}: {}", index + 1, err);
            }
        }
    }

    // Endpoint check after the full replay: entity records may legitimately
    // appear after relations that reference them.
    for relation in pending_relations {
        if !state.entities.contains_key(&relation.from) || !state.entities.contains_key(&relation.to)
        {
            warn!(
                "Dropping relation {} -> {} ({}): endpoint missing from store",
                relation.from, relation.to, relation.relation_type
            );
            continue;
        }
        state.insert_relation(relation);
    }

    state
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_state() -> GraphState {
        let mut state = GraphState::default();
        state.upsert_entity(Entity::new("Alice", "Expert").with_observation("Author of Refactoring"));
        state.upsert_entity(Entity::new("review_1", "review"));
        state.insert_relation(Relation::new("review_1", "Alice", "authored"));
        state
    }

    #[test]
    fn test_round_trip() {
        let state = sample_state();
        let encoded = encode_graph(&state).unwrap();
        let decoded = decode_graph(&encoded);

        assert_eq!(decoded.entities, state.entities);
        assert_eq!(decoded.relations, state.relations);
    }

    #[test]
    fn test_encoded_lines_are_tagged() {
        let encoded = encode_graph(&sample_state()).unwrap();
        let lines: Vec<&str> = encoded.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("\"type\":\"entity\""));
        assert!(lines[2].contains("\"type\":\"relation\""));
    }

    #[test]
    fn test_corrupt_line_is_skipped() {
        let contents = concat!(
            "{\"type\":\"entity\",\"name\":\"Alice\",\"entityType\":\"Expert\",\"observations\":[]}\n",
            "not json at all\n",
            "{\"type\":\"entity\",\"name\":\"Bob\",\"entityType\":\"Expert\",\"observations\":[]}\n",
        );
        let state = decode_graph(contents);
        assert_eq!(state.entities.len(), 2);
        assert!(state.entities.contains_key("Alice"));
        assert!(state.entities.contains_key("Bob"));
    }

    #[test]
    fn test_later_entity_record_wins() {
        let contents = concat!(
            "{\"type\":\"entity\",\"name\":\"Alice\",\"entityType\":\"Novice\",\"observations\":[]}\n",
            "{\"type\":\"entity\",\"name\":\"Alice\",\"entityType\":\"Expert\",\"observations\":[\"fact\"]}\n",
        );
        let state = decode_graph(contents);
        assert_eq!(state.entities.len(), 1);
        let alice = &state.entities["Alice"];
        assert_eq!(alice.entity_type, "Expert");
        assert_eq!(alice.observations, vec!["fact"]);
    }

    #[test]
    fn test_dangling_relation_is_dropped() {
        let contents = concat!(
            "{\"type\":\"entity\",\"name\":\"Alice\",\"entityType\":\"Expert\",\"observations\":[]}\n",
            "{\"type\":\"relation\",\"from\":\"ghost\",\"to\":\"Alice\",\"relationType\":\"haunts\"}\n",
        );
        let state = decode_graph(contents);
        assert_eq!(state.entities.len(), 1);
        assert!(state.relations.is_empty());
    }

    #[test]
    fn test_relation_before_entity_records_survives() {
        let contents = concat!(
            "{\"type\":\"relation\",\"from\":\"a\",\"to\":\"b\",\"relationType\":\"knows\"}\n",
            "{\"type\":\"entity\",\"name\":\"a\",\"entityType\":\"person\",\"observations\":[]}\n",
            "{\"type\":\"entity\",\"name\":\"b\",\"entityType\":\"person\",\"observations\":[]}\n",
        );
        let state = decode_graph(contents);
        assert_eq!(state.relations.len(), 1);
    }

    #[test]
    fn test_empty_input_decodes_to_empty_graph() {
        let state = decode_graph("");
        assert!(state.entities.is_empty());
        assert!(state.relations.is_empty());
    }
}
