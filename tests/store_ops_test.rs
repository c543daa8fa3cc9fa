//! Integration tests for store operations (create, delete, query) through
//! the public API.

use factgraph::{Direction, Entity, GraphStore, ObservationInput, Relation};

#[test]
fn test_idempotent_create() {
    let store = GraphStore::in_memory();

    let first = store
        .create_entities(vec![Entity::new("Alice", "Expert")])
        .unwrap();
    assert_eq!(first.len(), 1);

    let second = store
        .create_entities(vec![Entity::new("Alice", "Expert")])
        .unwrap();
    assert!(second.is_empty(), "second create must add nothing");

    let graph = store.read_graph().unwrap();
    assert_eq!(graph.entities.len(), 1);
    assert_eq!(graph.entities[0].name, "Alice");
}

#[test]
fn test_cascade_delete() {
    let store = GraphStore::in_memory();
    store
        .create_entities(vec![
            Entity::new("Alice", "Expert"),
            Entity::new("review_1", "review"),
        ])
        .unwrap();
    store
        .create_relations(vec![Relation::new("review_1", "Alice", "authored")])
        .unwrap();

    let removed = store.delete_entities(&["Alice".to_string()]).unwrap();
    assert_eq!(removed, 1);

    let graph = store.read_graph().unwrap();
    assert_eq!(graph.entities.len(), 1);
    assert_eq!(graph.entities[0].name, "review_1");
    assert!(graph.relations.is_empty(), "touching relations must cascade");
}

#[test]
fn test_delete_absent_entity_is_noop() {
    let store = GraphStore::in_memory();
    store
        .create_entities(vec![Entity::new("Alice", "Expert")])
        .unwrap();

    let removed = store.delete_entities(&["nobody".to_string()]).unwrap();
    assert_eq!(removed, 0);
    assert_eq!(store.entity_count().unwrap(), 1);
}

#[test]
fn test_referential_rejection_leaves_graph_untouched() {
    let store = GraphStore::in_memory();
    store
        .create_entities(vec![Entity::new("Alice", "Expert")])
        .unwrap();

    let outcome = store
        .create_relations(vec![Relation::new("ghost", "Alice", "x")])
        .unwrap();

    assert!(outcome.added.is_empty());
    assert_eq!(outcome.rejected.len(), 1);
    assert_eq!(outcome.rejected[0].relation, Relation::new("ghost", "Alice", "x"));
    assert_eq!(outcome.rejected[0].missing_endpoints, vec!["ghost"]);

    let graph = store.read_graph().unwrap();
    assert_eq!(graph.entities.len(), 1);
    assert!(graph.relations.is_empty());
}

#[test]
fn test_rejected_relation_does_not_abort_siblings() {
    let store = GraphStore::in_memory();
    store
        .create_entities(vec![Entity::new("a", "t"), Entity::new("b", "t")])
        .unwrap();

    let outcome = store
        .create_relations(vec![
            Relation::new("ghost", "a", "x"),
            Relation::new("a", "b", "knows"),
        ])
        .unwrap();

    assert_eq!(outcome.added, vec![Relation::new("a", "b", "knows")]);
    assert_eq!(outcome.rejected.len(), 1);
}

#[test]
fn test_duplicate_relation_is_silent_noop() {
    let store = GraphStore::in_memory();
    store
        .create_entities(vec![Entity::new("a", "t"), Entity::new("b", "t")])
        .unwrap();
    store
        .create_relations(vec![Relation::new("a", "b", "knows")])
        .unwrap();

    let outcome = store
        .create_relations(vec![Relation::new("a", "b", "knows")])
        .unwrap();
    assert!(outcome.added.is_empty());
    assert!(outcome.rejected.is_empty(), "duplicate is not a rejection");
    assert_eq!(store.relation_count().unwrap(), 1);
}

#[test]
fn test_observation_dedup_and_order() {
    let store = GraphStore::in_memory();
    store
        .create_entities(vec![Entity::new("Alice", "Expert").with_observation("first")])
        .unwrap();

    let outcome = store
        .add_observations(vec![ObservationInput {
            entity_name: "Alice".into(),
            contents: vec!["second".into(), "first".into(), "third".into()],
        }])
        .unwrap();

    assert_eq!(outcome.applied[0].added_observations, vec!["second", "third"]);

    let graph = store.read_graph().unwrap();
    assert_eq!(graph.entities[0].observations, vec!["first", "second", "third"]);
}

#[test]
fn test_search_containment() {
    let store = GraphStore::in_memory();
    store
        .create_entities(vec![
            Entity::new("Alice", "Expert").with_observation("Author of Refactoring")
        ])
        .unwrap();

    for needle in ["refactor", "REFACTOR", "Refactor"] {
        let hits = store.search_nodes(needle).unwrap();
        assert_eq!(hits.entities.len(), 1, "needle {needle:?} should match");
        assert_eq!(hits.entities[0].name, "Alice");
    }
}

#[test]
fn test_open_nodes_edge_filtering() {
    let store = GraphStore::in_memory();
    store
        .create_entities(vec![
            Entity::new("A", "t"),
            Entity::new("B", "t"),
            Entity::new("C", "t"),
        ])
        .unwrap();
    store
        .create_relations(vec![
            Relation::new("A", "B", "linked"),
            Relation::new("B", "C", "linked"),
        ])
        .unwrap();

    let opened = store.open_nodes(&["A".to_string(), "B".to_string()]).unwrap();

    let names: Vec<&str> = opened.entities.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["A", "B"]);
    assert_eq!(opened.relations, vec![Relation::new("A", "B", "linked")]);
}

#[test]
fn test_entities_by_type_and_related_entities() {
    let store = GraphStore::in_memory();
    store
        .create_entities(vec![
            Entity::new("Alice", "Expert"),
            Entity::new("Bob", "Expert"),
            Entity::new("review_1", "review"),
        ])
        .unwrap();
    store
        .create_relations(vec![
            Relation::new("review_1", "Alice", "authored"),
            Relation::new("Alice", "Bob", "mentors"),
        ])
        .unwrap();

    let experts = store.entities_by_type("Expert").unwrap();
    assert_eq!(experts.len(), 2);

    let related = store
        .related_entities("Alice", None, Direction::Both)
        .unwrap();
    let names: Vec<&str> = related.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Bob", "review_1"]);

    let authored = store
        .related_entities("Alice", Some("authored"), Direction::Incoming)
        .unwrap();
    assert_eq!(authored.len(), 1);
    assert_eq!(authored[0].name, "review_1");
}
