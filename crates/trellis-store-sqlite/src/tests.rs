//! Integration tests for `SqliteStore` against an in-memory database.

use std::time::Duration;

use serde_json::json;
use trellis_core::{
  ConstraintKind,
  graph::{Edge, EdgeVisibility, Node},
  instance::{InstanceType, NewInstance},
  store::GraphStore,
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn add(s: &SqliteStore) -> Node { s.create_node(json!(null)).await.unwrap() }

fn edge_ids(edges: &[Edge]) -> Vec<Uuid> { edges.iter().map(|e| e.edge_id).collect() }

fn node_ids(nodes: &[Node]) -> Vec<Uuid> { nodes.iter().map(|n| n.node_id).collect() }

fn types(history: &[trellis_core::instance::NodeInstance]) -> Vec<InstanceType> {
  history.iter().map(|i| i.instance_type).collect()
}

// ─── Connection ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn foreign_keys_on_after_open() {
  let s = store().await;
  assert!(s.foreign_keys_enabled().await.unwrap());
}

#[tokio::test]
async fn busy_timeout_set_on_open() {
  let s = store().await;
  assert_eq!(s.busy_timeout().await.unwrap(), Duration::from_secs(5));
}

#[tokio::test]
async fn two_handles_on_one_file_can_both_write() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("graph.db");
  let a = SqliteStore::open(&path).await.unwrap();
  let b = SqliteStore::open(&path).await.unwrap();

  let (x, y) = tokio::join!(a.create_node(json!("a")), b.create_node(json!("b")));
  let (x, y) = (x.unwrap(), y.unwrap());

  let all = node_ids(&a.list_nodes(true).await.unwrap());
  assert!(all.contains(&x.node_id));
  assert!(all.contains(&y.node_id));
}

// ─── Nodes ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn new_node_is_live() {
  let s = store().await;

  let node = add(&s).await;
  assert!(node.deleted_at.is_none());

  let fetched = s.get_node(node.node_id).await.unwrap().unwrap();
  assert_eq!(fetched, node);
  assert!(fetched.is_live());
}

#[tokio::test]
async fn create_node_records_created_instance() {
  let s = store().await;
  let node = s.create_node(json!({ "name": "alpha" })).await.unwrap();
  assert_eq!(node.last_transition, Some(InstanceType::Created));

  let history = s.history(node.node_id).await.unwrap();
  assert_eq!(history.len(), 1);
  assert_eq!(history[0].seq, 1);
  assert_eq!(history[0].instance_type, InstanceType::Created);
  assert_eq!(history[0].value, json!({ "name": "alpha" }));
  assert_eq!(history[0].recorded_at, node.created_at);
}

#[tokio::test]
async fn get_node_missing_returns_none() {
  let s = store().await;
  assert!(s.get_node(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_node_id_is_unique_violation() {
  let s = store().await;
  let id = Uuid::new_v4();

  s.create_node_with_id(id, json!("first")).await.unwrap();
  let err = s.create_node_with_id(id, json!("second")).await.unwrap_err();
  assert_eq!(err.constraint(), Some(ConstraintKind::Unique));

  // Neither the row nor its history picked anything up.
  assert_eq!(s.list_nodes(true).await.unwrap().len(), 1);
  assert_eq!(s.current_value(id).await.unwrap(), Some(json!("first")));
  assert_eq!(s.history(id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn list_nodes_hides_deleted_unless_asked() {
  let s = store().await;
  let a = add(&s).await;
  let b = add(&s).await;
  let c = add(&s).await;
  s.soft_delete_node(b.node_id).await.unwrap();

  let live = s.list_nodes(false).await.unwrap();
  assert_eq!(node_ids(&live), vec![a.node_id, c.node_id]);

  let all = s.list_nodes(true).await.unwrap();
  assert_eq!(node_ids(&all), vec![a.node_id, b.node_id, c.node_id]);
}

#[tokio::test]
async fn update_node_appends_and_moves_current_value() {
  let s = store().await;
  let node = s.create_node(json!("v1")).await.unwrap();

  let updated = s.update_node(node.node_id, json!("v2")).await.unwrap();
  assert_eq!(updated.seq, 2);
  assert_eq!(updated.instance_type, InstanceType::Updated);

  assert_eq!(s.current_value(node.node_id).await.unwrap(), Some(json!("v2")));
  let history = s.history(node.node_id).await.unwrap();
  assert_eq!(history[0].value, json!("v1"));
  assert_eq!(history[1], updated);
}

#[tokio::test]
async fn current_value_of_missing_node_errors() {
  let s = store().await;
  let err = s.current_value(Uuid::new_v4()).await.unwrap_err();
  assert!(matches!(
    err,
    crate::Error::Core(trellis_core::Error::NodeNotFound(_))
  ));
}

// ─── Soft delete ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn soft_delete_keeps_the_row() {
  let s = store().await;
  let node = add(&s).await;

  let deleted = s.soft_delete_node(node.node_id).await.unwrap();
  assert!(deleted.deleted_at.is_some());
  assert!(!deleted.is_live());
  assert_eq!(deleted.created_at, node.created_at);

  let fetched = s.get_node(node.node_id).await.unwrap().unwrap();
  assert_eq!(fetched, deleted);
}

#[tokio::test]
async fn soft_delete_records_deleted_instance_with_last_value() {
  let s = store().await;
  let node = s.create_node(json!("v1")).await.unwrap();
  s.update_node(node.node_id, json!("v2")).await.unwrap();

  let deleted = s.soft_delete_node(node.node_id).await.unwrap();
  assert_eq!(deleted.last_transition, Some(InstanceType::Deleted));

  let history = s.history(node.node_id).await.unwrap();
  assert_eq!(
    types(&history),
    vec![InstanceType::Created, InstanceType::Updated, InstanceType::Deleted]
  );
  assert_eq!(history[2].value, json!("v2"));
  assert_eq!(Some(history[2].recorded_at), deleted.deleted_at);
}

#[tokio::test]
async fn second_soft_delete_errors_and_keeps_first_stamp() {
  let s = store().await;
  let node = add(&s).await;
  let first = s.soft_delete_node(node.node_id).await.unwrap();

  let err = s.soft_delete_node(node.node_id).await.unwrap_err();
  assert!(matches!(
    err,
    crate::Error::Core(trellis_core::Error::NodeAlreadyDeleted(id)) if id == node.node_id
  ));

  let fetched = s.get_node(node.node_id).await.unwrap().unwrap();
  assert_eq!(fetched.deleted_at, first.deleted_at);
  assert_eq!(s.history(node.node_id).await.unwrap().len(), 2);
}

#[tokio::test]
async fn soft_delete_missing_node_errors() {
  let s = store().await;
  let err = s.soft_delete_node(Uuid::new_v4()).await.unwrap_err();
  assert!(matches!(
    err,
    crate::Error::Core(trellis_core::Error::NodeNotFound(_))
  ));
}

#[tokio::test]
async fn soft_delete_node_leaves_edges() {
  let s = store().await;
  let n1 = add(&s).await;
  let n2 = add(&s).await;
  let e1 = s.create_edge(n1.node_id, n2.node_id).await.unwrap();

  s.soft_delete_node(n1.node_id).await.unwrap();

  let edge = s.get_edge(e1.edge_id).await.unwrap().unwrap();
  assert!(edge.is_live());
  assert_eq!(
    edge_ids(&s.edges_from(n1.node_id, EdgeVisibility::Live).await.unwrap()),
    vec![e1.edge_id]
  );
}

#[tokio::test]
async fn cascade_stamps_incident_edges_only() {
  let s = store().await;
  let a = add(&s).await;
  let b = add(&s).await;
  let c = add(&s).await;
  let ab = s.create_edge(a.node_id, b.node_id).await.unwrap();
  let cb = s.create_edge(c.node_id, b.node_id).await.unwrap();
  let ca = s.create_edge(c.node_id, a.node_id).await.unwrap();

  let (node, stamped) = s.soft_delete_node_cascade(b.node_id).await.unwrap();
  assert_eq!(stamped, 2);

  for id in [ab.edge_id, cb.edge_id] {
    let edge = s.get_edge(id).await.unwrap().unwrap();
    assert_eq!(edge.deleted_at, node.deleted_at);
  }
  assert!(s.get_edge(ca.edge_id).await.unwrap().unwrap().is_live());
  assert_eq!(node.last_transition, Some(InstanceType::Deleted));
}

#[tokio::test]
async fn cascade_keeps_earlier_edge_stamps() {
  let s = store().await;
  let a = add(&s).await;
  let b = add(&s).await;
  let e = s.create_edge(a.node_id, b.node_id).await.unwrap();
  let edge = s.soft_delete_edge(e.edge_id).await.unwrap();

  let (_, stamped) = s.soft_delete_node_cascade(a.node_id).await.unwrap();
  assert_eq!(stamped, 0);
  let fetched = s.get_edge(e.edge_id).await.unwrap().unwrap();
  assert_eq!(fetched.deleted_at, edge.deleted_at);
}

#[tokio::test]
async fn cascade_on_deleted_node_touches_nothing() {
  let s = store().await;
  let a = add(&s).await;
  let b = add(&s).await;
  let e = s.create_edge(a.node_id, b.node_id).await.unwrap();
  s.soft_delete_node(a.node_id).await.unwrap();

  let err = s.soft_delete_node_cascade(a.node_id).await.unwrap_err();
  assert!(matches!(
    err,
    crate::Error::Core(trellis_core::Error::NodeAlreadyDeleted(_))
  ));
  assert!(s.get_edge(e.edge_id).await.unwrap().unwrap().is_live());
}

// ─── Restore and refused transitions ─────────────────────────────────────────

#[tokio::test]
async fn restored_node_is_live_again_and_keeps_its_stamp() {
  let s = store().await;
  let node = s.create_node(json!("v1")).await.unwrap();
  let deleted = s.soft_delete_node(node.node_id).await.unwrap();
  assert!(node_ids(&s.list_nodes(false).await.unwrap()).is_empty());

  let restored = s.restore_node(node.node_id).await.unwrap();
  assert!(restored.is_live());
  assert_eq!(restored.deleted_at, deleted.deleted_at);
  assert_eq!(restored.last_transition, Some(InstanceType::Restored));

  assert_eq!(node_ids(&s.list_nodes(false).await.unwrap()), vec![node.node_id]);
  assert_eq!(s.get_node(node.node_id).await.unwrap(), Some(restored));

  let history = s.history(node.node_id).await.unwrap();
  assert_eq!(
    types(&history),
    vec![InstanceType::Created, InstanceType::Deleted, InstanceType::Restored]
  );
  assert_eq!(history[2].value, json!("v1"));
}

#[tokio::test]
async fn restored_node_accepts_updates_and_can_be_deleted_again() {
  let s = store().await;
  let node = add(&s).await;
  let first = s.soft_delete_node(node.node_id).await.unwrap();
  s.restore_node(node.node_id).await.unwrap();

  s.update_node(node.node_id, json!("after")).await.unwrap();

  let again = s.soft_delete_node(node.node_id).await.unwrap();
  assert!(!again.is_live());
  assert_eq!(again.deleted_at, first.deleted_at);
  assert!(s.list_nodes(false).await.unwrap().is_empty());
  assert_eq!(s.current_value(node.node_id).await.unwrap(), Some(json!("after")));
}

#[tokio::test]
async fn update_on_deleted_node_is_refused() {
  let s = store().await;
  let node = s.create_node(json!("v1")).await.unwrap();
  s.soft_delete_node(node.node_id).await.unwrap();

  let err = s.update_node(node.node_id, json!("v2")).await.unwrap_err();
  assert!(matches!(
    err,
    crate::Error::Core(trellis_core::Error::NodeDeleted(id)) if id == node.node_id
  ));

  let err = s
    .record_instance(NewInstance::new(node.node_id, InstanceType::Updated, json!("v2")))
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    crate::Error::Core(trellis_core::Error::NodeDeleted(_))
  ));

  // Nothing was appended by either attempt.
  assert_eq!(s.history(node.node_id).await.unwrap().len(), 2);
}

#[tokio::test]
async fn restore_on_live_node_is_refused() {
  let s = store().await;
  let node = add(&s).await;

  let err = s.restore_node(node.node_id).await.unwrap_err();
  assert!(matches!(
    err,
    crate::Error::Core(trellis_core::Error::NodeNotDeleted(id)) if id == node.node_id
  ));

  let err = s
    .record_instance(NewInstance::new(node.node_id, InstanceType::Restored, json!(null)))
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    crate::Error::Core(trellis_core::Error::NodeNotDeleted(_))
  ));

  assert_eq!(types(&s.history(node.node_id).await.unwrap()), vec![InstanceType::Created]);
}

#[tokio::test]
async fn restore_missing_node_errors() {
  let s = store().await;
  let err = s.restore_node(Uuid::new_v4()).await.unwrap_err();
  assert!(matches!(
    err,
    crate::Error::Core(trellis_core::Error::NodeNotFound(_))
  ));
}

// ─── Edges ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn adjacency_in_both_directions() {
  let s = store().await;
  let n1 = add(&s).await;
  let n2 = add(&s).await;
  let e1 = s.create_edge(n1.node_id, n2.node_id).await.unwrap();

  let live = EdgeVisibility::Live;
  assert_eq!(edge_ids(&s.edges_from(n1.node_id, live).await.unwrap()), vec![e1.edge_id]);
  assert_eq!(edge_ids(&s.edges_to(n2.node_id, live).await.unwrap()), vec![e1.edge_id]);
  assert!(s.edges_from(n2.node_id, live).await.unwrap().is_empty());
  assert!(s.edges_to(n1.node_id, live).await.unwrap().is_empty());
}

#[tokio::test]
async fn self_loop_appears_on_both_sides() {
  let s = store().await;
  let n = add(&s).await;
  let e = s.create_edge(n.node_id, n.node_id).await.unwrap();

  let live = EdgeVisibility::Live;
  assert_eq!(edge_ids(&s.edges_from(n.node_id, live).await.unwrap()), vec![e.edge_id]);
  assert_eq!(edge_ids(&s.edges_to(n.node_id, live).await.unwrap()), vec![e.edge_id]);
}

#[tokio::test]
async fn edge_with_missing_source_is_referential_violation() {
  let s = store().await;
  let target = add(&s).await;

  let err = s
    .create_edge(Uuid::new_v4(), target.node_id)
    .await
    .unwrap_err();
  assert_eq!(err.constraint(), Some(ConstraintKind::ForeignKey));
  assert!(s.edges_to(target.node_id, EdgeVisibility::All).await.unwrap().is_empty());
}

#[tokio::test]
async fn edge_with_missing_target_is_referential_violation() {
  let s = store().await;
  let source = add(&s).await;

  let err = s
    .create_edge(source.node_id, Uuid::new_v4())
    .await
    .unwrap_err();
  assert_eq!(err.constraint(), Some(ConstraintKind::ForeignKey));
}

#[tokio::test]
async fn duplicate_edge_id_is_unique_violation() {
  let s = store().await;
  let a = add(&s).await;
  let b = add(&s).await;
  let id = Uuid::new_v4();

  s.create_edge_with_id(id, a.node_id, b.node_id).await.unwrap();
  let err = s
    .create_edge_with_id(id, b.node_id, a.node_id)
    .await
    .unwrap_err();
  assert_eq!(err.constraint(), Some(ConstraintKind::Unique));
}

#[tokio::test]
async fn edges_may_join_deleted_nodes() {
  let s = store().await;
  let a = add(&s).await;
  let b = add(&s).await;
  s.soft_delete_node(a.node_id).await.unwrap();

  let e = s.create_edge(a.node_id, b.node_id).await.unwrap();
  assert!(e.is_live());
}

#[tokio::test]
async fn deleted_edges_hidden_from_adjacency_by_default() {
  let s = store().await;
  let a = add(&s).await;
  let b = add(&s).await;
  let kept = s.create_edge(a.node_id, b.node_id).await.unwrap();
  let gone = s.create_edge(a.node_id, b.node_id).await.unwrap();
  s.soft_delete_edge(gone.edge_id).await.unwrap();

  assert_eq!(
    edge_ids(&s.edges_from(a.node_id, EdgeVisibility::default()).await.unwrap()),
    vec![kept.edge_id]
  );
  assert_eq!(
    edge_ids(&s.edges_to(b.node_id, EdgeVisibility::All).await.unwrap()),
    vec![kept.edge_id, gone.edge_id]
  );
}

#[tokio::test]
async fn live_endpoints_hides_edges_to_deleted_nodes() {
  let s = store().await;
  let a = add(&s).await;
  let b = add(&s).await;
  let c = add(&s).await;
  let ab = s.create_edge(a.node_id, b.node_id).await.unwrap();
  let ac = s.create_edge(a.node_id, c.node_id).await.unwrap();
  s.soft_delete_node(c.node_id).await.unwrap();

  // Row-level liveness still reports both edges.
  assert_eq!(
    edge_ids(&s.edges_from(a.node_id, EdgeVisibility::Live).await.unwrap()),
    vec![ab.edge_id, ac.edge_id]
  );
  assert_eq!(
    edge_ids(&s.edges_from(a.node_id, EdgeVisibility::LiveEndpoints).await.unwrap()),
    vec![ab.edge_id]
  );
  assert!(s.edges_to(c.node_id, EdgeVisibility::LiveEndpoints).await.unwrap().is_empty());

  // A restored endpoint counts as live again.
  s.restore_node(c.node_id).await.unwrap();
  assert_eq!(
    edge_ids(&s.edges_from(a.node_id, EdgeVisibility::LiveEndpoints).await.unwrap()),
    vec![ab.edge_id, ac.edge_id]
  );
}

#[tokio::test]
async fn soft_delete_edge_twice_errors() {
  let s = store().await;
  let a = add(&s).await;
  let b = add(&s).await;
  let e = s.create_edge(a.node_id, b.node_id).await.unwrap();
  s.soft_delete_edge(e.edge_id).await.unwrap();

  let err = s.soft_delete_edge(e.edge_id).await.unwrap_err();
  assert!(matches!(
    err,
    crate::Error::Core(trellis_core::Error::EdgeAlreadyDeleted(_))
  ));

  let err = s.soft_delete_edge(Uuid::new_v4()).await.unwrap_err();
  assert!(matches!(
    err,
    crate::Error::Core(trellis_core::Error::EdgeNotFound(_))
  ));
}

#[tokio::test]
async fn restored_edge_is_live_and_keeps_its_stamp() {
  let s = store().await;
  let a = add(&s).await;
  let b = add(&s).await;
  let e = s.create_edge(a.node_id, b.node_id).await.unwrap();
  let deleted = s.soft_delete_edge(e.edge_id).await.unwrap();

  let restored = s.restore_edge(e.edge_id).await.unwrap();
  assert!(restored.is_live());
  assert!(restored.restored_at.is_some());
  assert_eq!(restored.deleted_at, deleted.deleted_at);
  assert_eq!(
    edge_ids(&s.edges_from(a.node_id, EdgeVisibility::Live).await.unwrap()),
    vec![e.edge_id]
  );

  // Deleting again drops the restore and keeps the first stamp.
  let again = s.soft_delete_edge(e.edge_id).await.unwrap();
  assert!(!again.is_live());
  assert!(again.restored_at.is_none());
  assert_eq!(again.deleted_at, deleted.deleted_at);
}

#[tokio::test]
async fn restore_live_edge_is_refused() {
  let s = store().await;
  let a = add(&s).await;
  let b = add(&s).await;
  let e = s.create_edge(a.node_id, b.node_id).await.unwrap();

  let err = s.restore_edge(e.edge_id).await.unwrap_err();
  assert!(matches!(
    err,
    crate::Error::Core(trellis_core::Error::EdgeNotDeleted(id)) if id == e.edge_id
  ));

  let err = s.restore_edge(Uuid::new_v4()).await.unwrap_err();
  assert!(matches!(
    err,
    crate::Error::Core(trellis_core::Error::EdgeNotFound(_))
  ));
}

// ─── Instance log ────────────────────────────────────────────────────────────

#[tokio::test]
async fn instances_append_without_overwriting() {
  let s = store().await;
  let n1 = s.create_node(json!("v1")).await.unwrap();
  let i2 = Uuid::new_v4();

  s.record_instance(
    NewInstance::new(n1.node_id, InstanceType::Updated, json!("v2")).with_id(i2),
  )
  .await
  .unwrap();

  let history = s.history(n1.node_id).await.unwrap();
  assert_eq!(history.len(), 2);

  assert_eq!(history[0].seq, 1);
  assert_eq!(history[0].value, json!("v1"));
  assert_eq!(history[0].instance_type, InstanceType::Created);

  assert_eq!(history[1].instance_id, i2);
  assert_eq!(history[1].seq, 2);
  assert_eq!(history[1].value, json!("v2"));
  assert_eq!(history[1].instance_type, InstanceType::Updated);
}

#[tokio::test]
async fn sequence_is_per_node() {
  let s = store().await;
  let a = add(&s).await;
  let b = add(&s).await;

  let a2 = s
    .record_instance(NewInstance::new(a.node_id, InstanceType::Updated, json!(1)))
    .await
    .unwrap();
  let b2 = s
    .record_instance(NewInstance::new(b.node_id, InstanceType::Updated, json!(1)))
    .await
    .unwrap();
  let a3 = s
    .record_instance(NewInstance::new(a.node_id, InstanceType::Deleted, json!(null)))
    .await
    .unwrap();
  let a4 = s
    .record_instance(NewInstance::new(a.node_id, InstanceType::Restored, json!(1)))
    .await
    .unwrap();

  assert_eq!((a2.seq, a3.seq, a4.seq), (2, 3, 4));
  assert_eq!(b2.seq, 2);
}

#[tokio::test]
async fn recorded_deleted_instance_stamps_the_node() {
  let s = store().await;
  let n = add(&s).await;

  let recorded = s
    .record_instance(NewInstance::new(n.node_id, InstanceType::Deleted, json!("gone")))
    .await
    .unwrap();

  let fetched = s.get_node(n.node_id).await.unwrap().unwrap();
  assert_eq!(fetched.deleted_at, Some(recorded.recorded_at));
  assert!(!fetched.is_live());
}

#[tokio::test]
async fn recorded_instance_matches_stored_row() {
  let s = store().await;
  let n = add(&s).await;

  let payload = json!({ "name": "alpha", "tags": ["x", "y"], "weight": 2.5 });
  let recorded = s
    .record_instance(NewInstance::new(n.node_id, InstanceType::Updated, payload))
    .await
    .unwrap();

  let history = s.history(n.node_id).await.unwrap();
  assert_eq!(history.last(), Some(&recorded));
}

#[tokio::test]
async fn instance_for_missing_node_is_referential_violation() {
  let s = store().await;
  let ghost = Uuid::new_v4();

  let err = s
    .record_instance(NewInstance::new(ghost, InstanceType::Created, json!("v1")))
    .await
    .unwrap_err();
  assert_eq!(err.constraint(), Some(ConstraintKind::ForeignKey));
  assert!(s.history(ghost).await.unwrap().is_empty());
}

#[tokio::test]
async fn duplicate_instance_id_is_unique_violation() {
  let s = store().await;
  let n = add(&s).await;
  let id = Uuid::new_v4();

  s.record_instance(NewInstance::new(n.node_id, InstanceType::Updated, json!("v1")).with_id(id))
    .await
    .unwrap();
  let err = s
    .record_instance(NewInstance::new(n.node_id, InstanceType::Updated, json!("v2")).with_id(id))
    .await
    .unwrap_err();
  assert_eq!(err.constraint(), Some(ConstraintKind::Unique));

  // The failed append did not consume a sequence number.
  let next = s
    .record_instance(NewInstance::new(n.node_id, InstanceType::Updated, json!("v2")))
    .await
    .unwrap();
  assert_eq!(next.seq, 3);
}

// ─── Persistence ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn reopening_a_file_store_keeps_data() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("graph.db");

  let (a, e) = {
    let s = SqliteStore::open(&path).await.unwrap();
    let a = add(&s).await;
    let b = add(&s).await;
    let e = s.create_edge(a.node_id, b.node_id).await.unwrap();
    (a, e)
  };

  let s = SqliteStore::open(&path).await.unwrap();
  assert!(s.foreign_keys_enabled().await.unwrap());
  assert_eq!(s.get_node(a.node_id).await.unwrap(), Some(a.clone()));
  assert_eq!(
    edge_ids(&s.edges_from(a.node_id, EdgeVisibility::Live).await.unwrap()),
    vec![e.edge_id]
  );
}
