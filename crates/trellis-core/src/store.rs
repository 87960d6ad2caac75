//! The `GraphStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `trellis-store-sqlite`).
//! Callers depend on this abstraction, not on any concrete backend.

use std::future::Future;

use serde_json::Value;
use uuid::Uuid;

use crate::{
  graph::{Edge, EdgeVisibility, Node},
  instance::{NewInstance, NodeInstance},
};

/// Abstraction over a soft-delete graph store backend.
///
/// Nothing is ever physically removed. Soft deletes stamp `deleted_at` once
/// and never clear it; the instance log is append-only. Every node lifecycle
/// transition (create, update, delete, restore) appends one instance in the
/// same transaction as any row change it implies.
///
/// Backends must enforce referential integrity on every write: an edge whose
/// endpoint does not exist, or an instance whose node does not exist, is
/// rejected. Endpoints that exist but are soft-deleted are accepted.
pub trait GraphStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Nodes ─────────────────────────────────────────────────────────────

  /// Create a live node with a fresh UUID and record a `created` instance
  /// carrying `value`.
  fn create_node(
    &self,
    value: Value,
  ) -> impl Future<Output = Result<Node, Self::Error>> + Send + '_;

  /// Create a node with a caller-supplied UUID. Fails with a uniqueness
  /// violation if the id is taken.
  fn create_node_with_id(
    &self,
    id: Uuid,
    value: Value,
  ) -> impl Future<Output = Result<Node, Self::Error>> + Send + '_;

  /// Retrieve a node by id, live or not. Returns `None` if not found.
  fn get_node(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Node>, Self::Error>> + Send + '_;

  /// List nodes in creation order. Without `include_deleted` only live nodes
  /// (never deleted, or restored) are returned.
  fn list_nodes(
    &self,
    include_deleted: bool,
  ) -> impl Future<Output = Result<Vec<Node>, Self::Error>> + Send + '_;

  /// Record a new value for a live node as an `updated` instance.
  /// Refused with `NodeDeleted` when the node is not live.
  fn update_node(
    &self,
    id: Uuid,
    value: Value,
  ) -> impl Future<Output = Result<NodeInstance, Self::Error>> + Send + '_;

  /// Soft-delete a live node: stamp `deleted_at` if it was never set and
  /// record a `deleted` instance carrying the last value. Incident edges are
  /// left untouched.
  fn soft_delete_node(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Node, Self::Error>> + Send + '_;

  /// Soft-delete a live node and every live edge touching it, all with the
  /// same timestamp. Returns the node and the number of edges stamped.
  fn soft_delete_node_cascade(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(Node, usize), Self::Error>> + Send + '_;

  /// Bring a deleted node back by recording a `restored` instance carrying
  /// the last value. `deleted_at` is kept. Refused with `NodeNotDeleted`
  /// when the node is live.
  fn restore_node(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Node, Self::Error>> + Send + '_;

  /// Value of the node's newest instance; `None` when it has no history.
  fn current_value(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Value>, Self::Error>> + Send + '_;

  // ── Edges ─────────────────────────────────────────────────────────────

  /// Create a live edge `source -> target` with a fresh UUID.
  fn create_edge(
    &self,
    source: Uuid,
    target: Uuid,
  ) -> impl Future<Output = Result<Edge, Self::Error>> + Send + '_;

  /// Create an edge with a caller-supplied UUID.
  fn create_edge_with_id(
    &self,
    id: Uuid,
    source: Uuid,
    target: Uuid,
  ) -> impl Future<Output = Result<Edge, Self::Error>> + Send + '_;

  fn get_edge(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Edge>, Self::Error>> + Send + '_;

  /// Soft-delete a live edge. The first `deleted_at` stamp is kept.
  fn soft_delete_edge(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Edge, Self::Error>> + Send + '_;

  /// Bring a deleted edge back by stamping `restored_at`.
  fn restore_edge(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Edge, Self::Error>> + Send + '_;

  /// Edges whose `source` is `node`, in creation order.
  fn edges_from(
    &self,
    node: Uuid,
    visibility: EdgeVisibility,
  ) -> impl Future<Output = Result<Vec<Edge>, Self::Error>> + Send + '_;

  /// Edges whose `target` is `node`, in creation order.
  fn edges_to(
    &self,
    node: Uuid,
    visibility: EdgeVisibility,
  ) -> impl Future<Output = Result<Vec<Edge>, Self::Error>> + Send + '_;

  // ── Instance log — append-only ────────────────────────────────────────

  /// Append an instance to the node's history. The store assigns the
  /// sequence number and `recorded_at`.
  ///
  /// The instance type must be a valid transition from the node's state:
  /// `created`/`updated` need a live node (`NodeDeleted`), `deleted` a live
  /// node (`NodeAlreadyDeleted`) and `restored` a deleted one
  /// (`NodeNotDeleted`). A `deleted` instance stamps `deleted_at` like
  /// [`GraphStore::soft_delete_node`].
  fn record_instance(
    &self,
    input: NewInstance,
  ) -> impl Future<Output = Result<NodeInstance, Self::Error>> + Send + '_;

  /// The node's full history in sequence order. Empty if the node has no
  /// instances or does not exist.
  fn history(
    &self,
    node_id: Uuid,
  ) -> impl Future<Output = Result<Vec<NodeInstance>, Self::Error>> + Send + '_;
}
