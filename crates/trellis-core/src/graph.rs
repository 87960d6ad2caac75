//! Nodes and edges — the vertices and directed relationships of the graph.
//!
//! Neither is ever physically removed, and `deleted_at` is never cleared once
//! set. A node comes back through a `restored` entry in its instance log; an
//! edge, which has no log, through `restored_at`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::instance::InstanceType;

/// A graph vertex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
  pub node_id:         Uuid,
  pub created_at:      DateTime<Utc>,
  /// First time the node was deleted.
  pub deleted_at:      Option<DateTime<Utc>>,
  /// Type of the newest instance in the node's history, if any.
  pub last_transition: Option<InstanceType>,
}

impl Node {
  /// Live when never deleted, or when the newest transition is a restore.
  pub fn is_live(&self) -> bool {
    self.deleted_at.is_none() || self.last_transition == Some(InstanceType::Restored)
  }
}

/// A directed relationship from `source` to `target`.
///
/// Either endpoint may itself be soft-deleted; whether such edges are
/// acceptable is left to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
  pub edge_id:     Uuid,
  pub source:      Uuid,
  pub target:      Uuid,
  pub created_at:  DateTime<Utc>,
  /// First time the edge was deleted.
  pub deleted_at:  Option<DateTime<Utc>>,
  /// Set while the edge is restored; cleared when it is deleted again.
  pub restored_at: Option<DateTime<Utc>>,
}

impl Edge {
  pub fn is_live(&self) -> bool { self.deleted_at.is_none() || self.restored_at.is_some() }
}

/// Which side of an edge an adjacency lookup matches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
  /// Edges whose `source` is the node.
  Outgoing,
  /// Edges whose `target` is the node.
  Incoming,
}

/// Which edges an adjacency lookup returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeVisibility {
  /// Every edge row, deleted or not.
  All,
  /// Edges that are live themselves; endpoints are not consulted.
  #[default]
  Live,
  /// Live edges whose source and target are both live nodes.
  LiveEndpoints,
}
