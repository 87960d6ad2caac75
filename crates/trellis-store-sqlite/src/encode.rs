//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings in UTC with fixed microsecond
//! precision, so lexical order equals chronological order. UUIDs are stored
//! as hyphenated lowercase strings. Instance payloads are compact JSON.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use rusqlite::Row;
use trellis_core::{
  graph::{Edge, Node},
  instance::{InstanceType, NodeInstance},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

/// The current time truncated to the precision the store keeps, so a value
/// handed back to the caller equals the one read back later.
pub fn now() -> DateTime<Utc> { Utc::now().trunc_subsecs(6) }

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

fn decode_opt_dt(s: Option<&str>) -> Result<Option<DateTime<Utc>>> {
  s.map(decode_dt).transpose()
}

// ─── Payload ──────────────────────────────────────────────────────────────────

pub fn encode_value(v: &serde_json::Value) -> Result<String> {
  Ok(serde_json::to_string(v)?)
}

pub fn decode_value(s: &str) -> Result<serde_json::Value> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Type tag of the newest instance of the node aliased `$alias`.
macro_rules! last_transition {
  ($alias:literal) => {
    concat!(
      "(SELECT i.instance_type FROM node_instance i WHERE i.node_id = ",
      $alias,
      ".node_id ORDER BY i.seq DESC LIMIT 1)"
    )
  };
}

/// Selects the columns [`RawNode::from_row`] reads, from `node n`.
pub const NODE_SELECT: &str = concat!(
  "SELECT n.node_id, n.created_at, n.deleted_at, ",
  last_transition!("n"),
  " FROM node n"
);

/// Node `n` is live: never deleted, or its newest instance is `restored` (3).
pub const NODE_N_LIVE: &str =
  concat!("(n.deleted_at IS NULL OR ", last_transition!("n"), " = 3)");

/// Liveness of the source (`s`) and target (`t`) nodes of an edge.
pub const ENDPOINTS_LIVE: &str = concat!(
  "(s.deleted_at IS NULL OR ",
  last_transition!("s"),
  " = 3) AND (t.deleted_at IS NULL OR ",
  last_transition!("t"),
  " = 3)"
);

/// Raw values read for a node: the `node` row plus its newest instance tag.
pub struct RawNode {
  pub node_id:         String,
  pub created_at:      String,
  pub deleted_at:      Option<String>,
  pub last_transition: Option<i64>,
}

impl RawNode {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      node_id:         row.get(0)?,
      created_at:      row.get(1)?,
      deleted_at:      row.get(2)?,
      last_transition: row.get(3)?,
    })
  }

  /// Same rule as [`Node::is_live`], on the undecoded row.
  pub fn is_live(&self) -> bool {
    self.deleted_at.is_none() || self.last_transition == Some(InstanceType::Restored.tag())
  }

  pub fn into_node(self) -> Result<Node> {
    Ok(Node {
      node_id:         decode_uuid(&self.node_id)?,
      created_at:      decode_dt(&self.created_at)?,
      deleted_at:      decode_opt_dt(self.deleted_at.as_deref())?,
      last_transition: self.last_transition.map(InstanceType::from_tag).transpose()?,
    })
  }
}

/// Column list matching [`RawEdge::from_row`], for `edge e`.
pub const EDGE_COLUMNS: &str =
  "e.edge_id, e.source, e.target, e.created_at, e.deleted_at, e.restored_at";

/// Edge `e` is live: never deleted, or restored since.
pub const EDGE_E_LIVE: &str = "(e.deleted_at IS NULL OR e.restored_at IS NOT NULL)";

/// Raw strings read directly from an `edge` row.
pub struct RawEdge {
  pub edge_id:     String,
  pub source:      String,
  pub target:      String,
  pub created_at:  String,
  pub deleted_at:  Option<String>,
  pub restored_at: Option<String>,
}

impl RawEdge {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      edge_id:     row.get(0)?,
      source:      row.get(1)?,
      target:      row.get(2)?,
      created_at:  row.get(3)?,
      deleted_at:  row.get(4)?,
      restored_at: row.get(5)?,
    })
  }

  pub fn into_edge(self) -> Result<Edge> {
    Ok(Edge {
      edge_id:     decode_uuid(&self.edge_id)?,
      source:      decode_uuid(&self.source)?,
      target:      decode_uuid(&self.target)?,
      created_at:  decode_dt(&self.created_at)?,
      deleted_at:  decode_opt_dt(self.deleted_at.as_deref())?,
      restored_at: decode_opt_dt(self.restored_at.as_deref())?,
    })
  }
}

/// Column list matching [`RawInstance::from_row`].
pub const INSTANCE_COLUMNS: &str =
  "instance_id, node_id, seq, value, instance_type, recorded_at";

/// Raw values read directly from a `node_instance` row.
pub struct RawInstance {
  pub instance_id:   String,
  pub node_id:       String,
  pub seq:           i64,
  pub value:         String,
  pub instance_type: i64,
  pub recorded_at:   String,
}

impl RawInstance {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      instance_id:   row.get(0)?,
      node_id:       row.get(1)?,
      seq:           row.get(2)?,
      value:         row.get(3)?,
      instance_type: row.get(4)?,
      recorded_at:   row.get(5)?,
    })
  }

  pub fn into_instance(self) -> Result<NodeInstance> {
    Ok(NodeInstance {
      instance_id:   decode_uuid(&self.instance_id)?,
      node_id:       decode_uuid(&self.node_id)?,
      seq:           self.seq,
      value:         decode_value(&self.value)?,
      instance_type: InstanceType::from_tag(self.instance_type)?,
      recorded_at:   decode_dt(&self.recorded_at)?,
    })
  }
}
