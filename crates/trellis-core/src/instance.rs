//! Node instances — the append-only change log of a node.
//!
//! Each instance captures one state transition of a node together with an
//! opaque payload. Instances are never updated or deleted. Within a node
//! they are ordered by a store-assigned sequence number.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Transition tag ──────────────────────────────────────────────────────────

/// The transition an instance records. The integer tags are part of the
/// storage contract and must not be renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstanceType {
  Created  = 0,
  Updated  = 1,
  Deleted  = 2,
  Restored = 3,
}

impl InstanceType {
  pub const ALL: [InstanceType; 4] =
    [Self::Created, Self::Updated, Self::Deleted, Self::Restored];

  pub fn tag(self) -> i64 { self as i64 }

  pub fn from_tag(tag: i64) -> Result<Self> {
    match tag {
      0 => Ok(Self::Created),
      1 => Ok(Self::Updated),
      2 => Ok(Self::Deleted),
      3 => Ok(Self::Restored),
      other => Err(Error::UnknownInstanceType(other)),
    }
  }

  /// Check that a node in the given state may take this transition.
  ///
  /// `created`/`updated` and `deleted` need a live node; `restored` needs a
  /// deleted one.
  pub fn check_transition(self, node_id: Uuid, live: bool) -> Result<()> {
    match (self, live) {
      (Self::Created | Self::Updated, false) => Err(Error::NodeDeleted(node_id)),
      (Self::Deleted, false) => Err(Error::NodeAlreadyDeleted(node_id)),
      (Self::Restored, true) => Err(Error::NodeNotDeleted(node_id)),
      _ => Ok(()),
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Created => "created",
      Self::Updated => "updated",
      Self::Deleted => "deleted",
      Self::Restored => "restored",
    }
  }
}

impl fmt::Display for InstanceType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for InstanceType {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    Self::ALL
      .into_iter()
      .find(|t| t.as_str().eq_ignore_ascii_case(s))
      .ok_or_else(|| Error::UnknownInstanceTypeName(s.to_owned()))
  }
}

// ─── Records ─────────────────────────────────────────────────────────────────

/// A persisted change-log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeInstance {
  pub instance_id:   Uuid,
  pub node_id:       Uuid,
  /// 1-based position in the node's history; assigned by the store.
  pub seq:           i64,
  pub value:         serde_json::Value,
  pub instance_type: InstanceType,
  pub recorded_at:   DateTime<Utc>,
}

/// Input to [`GraphStore::record_instance`](crate::store::GraphStore::record_instance).
///
/// `instance_id` defaults to a fresh v4 UUID. `seq` and `recorded_at` are
/// always assigned by the store.
#[derive(Debug, Clone)]
pub struct NewInstance {
  pub instance_id:   Option<Uuid>,
  pub node_id:       Uuid,
  pub value:         serde_json::Value,
  pub instance_type: InstanceType,
}

impl NewInstance {
  pub fn new(
    node_id: Uuid,
    instance_type: InstanceType,
    value: serde_json::Value,
  ) -> Self {
    Self { instance_id: None, node_id, value, instance_type }
  }

  pub fn with_id(mut self, instance_id: Uuid) -> Self {
    self.instance_id = Some(instance_id);
    self
  }
}
