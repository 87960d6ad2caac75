//! Error types for `trellis-core`.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("node not found: {0}")]
  NodeNotFound(Uuid),

  #[error("edge not found: {0}")]
  EdgeNotFound(Uuid),

  #[error("node {0} is already deleted")]
  NodeAlreadyDeleted(Uuid),

  #[error("edge {0} is already deleted")]
  EdgeAlreadyDeleted(Uuid),

  /// Created/updated transitions are only accepted on a live node.
  #[error("node {0} is deleted")]
  NodeDeleted(Uuid),

  #[error("node {0} is not deleted")]
  NodeNotDeleted(Uuid),

  #[error("edge {0} is not deleted")]
  EdgeNotDeleted(Uuid),

  #[error("unknown instance type tag: {0}")]
  UnknownInstanceType(i64),

  #[error("unknown instance type name: {0:?}")]
  UnknownInstanceTypeName(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The class of integrity constraint a write violated.
///
/// Backends report engine constraint failures with one of these kinds and
/// otherwise pass them through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintKind {
  /// Duplicate primary key (or other unique column).
  Unique,
  /// A foreign key references a row that does not exist.
  ForeignKey,
  /// A required column was left NULL.
  NotNull,
  /// A CHECK constraint rejected the row.
  Check,
}

impl fmt::Display for ConstraintKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::Unique => "uniqueness",
      Self::ForeignKey => "referential",
      Self::NotNull => "not-null",
      Self::Check => "check",
    })
  }
}
