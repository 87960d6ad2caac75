//! Error type for `trellis-store-sqlite`.

use rusqlite::{ErrorCode, ffi};
use thiserror::Error;
use trellis_core::ConstraintKind;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] trellis_core::Error),

  /// The engine rejected a write. The engine's own message is kept verbatim.
  #[error("{kind} violation: {message}")]
  Constraint {
    kind:    ConstraintKind,
    message: String,
  },

  #[error("database error: {0}")]
  Database(tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
  /// The violated constraint, if this error is a constraint failure.
  pub fn constraint(&self) -> Option<ConstraintKind> {
    match self {
      Self::Constraint { kind, .. } => Some(*kind),
      _ => None,
    }
  }
}

impl From<tokio_rusqlite::Error> for Error {
  fn from(err: tokio_rusqlite::Error) -> Self {
    if let tokio_rusqlite::Error::Rusqlite(inner) = &err
      && let Some(kind) = constraint_kind(inner)
    {
      return Self::Constraint { kind, message: inner.to_string() };
    }
    Self::Database(err)
  }
}

/// Classify a SQLite constraint failure by its extended result code.
/// Returns `None` for anything that is not a recognised constraint failure.
pub(crate) fn constraint_kind(err: &rusqlite::Error) -> Option<ConstraintKind> {
  let rusqlite::Error::SqliteFailure(e, _) = err else {
    return None;
  };
  if e.code != ErrorCode::ConstraintViolation {
    return None;
  }
  match e.extended_code {
    ffi::SQLITE_CONSTRAINT_PRIMARYKEY | ffi::SQLITE_CONSTRAINT_UNIQUE => {
      Some(ConstraintKind::Unique)
    }
    ffi::SQLITE_CONSTRAINT_FOREIGNKEY => Some(ConstraintKind::ForeignKey),
    ffi::SQLITE_CONSTRAINT_NOTNULL => Some(ConstraintKind::NotNull),
    ffi::SQLITE_CONSTRAINT_CHECK => Some(ConstraintKind::Check),
    _ => None,
  }
}
