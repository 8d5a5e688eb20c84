//! Error type for `trove-store-sqlite`.

use rusqlite::{ErrorCode, ffi};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A contract violation caught before any statement was issued.
  #[error("core error: {0}")]
  Core(#[from] trove_core::Error),

  /// A referenced row does not exist. Callers create dependencies first.
  #[error("foreign key violation on {table}: {message}")]
  ForeignKey {
    table:   &'static str,
    message: String,
  },

  /// A constraint other than the dedup key fired (NOT NULL, CHECK, a
  /// secondary UNIQUE).
  #[error("constraint violation on {table}: {message}")]
  Constraint {
    table:   &'static str,
    message: String,
  },

  /// The write lock could not be taken within the busy timeout.
  #[error("database busy while writing {table}")]
  Busy { table: &'static str },

  /// The dedup constraint suppressed an insert, yet no row carries the key.
  /// The descriptor and the schema disagree about the table's identity.
  #[error("{table}: insert conflicted on {key} but no existing row was found")]
  InvariantViolation {
    table: &'static str,
    key:   String,
  },

  #[error("{table} row {id} not found")]
  NotFound {
    table: &'static str,
    id:    i64,
  },

  #[error("{table}: statement returned no rows")]
  EmptyResult { table: &'static str },

  #[error("database error: {0}")]
  Database(#[from] rusqlite::Error),

  #[error("connection error: {0}")]
  Connection(#[from] tokio_rusqlite::Error),
}

impl Error {
  /// Classify a driver error raised while touching `table`.
  pub(crate) fn from_sqlite(table: &'static str, err: rusqlite::Error) -> Self {
    if let rusqlite::Error::SqliteFailure(failure, message) = &err {
      let message = message.clone().unwrap_or_else(|| failure.to_string());
      if failure.extended_code == ffi::SQLITE_CONSTRAINT_FOREIGNKEY {
        return Self::ForeignKey { table, message };
      }
      match failure.code {
        ErrorCode::ConstraintViolation => {
          return Self::Constraint { table, message };
        }
        ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked => {
          return Self::Busy { table };
        }
        _ => {}
      }
    }
    Self::Database(err)
  }

  /// Whether a retry by the caller could succeed.
  pub fn is_busy(&self) -> bool { matches!(self, Self::Busy { .. }) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
