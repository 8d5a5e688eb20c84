//! Error types for `trove-core`.
//!
//! Every variant here is a contract violation detected before any statement
//! reaches the store.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown entity: {0:?}")]
  UnknownEntity(String),

  #[error("{entity} has no attribute {attribute:?}")]
  UnknownAttribute {
    entity:    &'static str,
    attribute: String,
  },

  #[error("{entity} has no relation {relation:?}")]
  UnknownRelation {
    entity:   &'static str,
    relation: String,
  },

  #[error("attribute {attribute:?} set twice on {entity} record")]
  DuplicateAttribute {
    entity:    &'static str,
    attribute: &'static str,
  },

  /// A dedup key attribute was absent or NULL; a NULL in a UNIQUE tuple
  /// never conflicts, so the row would silently duplicate.
  #[error("{entity} record is missing key attribute {attribute:?}")]
  MissingKeyAttribute {
    entity:    &'static str,
    attribute: &'static str,
  },

  #[error("{entity}.{attribute} must reference an existing row, got {value}")]
  NegativeKey {
    entity:    &'static str,
    attribute: &'static str,
    value:     i64,
  },

  #[error("{entity}: {records} records but {fingerprints} fingerprints")]
  LengthMismatch {
    entity:       &'static str,
    records:      usize,
    fingerprints: usize,
  },

  #[error("invalid descriptor for {entity}: {reason}")]
  InvalidDescriptor {
    entity: &'static str,
    reason: String,
  },

  #[error("{operation} is not supported for {entity}")]
  UnsupportedOperation {
    entity:    &'static str,
    operation: &'static str,
  },

  #[error("unknown {kind} value: {value:?}")]
  UnknownKind {
    kind:  &'static str,
    value: String,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
