//! Core types for the trove warehouse data-access layer.
//!
//! This crate is free of database dependencies. It describes *what* gets
//! stored (entity descriptors, identity fingerprints, column values and the
//! typed inputs the loaders build) and leaves *how* to the store crates.

pub mod clinical;
pub mod entity;
pub mod error;
pub mod identity;
pub mod kinds;
pub mod registry;
pub mod thesaurus;
pub mod value;

pub use entity::{ConflictPolicy, EntityDescriptor, Identity, Relation, RelationKind};
pub use error::{Error, Result};
pub use identity::Fingerprint;
pub use value::{Joined, Record, Row, Value};
