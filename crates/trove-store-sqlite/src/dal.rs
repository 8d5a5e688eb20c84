//! [`Dal`], the data-access facade over one synchronous connection.
//!
//! Every method takes an optional [`Session`]. With one, the call joins that
//! unit of work; without, it runs in a session of its own. See
//! [`session::scoped`](crate::session::scoped).

use rusqlite::Connection;
use trove_core::{EntityDescriptor, Fingerprint, Joined, Record, Row, Value};

use crate::{
  Result,
  session::{self, Session},
};

#[derive(Clone, Copy)]
pub struct Dal<'c> {
  conn: &'c Connection,
}

impl<'c> Dal<'c> {
  pub fn new(conn: &'c Connection) -> Self { Self { conn } }

  /// Open a session the caller commits or rolls back.
  pub fn begin(&self) -> Result<Session<'c>> { Session::begin(self.conn) }

  pub fn with_session<T>(
    &self,
    session: Option<&Session<'_>>,
    f: impl FnOnce(&Session<'_>) -> Result<T>,
  ) -> Result<T> {
    session::scoped(self.conn, session, f)
  }

  // ─── Retrieval ─────────────────────────────────────────────────────────────

  pub fn get(
    &self,
    entity: &'static EntityDescriptor,
    id: i64,
    session: Option<&Session<'_>>,
  ) -> Result<Option<Row>> {
    self.with_session(session, |s| s.get(entity, id))
  }

  pub fn get_by_attr(
    &self,
    entity: &'static EntityDescriptor,
    attr: &str,
    value: impl Into<Value>,
    session: Option<&Session<'_>>,
  ) -> Result<Option<Row>> {
    self.with_session(session, |s| s.get_by_attr(entity, attr, value))
  }

  pub fn bget_by_attr(
    &self,
    entity: &'static EntityDescriptor,
    attr: &str,
    values: &[Value],
    sorted: bool,
    session: Option<&Session<'_>>,
  ) -> Result<Vec<Row>> {
    if values.is_empty() {
      // Still reject a bad attribute name.
      entity.attribute(attr)?;
      return Ok(Vec::new());
    }
    self.with_session(session, |s| s.bget_by_attr(entity, attr, values, sorted))
  }

  pub fn get_joined(
    &self,
    entity: &'static EntityDescriptor,
    id: i64,
    relations: &[&str],
    session: Option<&Session<'_>>,
  ) -> Result<Option<Joined>> {
    self.with_session(session, |s| s.get_joined(entity, id, relations))
  }

  pub fn update_attr_value(
    &self,
    entity: &'static EntityDescriptor,
    id: i64,
    attr: &str,
    value: impl Into<Value>,
    session: Option<&Session<'_>>,
  ) -> Result<()> {
    self.with_session(session, |s| s.update_attr_value(entity, id, attr, value))
  }

  pub fn delete(
    &self,
    entity: &'static EntityDescriptor,
    id: i64,
    session: Option<&Session<'_>>,
  ) -> Result<bool> {
    self.with_session(session, |s| s.delete(entity, id))
  }

  pub fn count(
    &self,
    entity: &'static EntityDescriptor,
    session: Option<&Session<'_>>,
  ) -> Result<i64> {
    self.with_session(session, |s| s.count(entity))
  }

  // ─── Writes ────────────────────────────────────────────────────────────────

  pub fn iodi(
    &self,
    entity: &'static EntityDescriptor,
    record: Record,
    session: Option<&Session<'_>>,
  ) -> Result<i64> {
    self.with_session(session, |s| s.iodi(entity, record))
  }

  pub fn iodu(
    &self,
    entity: &'static EntityDescriptor,
    record: Record,
    session: Option<&Session<'_>>,
  ) -> Result<i64> {
    self.with_session(session, |s| s.iodu(entity, record))
  }

  pub fn biodi(
    &self,
    entity: &'static EntityDescriptor,
    parent_id: i64,
    children: &[Record],
    fingerprints: &[Fingerprint],
    session: Option<&Session<'_>>,
  ) -> Result<usize> {
    self.with_session(session, |s| s.biodi(entity, parent_id, children, fingerprints))
  }

  pub fn insert(
    &self,
    entity: &'static EntityDescriptor,
    record: Record,
    session: Option<&Session<'_>>,
  ) -> Result<i64> {
    self.with_session(session, |s| s.insert(entity, record))
  }

  pub fn upsert(
    &self,
    entity: &'static EntityDescriptor,
    record: Record,
    session: Option<&Session<'_>>,
  ) -> Result<i64> {
    self.with_session(session, |s| s.upsert(entity, record))
  }
}
