//! The write protocols: IODI, IODU, BIODI, and plain inserts for unkeyed
//! entities.
//!
//! Each statement names its conflict target explicitly, so only a collision
//! on the dedup key is absorbed; any other constraint still fails the call.

use rusqlite::params_from_iter;
use trove_core::{
  ConflictPolicy, EntityDescriptor, Fingerprint, Identity, Record, Value,
};

use crate::{
  Error, Result,
  encode::{MAX_PARAMS, describe_key, to_sql, value_groups},
  session::Session,
};

/// Reduce a `RETURNING id` result set to its single key.
pub fn take_first(ids: Vec<i64>, table: &'static str) -> Result<i64> {
  ids.into_iter().next().ok_or(Error::EmptyResult { table })
}

impl Session<'_> {
  /// Insert-or-do-nothing, then resolve the key of whichever row carries
  /// the dedup key.
  pub fn iodi(&self, entity: &'static EntityDescriptor, record: Record) -> Result<i64> {
    if matches!(entity.identity, Identity::Unkeyed) {
      return Err(unsupported(entity, "iodi"));
    }
    let prepared = entity.prepare(record)?;
    let key = entity.dedup_key(&prepared);

    let sql = format!(
      "{} ON CONFLICT ({}) DO NOTHING RETURNING id",
      insert_head(entity, &prepared),
      entity.dedup_columns().join(", ")
    );
    let ids = self.returning_ids(entity, &sql, &prepared)?;
    if ids.is_empty() {
      tracing::debug!(table = entity.table(), "insert suppressed by dedup key");
      return self.resolve(entity, &key);
    }

    let id = take_first(ids, entity.table())?;
    tracing::debug!(table = entity.table(), id, "row inserted");
    Ok(id)
  }

  /// Insert-or-update: a collision on the natural key overwrites the
  /// supplied mutable columns of the existing row.
  pub fn iodu(&self, entity: &'static EntityDescriptor, record: Record) -> Result<i64> {
    if matches!(entity.policy, ConflictPolicy::Ignore)
      || matches!(entity.identity, Identity::Unkeyed)
    {
      return Err(unsupported(entity, "iodu"));
    }
    let prepared = entity.prepare(record)?;
    let key = entity.dedup_key(&prepared);

    let assignments = entity
      .mutable_columns()
      .iter()
      .filter(|c| prepared.get(c).is_some())
      .map(|c| format!("{c} = excluded.{c}"))
      .collect::<Vec<_>>();
    let action = if assignments.is_empty() {
      "NOTHING".to_owned()
    } else {
      format!("UPDATE SET {}", assignments.join(", "))
    };

    let sql = format!(
      "{} ON CONFLICT ({}) DO {action} RETURNING id",
      insert_head(entity, &prepared),
      entity.dedup_columns().join(", ")
    );
    let ids = self.returning_ids(entity, &sql, &prepared)?;
    if ids.is_empty() {
      return self.resolve(entity, &key);
    }

    let id = take_first(ids, entity.table())?;
    tracing::debug!(table = entity.table(), id, "row upserted");
    Ok(id)
  }

  /// Batch insert child rows under `parent_id`, skipping any whose
  /// `(parent, fingerprint)` pair is already present. Returns how many rows
  /// were inserted; keys are not resolved.
  pub fn biodi(
    &self,
    entity: &'static EntityDescriptor,
    parent_id: i64,
    children: &[Record],
    fingerprints: &[Fingerprint],
  ) -> Result<usize> {
    let Identity::Fingerprint { column, scope: Some(scope), .. } = entity.identity
    else {
      return Err(unsupported(entity, "biodi"));
    };
    if children.len() != fingerprints.len() {
      return Err(
        trove_core::Error::LengthMismatch {
          entity:       entity.name,
          records:      children.len(),
          fingerprints: fingerprints.len(),
        }
        .into(),
      );
    }
    if children.is_empty() {
      return Ok(0);
    }

    let columns = entity.stored_columns();
    let mut rows = Vec::with_capacity(children.len());
    for (child, fp) in children.iter().zip(fingerprints) {
      let mut row = child.clone();
      row.set(scope, parent_id);
      entity.check_record(&row)?;
      entity.normalize_record(&mut row);
      row.set(column, *fp);
      rows.push(row);
    }

    let per_statement = (MAX_PARAMS / columns.len()).max(1);
    let mut inserted = 0;
    for chunk in rows.chunks(per_statement) {
      let sql = format!(
        "INSERT INTO {} ({}) VALUES {} ON CONFLICT ({scope}, {column}) DO NOTHING",
        entity.table(),
        columns.join(", "),
        value_groups(columns.len(), chunk.len())
      );
      let params = chunk.iter().flat_map(|row| {
        columns
          .iter()
          .map(|c| to_sql(row.get(c).unwrap_or(&Value::Null)))
      });
      inserted += self
        .conn()
        .execute(&sql, params_from_iter(params))
        .map_err(|e| Error::from_sqlite(entity.table(), e))?;
    }

    tracing::debug!(
      table = entity.table(),
      parent_id,
      offered = children.len(),
      inserted,
      "batch insert finished"
    );
    Ok(inserted)
  }

  /// Plain insert for entities without an identity; always a new row.
  pub fn insert(&self, entity: &'static EntityDescriptor, record: Record) -> Result<i64> {
    if !matches!(entity.identity, Identity::Unkeyed) {
      return Err(unsupported(entity, "insert"));
    }
    let prepared = entity.prepare(record)?;
    let sql = format!("{} RETURNING id", insert_head(entity, &prepared));
    let id = take_first(self.returning_ids(entity, &sql, &prepared)?, entity.table())?;
    tracing::debug!(table = entity.table(), id, "row inserted");
    Ok(id)
  }

  /// Write `record` with whichever protocol its entity declares.
  pub fn upsert(&self, entity: &'static EntityDescriptor, record: Record) -> Result<i64> {
    match (entity.identity, entity.policy) {
      (Identity::Unkeyed, _) => self.insert(entity, record),
      (_, ConflictPolicy::Ignore) => self.iodi(entity, record),
      (_, ConflictPolicy::Update(_)) => self.iodu(entity, record),
    }
  }

  fn returning_ids(
    &self,
    entity: &'static EntityDescriptor,
    sql: &str,
    prepared: &Record,
  ) -> Result<Vec<i64>> {
    let params = prepared.iter().map(|(_, v)| to_sql(v));
    self
      .conn()
      .prepare_cached(sql)
      .and_then(|mut stmt| {
        stmt
          .query_map(params_from_iter(params), |r| r.get(0))?
          .collect::<rusqlite::Result<Vec<i64>>>()
      })
      .map_err(|e| Error::from_sqlite(entity.table(), e))
  }

  fn resolve(
    &self,
    entity: &'static EntityDescriptor,
    key: &[(&'static str, Value)],
  ) -> Result<i64> {
    if let Some(id) = self.find_id(entity, key)? {
      tracing::debug!(table = entity.table(), id, "resolved existing row");
      return Ok(id);
    }
    let key = describe_key(key);
    tracing::error!(table = entity.table(), %key, "dedup conflict without a matching row");
    Err(Error::InvariantViolation { table: entity.table(), key })
  }
}

/// `INSERT INTO t (a, b) VALUES (?, ?)` for the columns present in
/// `prepared`, in record order.
fn insert_head(entity: &EntityDescriptor, prepared: &Record) -> String {
  if prepared.is_empty() {
    return format!("INSERT INTO {} DEFAULT VALUES", entity.table());
  }
  format!(
    "INSERT INTO {} ({}) VALUES ({})",
    entity.table(),
    prepared.columns().collect::<Vec<_>>().join(", "),
    vec!["?"; prepared.len()].join(", ")
  )
}

fn unsupported(entity: &EntityDescriptor, operation: &'static str) -> Error {
  trove_core::Error::UnsupportedOperation { entity: entity.name, operation }.into()
}
