//! Generic retrieval primitives.
//!
//! All of these take a [`Session`]; the optional-session wrappers live on
//! [`Dal`](crate::Dal). Attribute and relation names are resolved against the
//! entity descriptor first, so only registry strings reach SQL text.

use std::collections::{BTreeMap, HashSet};

use rusqlite::{OptionalExtension as _, params_from_iter};
use trove_core::{
  EntityDescriptor, Joined, Record, RelationKind, Row, Value, entity::ID,
};

use crate::{
  Error, Result,
  encode::{MAX_PARAMS, key_predicate, read_row, select_list, to_sql},
  session::Session,
};

impl Session<'_> {
  /// Fetch a row by primary key.
  pub fn get(&self, entity: &'static EntityDescriptor, id: i64) -> Result<Option<Row>> {
    let sql = format!(
      "SELECT {} FROM {} WHERE id = ?1",
      select_list(entity, None),
      entity.table()
    );
    self
      .conn()
      .prepare_cached(&sql)
      .and_then(|mut stmt| stmt.query_row([id], |r| read_row(entity, r)).optional())
      .map_err(|e| Error::from_sqlite(entity.table(), e))
  }

  /// First row (by `id`) whose `attr` equals `value`.
  pub fn get_by_attr(
    &self,
    entity: &'static EntityDescriptor,
    attr: &str,
    value: impl Into<Value>,
  ) -> Result<Option<Row>> {
    let attr = entity.attribute(attr)?;
    let (predicate, params) = key_predicate(&[(attr, value.into())]);
    let sql = format!(
      "SELECT {} FROM {} WHERE {predicate} ORDER BY id LIMIT 1",
      select_list(entity, None),
      entity.table()
    );
    self
      .conn()
      .prepare_cached(&sql)
      .and_then(|mut stmt| {
        stmt
          .query_row(params_from_iter(params), |r| read_row(entity, r))
          .optional()
      })
      .map_err(|e| Error::from_sqlite(entity.table(), e))
  }

  /// Every row whose `attr` is one of `values`, each at most once. With
  /// `sorted`, rows come back in primary-key order.
  pub fn bget_by_attr(
    &self,
    entity: &'static EntityDescriptor,
    attr: &str,
    values: &[Value],
    sorted: bool,
  ) -> Result<Vec<Row>> {
    let attr = entity.attribute(attr)?;
    let mut rows = Vec::new();
    let mut seen = HashSet::new();
    for chunk in values.chunks(MAX_PARAMS) {
      let sql = format!(
        "SELECT {} FROM {} WHERE {attr} IN ({})",
        select_list(entity, None),
        entity.table(),
        vec!["?"; chunk.len()].join(", ")
      );
      let params = chunk.iter().map(to_sql);
      let found = self
        .conn()
        .prepare(&sql)
        .and_then(|mut stmt| {
          stmt
            .query_map(params_from_iter(params), |r| read_row(entity, r))?
            .collect::<rusqlite::Result<Vec<_>>>()
        })
        .map_err(|e| Error::from_sqlite(entity.table(), e))?;
      // A value repeated across chunks matches the same row again.
      rows.extend(found.into_iter().filter(|row| seen.insert(row.id)));
    }
    if sorted {
      rows.sort_by_key(|r| r.id);
    }
    Ok(rows)
  }

  /// Fetch a row with the named relationships loaded alongside it.
  pub fn get_joined(
    &self,
    entity: &'static EntityDescriptor,
    id: i64,
    relations: &[&str],
  ) -> Result<Option<Joined>> {
    let relations = relations
      .iter()
      .map(|name| entity.relation(name))
      .collect::<trove_core::Result<Vec<_>>>()?;

    let Some(row) = self.get(entity, id)? else {
      return Ok(None);
    };

    let mut related = BTreeMap::new();
    for relation in relations {
      let rows = match relation.kind {
        RelationKind::ToOne { column, target } => match row.integer(column) {
          Some(target_id) => self.get(target, target_id)?.into_iter().collect(),
          None => Vec::new(),
        },
        RelationKind::ToMany { target, column } => {
          let sql = format!(
            "SELECT {} FROM {} WHERE {column} = ?1 ORDER BY id",
            select_list(target, None),
            target.table()
          );
          self.select_rows(target, &sql, id)?
        }
        RelationKind::Through { link, near, far, target } => {
          let sql = format!(
            "SELECT {} FROM {} t JOIN {} l ON l.{far} = t.id
             WHERE l.{near} = ?1 ORDER BY t.id",
            select_list(target, Some("t")),
            target.table(),
            link.table()
          );
          self.select_rows(target, &sql, id)?
        }
      };
      related.insert(relation.name, rows);
    }
    Ok(Some(Joined { row, related }))
  }

  /// Overwrite one attribute in place.
  ///
  /// The value is stored in the entity's normalised form. If the attribute
  /// feeds the entity's fingerprint, the fingerprint is recomputed and
  /// written in the same statement.
  pub fn update_attr_value(
    &self,
    entity: &'static EntityDescriptor,
    id: i64,
    attr: &str,
    value: impl Into<Value>,
  ) -> Result<()> {
    let attr = entity.attribute(attr)?;
    if attr == ID || Some(attr) == entity.fingerprint_column() {
      return Err(
        trove_core::Error::UnsupportedOperation {
          entity:    entity.name,
          operation: "updating a derived attribute",
        }
        .into(),
      );
    }
    let value = entity.normalize(attr, value.into());
    let not_null = entity.required.contains(&attr) || entity.dedup_columns().contains(&attr);
    if value.is_null() && not_null {
      return Err(
        trove_core::Error::MissingKeyAttribute { entity: entity.name, attribute: attr }.into(),
      );
    }

    let rehash = match (entity.fingerprint_column(), entity.identity) {
      (Some(column), trove_core::Identity::Fingerprint { fields, .. })
        if fields.contains(&attr) =>
      {
        let current = self
          .get(entity, id)?
          .ok_or(Error::NotFound { table: entity.table(), id })?;
        let mut record = Record::new();
        for &field in fields {
          record.set(field, current.get(field).cloned().unwrap_or(Value::Null));
        }
        record.set(attr, value.clone());
        entity.fingerprint(&record).map(|fp| (column, Value::from(fp)))
      }
      _ => None,
    };

    let changed = match rehash {
      Some((column, fp)) => {
        let sql = format!(
          "UPDATE {} SET {attr} = ?1, {column} = ?2 WHERE id = ?3",
          entity.table()
        );
        self
          .conn()
          .execute(&sql, rusqlite::params![to_sql(&value), to_sql(&fp), id])
      }
      None => {
        let sql = format!("UPDATE {} SET {attr} = ?1 WHERE id = ?2", entity.table());
        self.conn().execute(&sql, rusqlite::params![to_sql(&value), id])
      }
    }
    .map_err(|e| Error::from_sqlite(entity.table(), e))?;

    if changed == 0 {
      return Err(Error::NotFound { table: entity.table(), id });
    }
    tracing::debug!(table = entity.table(), id, attr, "attribute updated");
    Ok(())
  }

  /// Remove a row. Returns whether it existed.
  pub fn delete(&self, entity: &'static EntityDescriptor, id: i64) -> Result<bool> {
    let sql = format!("DELETE FROM {} WHERE id = ?1", entity.table());
    let changed = self
      .conn()
      .execute(&sql, [id])
      .map_err(|e| Error::from_sqlite(entity.table(), e))?;
    if changed > 0 {
      tracing::debug!(table = entity.table(), id, "row deleted");
    }
    Ok(changed > 0)
  }

  pub fn count(&self, entity: &'static EntityDescriptor) -> Result<i64> {
    let sql = format!("SELECT COUNT(*) FROM {}", entity.table());
    self
      .conn()
      .query_row(&sql, [], |r| r.get(0))
      .map_err(|e| Error::from_sqlite(entity.table(), e))
  }

  /// Primary key of the row carrying `key`, if any.
  pub(crate) fn find_id(
    &self,
    entity: &'static EntityDescriptor,
    key: &[(&'static str, Value)],
  ) -> Result<Option<i64>> {
    let (predicate, params) = key_predicate(key);
    let sql = format!("SELECT id FROM {} WHERE {predicate} LIMIT 1", entity.table());
    self
      .conn()
      .prepare_cached(&sql)
      .and_then(|mut stmt| {
        stmt
          .query_row(params_from_iter(params), |r| r.get(0))
          .optional()
      })
      .map_err(|e| Error::from_sqlite(entity.table(), e))
  }

  fn select_rows(
    &self,
    entity: &'static EntityDescriptor,
    sql: &str,
    id: i64,
  ) -> Result<Vec<Row>> {
    self
      .conn()
      .prepare_cached(sql)
      .and_then(|mut stmt| {
        stmt
          .query_map([id], |r| read_row(entity, r))?
          .collect::<rusqlite::Result<Vec<_>>>()
      })
      .map_err(|e| Error::from_sqlite(entity.table(), e))
  }
}
