//! Conversions between [`Value`] and SQLite column values, plus the small
//! SQL text builders shared by the protocols.
//!
//! Booleans are stored as `0`/`1` and dates as `YYYY-MM-DD` text.

use rusqlite::types::{Value as SqlValue, ValueRef};
use trove_core::{EntityDescriptor, Row, Value, entity::ID};

/// Bound-parameter budget per statement; SQLite's historical default limit.
pub const MAX_PARAMS: usize = 999;

pub fn to_sql(value: &Value) -> SqlValue {
  match value {
    Value::Null => SqlValue::Null,
    Value::Integer(i) => SqlValue::Integer(*i),
    Value::Real(f) => SqlValue::Real(*f),
    Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
    Value::Text(s) => SqlValue::Text(s.clone()),
    Value::Date(d) => SqlValue::Text(d.format("%Y-%m-%d").to_string()),
    Value::Blob(b) => SqlValue::Blob(b.clone()),
  }
}

pub fn from_sql(value: ValueRef<'_>) -> Value {
  match value {
    ValueRef::Null => Value::Null,
    ValueRef::Integer(i) => Value::Integer(i),
    ValueRef::Real(f) => Value::Real(f),
    ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
    ValueRef::Blob(b) => Value::Blob(b.to_vec()),
  }
}

/// `id, a, b, …`, optionally qualified with a table alias.
pub fn select_list(entity: &EntityDescriptor, alias: Option<&str>) -> String {
  let prefix = alias.map(|a| format!("{a}.")).unwrap_or_default();
  std::iter::once(ID)
    .chain(entity.stored_columns())
    .map(|c| format!("{prefix}{c}"))
    .collect::<Vec<_>>()
    .join(", ")
}

/// Decode a row selected with [`select_list`].
pub fn read_row(
  entity: &'static EntityDescriptor,
  row: &rusqlite::Row<'_>,
) -> rusqlite::Result<Row> {
  let id = row.get(0)?;
  let values = entity
    .stored_columns()
    .into_iter()
    .enumerate()
    .map(|(i, c)| -> rusqlite::Result<_> {
      Ok((c, from_sql(row.get_ref(i + 1)?)))
    })
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(Row { entity: entity.name, id, values })
}

/// `(?, ?, ?)` repeated `rows` times.
pub fn value_groups(width: usize, rows: usize) -> String {
  let group = format!("({})", vec!["?"; width].join(", "));
  vec![group; rows].join(", ")
}

/// `a = ? AND b = ?`, using `IS NULL` for absent values.
pub fn key_predicate(key: &[(&'static str, Value)]) -> (String, Vec<SqlValue>) {
  let mut clauses = Vec::with_capacity(key.len());
  let mut params = Vec::with_capacity(key.len());
  for (column, value) in key {
    if value.is_null() {
      clauses.push(format!("{column} IS NULL"));
    } else {
      clauses.push(format!("{column} = ?"));
      params.push(to_sql(value));
    }
  }
  (clauses.join(" AND "), params)
}

pub fn describe_key(key: &[(&'static str, Value)]) -> String {
  key
    .iter()
    .map(|(c, v)| format!("{c}={v}"))
    .collect::<Vec<_>>()
    .join(", ")
}
