//! Column values, insert records and fetched rows.
//!
//! The store round-trips primitive values only. Booleans are persisted as
//! integers and dates as ISO-8601 text, so a fetched [`Row`] exposes typed
//! accessors that accept either representation.

use std::{collections::BTreeMap, fmt};

use chrono::NaiveDate;
use serde::{Serialize, Serializer, ser::SerializeMap};

// ─── Value ───────────────────────────────────────────────────────────────────

/// A single column value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
  Null,
  Integer(i64),
  Real(f64),
  Bool(bool),
  Text(String),
  Date(NaiveDate),
  Blob(Vec<u8>),
}

impl Value {
  pub fn is_null(&self) -> bool { matches!(self, Self::Null) }

  pub fn as_i64(&self) -> Option<i64> {
    match self {
      Self::Integer(i) => Some(*i),
      Self::Bool(b) => Some(i64::from(*b)),
      _ => None,
    }
  }

  pub fn as_str(&self) -> Option<&str> {
    match self {
      Self::Text(s) => Some(s),
      _ => None,
    }
  }

  pub fn as_bool(&self) -> Option<bool> {
    match self {
      Self::Bool(b) => Some(*b),
      Self::Integer(i) => Some(*i != 0),
      _ => None,
    }
  }

  pub fn as_date(&self) -> Option<NaiveDate> {
    match self {
      Self::Date(d) => Some(*d),
      Self::Text(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d").ok(),
      _ => None,
    }
  }

  pub fn as_blob(&self) -> Option<&[u8]> {
    match self {
      Self::Blob(b) => Some(b),
      _ => None,
    }
  }
}

impl From<&str> for Value {
  fn from(s: &str) -> Self { Self::Text(s.to_owned()) }
}

impl From<String> for Value {
  fn from(s: String) -> Self { Self::Text(s) }
}

impl From<&String> for Value {
  fn from(s: &String) -> Self { Self::Text(s.clone()) }
}

impl From<i64> for Value {
  fn from(i: i64) -> Self { Self::Integer(i) }
}

impl From<i32> for Value {
  fn from(i: i32) -> Self { Self::Integer(i64::from(i)) }
}

impl From<u32> for Value {
  fn from(i: u32) -> Self { Self::Integer(i64::from(i)) }
}

impl From<f64> for Value {
  fn from(f: f64) -> Self { Self::Real(f) }
}

impl From<bool> for Value {
  fn from(b: bool) -> Self { Self::Bool(b) }
}

impl From<NaiveDate> for Value {
  fn from(d: NaiveDate) -> Self { Self::Date(d) }
}

impl From<Vec<u8>> for Value {
  fn from(b: Vec<u8>) -> Self { Self::Blob(b) }
}

impl<T: Into<Value>> From<Option<T>> for Value {
  fn from(v: Option<T>) -> Self { v.map_or(Self::Null, Into::into) }
}

impl fmt::Display for Value {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Null => f.write_str("NULL"),
      Self::Integer(i) => write!(f, "{i}"),
      Self::Real(r) => write!(f, "{r}"),
      Self::Bool(b) => write!(f, "{b}"),
      Self::Text(s) => write!(f, "{s:?}"),
      Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
      Self::Blob(b) => write!(f, "x'{}'", hex::encode(b)),
    }
  }
}

impl Serialize for Value {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    match self {
      Self::Null => serializer.serialize_none(),
      Self::Integer(i) => serializer.serialize_i64(*i),
      Self::Real(f) => serializer.serialize_f64(*f),
      Self::Bool(b) => serializer.serialize_bool(*b),
      Self::Text(s) => serializer.serialize_str(s),
      Self::Date(d) => serializer.collect_str(&d.format("%Y-%m-%d")),
      Self::Blob(b) => serializer.serialize_str(&hex::encode(b)),
    }
  }
}

// ─── Record ──────────────────────────────────────────────────────────────────

/// An ordered set of `column = value` assignments for one insert.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
  fields: Vec<(&'static str, Value)>,
}

impl Record {
  pub fn new() -> Self { Self::default() }

  /// Builder-style append. Duplicates are rejected later by
  /// [`EntityDescriptor::check_record`](crate::entity::EntityDescriptor::check_record).
  pub fn with(mut self, column: &'static str, value: impl Into<Value>) -> Self {
    self.fields.push((column, value.into()));
    self
  }

  /// Replace the value of `column`, appending it if absent.
  pub fn set(&mut self, column: &'static str, value: impl Into<Value>) {
    let value = value.into();
    match self.fields.iter_mut().find(|(c, _)| *c == column) {
      Some((_, slot)) => *slot = value,
      None => self.fields.push((column, value)),
    }
  }

  pub fn get(&self, column: &str) -> Option<&Value> {
    self
      .fields
      .iter()
      .find(|(c, _)| *c == column)
      .map(|(_, v)| v)
  }

  pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Value)> + '_ {
    self.fields.iter().map(|(c, v)| (*c, v))
  }

  pub fn columns(&self) -> impl Iterator<Item = &'static str> + '_ {
    self.fields.iter().map(|(c, _)| *c)
  }

  pub fn len(&self) -> usize { self.fields.len() }

  pub fn is_empty(&self) -> bool { self.fields.is_empty() }
}

// ─── Row ─────────────────────────────────────────────────────────────────────

/// A row fetched from the store, with its primary key split out.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
  pub entity: &'static str,
  pub id:     i64,
  pub values: Vec<(&'static str, Value)>,
}

impl Row {
  pub fn get(&self, column: &str) -> Option<&Value> {
    self
      .values
      .iter()
      .find(|(c, _)| *c == column)
      .map(|(_, v)| v)
  }

  pub fn text(&self, column: &str) -> Option<&str> {
    self.get(column).and_then(Value::as_str)
  }

  pub fn integer(&self, column: &str) -> Option<i64> {
    self.get(column).and_then(Value::as_i64)
  }

  pub fn boolean(&self, column: &str) -> Option<bool> {
    self.get(column).and_then(Value::as_bool)
  }

  pub fn date(&self, column: &str) -> Option<NaiveDate> {
    self.get(column).and_then(Value::as_date)
  }
}

impl Serialize for Row {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(self.values.len() + 1))?;
    map.serialize_entry("id", &self.id)?;
    for (column, value) in &self.values {
      map.serialize_entry(column, value)?;
    }
    map.end()
  }
}

/// A row together with eagerly loaded relationships.
#[derive(Debug, Clone, Serialize)]
pub struct Joined {
  #[serde(flatten)]
  pub row:     Row,
  pub related: BTreeMap<&'static str, Vec<Row>>,
}

impl Joined {
  /// Rows loaded for `relation`; empty if it was not requested.
  pub fn related(&self, relation: &str) -> &[Row] {
    self.related.get(relation).map_or(&[], Vec::as_slice)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn option_none_becomes_null() {
    let v: Value = Option::<&str>::None.into();
    assert!(v.is_null());
    let v: Value = Some(7_i64).into();
    assert_eq!(v, Value::Integer(7));
  }

  #[test]
  fn record_set_replaces_in_place() {
    let mut r = Record::new().with("a", 1_i64).with("b", "x");
    r.set("a", 2_i64);
    r.set("c", true);
    assert_eq!(r.len(), 3);
    assert_eq!(r.get("a"), Some(&Value::Integer(2)));
    assert_eq!(r.columns().collect::<Vec<_>>(), ["a", "b", "c"]);
  }

  #[test]
  fn row_accessors_accept_stored_representations() {
    let row = Row {
      entity: "descriptor",
      id:     3,
      values: vec![
        ("created", Value::Text("2001-02-03".into())),
        ("flag", Value::Integer(1)),
      ],
    };
    assert_eq!(row.date("created"), NaiveDate::from_ymd_opt(2001, 2, 3));
    assert_eq!(row.boolean("flag"), Some(true));
    assert_eq!(row.text("missing"), None);
  }

  #[test]
  fn row_serialises_as_flat_object() {
    let row = Row {
      entity: "keyword",
      id:     1,
      values: vec![
        ("keyword", Value::Text("asthma".into())),
        ("md5", Value::Blob(vec![0xab, 0x01])),
      ],
    };
    let json = serde_json::to_value(&row).unwrap();
    assert_eq!(
      json,
      serde_json::json!({ "id": 1, "keyword": "asthma", "md5": "ab01" })
    );
  }
}
