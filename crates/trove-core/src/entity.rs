//! Entity descriptors: the declarative description of one warehouse table.
//!
//! Every table the loader writes to is described by a static
//! [`EntityDescriptor`]: its columns, how a row's identity is derived, what
//! happens when an insert collides with an existing identity, and which
//! relationships can be eagerly loaded alongside it. The upsert protocols in
//! the store crate are driven entirely by these descriptors.

use std::fmt;

use crate::{
  Error, Result,
  identity::Fingerprint,
  value::{Record, Value},
};

/// Name of the surrogate primary key column shared by every table.
pub const ID: &str = "id";

// ─── Identity ────────────────────────────────────────────────────────────────

/// How the deduplication key of a row is derived.
#[derive(Debug, Clone, Copy)]
pub enum Identity {
  /// Identity is the digest of `fields`, stored in `column`.
  ///
  /// With a `scope`, uniqueness is `(scope, column)`: the same content may
  /// exist once under each parent.
  Fingerprint {
    column:    &'static str,
    fields:    &'static [&'static str],
    fold_case: bool,
    scope:     Option<&'static str>,
  },
  /// Identity is a tuple of stored columns (accessions, foreign keys).
  NaturalKey(&'static [&'static str]),
  /// No identity; every insert creates a row.
  Unkeyed,
}

/// What an insert does when its dedup key already exists.
#[derive(Debug, Clone, Copy)]
pub enum ConflictPolicy {
  /// Keep the existing row and resolve its key (IODI).
  Ignore,
  /// Overwrite the listed mutable columns in place (IODU).
  Update(&'static [&'static str]),
}

// ─── Relations ───────────────────────────────────────────────────────────────

/// A named relationship that `get_joined` can materialise.
pub struct Relation {
  pub name: &'static str,
  pub kind: RelationKind,
}

pub enum RelationKind {
  /// `self.column` references `target.id`.
  ToOne {
    column: &'static str,
    target: &'static EntityDescriptor,
  },
  /// `target.column` references `self.id`.
  ToMany {
    target: &'static EntityDescriptor,
    column: &'static str,
  },
  /// `link.near` references `self.id` and `link.far` references `target.id`.
  Through {
    link:   &'static EntityDescriptor,
    near:   &'static str,
    far:    &'static str,
    target: &'static EntityDescriptor,
  },
}

impl fmt::Debug for Relation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let target = match &self.kind {
      RelationKind::ToOne { target, .. }
      | RelationKind::ToMany { target, .. }
      | RelationKind::Through { target, .. } => target.name,
    };
    write!(f, "{} -> {}", self.name, target)
  }
}

// ─── Descriptor ──────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct EntityDescriptor {
  /// Entity name; also the table name.
  pub name:      &'static str,
  /// Caller-supplied columns, excluding `id` and any fingerprint column.
  pub columns:   &'static [&'static str],
  pub identity:  Identity,
  pub policy:    ConflictPolicy,
  /// Non-key columns that must be supplied and non-null on insert.
  pub required:  &'static [&'static str],
  /// Text columns stored lower-cased, whichever path writes them.
  pub lowercase: &'static [&'static str],
  pub relations: &'static [Relation],
}

impl EntityDescriptor {
  pub fn table(&self) -> &'static str { self.name }

  pub fn fingerprint_column(&self) -> Option<&'static str> {
    match self.identity {
      Identity::Fingerprint { column, .. } => Some(column),
      _ => None,
    }
  }

  /// Every column stored on a row besides `id`, in declaration order.
  pub fn stored_columns(&self) -> Vec<&'static str> {
    let mut cols = self.columns.to_vec();
    cols.extend(self.fingerprint_column());
    cols
  }

  /// The columns covered by the table's dedup UNIQUE constraint.
  pub fn dedup_columns(&self) -> Vec<&'static str> {
    match self.identity {
      Identity::Fingerprint { column, scope, .. } => {
        scope.into_iter().chain([column]).collect()
      }
      Identity::NaturalKey(cols) => cols.to_vec(),
      Identity::Unkeyed => Vec::new(),
    }
  }

  /// Columns an IODU overwrites on conflict; empty for IODI entities.
  pub fn mutable_columns(&self) -> &'static [&'static str] {
    match self.policy {
      ConflictPolicy::Update(cols) => cols,
      ConflictPolicy::Ignore => &[],
    }
  }

  /// Columns that reference other tables, as declared by `ToOne` relations.
  pub fn foreign_keys(&self) -> impl Iterator<Item = &'static str> + '_ {
    self.relations.iter().filter_map(|r| match r.kind {
      RelationKind::ToOne { column, .. } => Some(column),
      _ => None,
    })
  }

  /// Resolve a caller-provided attribute name to the descriptor's static
  /// column name, so that no caller string is ever spliced into SQL.
  pub fn attribute(&self, name: &str) -> Result<&'static str> {
    if name == ID {
      return Ok(ID);
    }
    self
      .stored_columns()
      .into_iter()
      .find(|c| *c == name)
      .ok_or_else(|| Error::UnknownAttribute {
        entity:    self.name,
        attribute: name.to_owned(),
      })
  }

  pub fn relation(&self, name: &str) -> Result<&'static Relation> {
    self
      .relations
      .iter()
      .find(|r| r.name == name)
      .ok_or_else(|| Error::UnknownRelation {
        entity:   self.name,
        relation: name.to_owned(),
      })
  }

  /// Digest of the identifying fields of `record`, for fingerprinted
  /// entities. Absent fields hash as `NULL`.
  pub fn fingerprint(&self, record: &Record) -> Option<Fingerprint> {
    let Identity::Fingerprint { fields, fold_case, .. } = self.identity else {
      return None;
    };
    let values: Vec<&Value> = fields
      .iter()
      .map(|f| record.get(f).unwrap_or(&Value::Null))
      .collect();
    Some(Fingerprint::of(values, fold_case))
  }

  /// Check `record` against this descriptor before any SQL is built.
  pub fn check_record(&self, record: &Record) -> Result<()> {
    for (i, column) in record.columns().enumerate() {
      if !self.columns.contains(&column) {
        return Err(Error::UnknownAttribute {
          entity:    self.name,
          attribute: column.to_owned(),
        });
      }
      if record.columns().take(i).any(|c| c == column) {
        return Err(Error::DuplicateAttribute {
          entity:    self.name,
          attribute: column,
        });
      }
    }

    let key: &[&'static str] = match &self.identity {
      Identity::NaturalKey(cols) => *cols,
      Identity::Fingerprint { scope: Some(scope), .. } => std::slice::from_ref(scope),
      _ => &[],
    };
    for &column in key.iter().chain(self.required) {
      if record.get(column).is_none_or(Value::is_null) {
        return Err(Error::MissingKeyAttribute {
          entity:    self.name,
          attribute: column,
        });
      }
    }

    for column in self.foreign_keys() {
      if let Some(value) = record.get(column).and_then(Value::as_i64)
        && value < 0
      {
        return Err(Error::NegativeKey {
          entity: self.name,
          attribute: column,
          value,
        });
      }
    }
    Ok(())
  }

  /// Stored form of `value` in `column`.
  pub fn normalize(&self, column: &str, value: Value) -> Value {
    match value {
      Value::Text(text) if self.lowercase.contains(&column) => {
        Value::Text(text.to_lowercase())
      }
      other => other,
    }
  }

  /// Rewrite every normalised column of `record` in its stored form.
  pub fn normalize_record(&self, record: &mut Record) {
    for &column in self.lowercase {
      if let Some(value) = record.get(column).cloned() {
        record.set(column, self.normalize(column, value));
      }
    }
  }

  /// Check and normalise `record` and append the freshly computed
  /// fingerprint, producing the exact column set the insert statement will
  /// carry.
  pub fn prepare(&self, mut record: Record) -> Result<Record> {
    self.check_record(&record)?;
    self.normalize_record(&mut record);
    if let (Some(column), Some(fp)) =
      (self.fingerprint_column(), self.fingerprint(&record))
    {
      record.set(column, fp);
    }
    Ok(record)
  }

  /// The dedup key of a prepared record, as `(column, value)` pairs.
  pub fn dedup_key(&self, prepared: &Record) -> Vec<(&'static str, Value)> {
    self
      .dedup_columns()
      .into_iter()
      .map(|c| (c, prepared.get(c).cloned().unwrap_or(Value::Null)))
      .collect()
  }

  /// Structural consistency of the descriptor itself.
  pub fn validate(&self) -> Result<()> {
    let invalid = |reason: String| Error::InvalidDescriptor {
      entity: self.name,
      reason,
    };
    let declared = |c: &'static str| self.columns.contains(&c);

    match self.identity {
      Identity::Fingerprint { column, fields, scope, .. } => {
        if fields.is_empty() {
          return Err(invalid("fingerprint has no fields".into()));
        }
        if let Some(f) = fields.iter().find(|f| !declared(**f)) {
          return Err(invalid(format!("fingerprint field {f:?} is not a column")));
        }
        if declared(column) {
          return Err(invalid(format!("fingerprint column {column:?} is caller-supplied")));
        }
        if let Some(scope) = scope
          && !declared(scope)
        {
          return Err(invalid(format!("scope {scope:?} is not a column")));
        }
      }
      Identity::NaturalKey(cols) => {
        if cols.is_empty() {
          return Err(invalid("natural key is empty".into()));
        }
        if let Some(c) = cols.iter().find(|c| !declared(**c)) {
          return Err(invalid(format!("key column {c:?} is not a column")));
        }
      }
      Identity::Unkeyed => {}
    }

    if let ConflictPolicy::Update(mutable) = self.policy {
      if mutable.is_empty() {
        return Err(invalid("update policy lists no mutable columns".into()));
      }
      if let Some(c) = mutable.iter().find(|c| !declared(**c)) {
        return Err(invalid(format!("mutable column {c:?} is not a column")));
      }
      let key = self.dedup_columns();
      if let Some(c) = mutable.iter().find(|c| key.contains(*c)) {
        return Err(invalid(format!("key column {c:?} listed as mutable")));
      }
      if matches!(self.identity, Identity::Unkeyed) {
        return Err(invalid("unkeyed entity cannot update on conflict".into()));
      }
    }

    if let Some(c) = self.required.iter().find(|c| !declared(**c)) {
      return Err(invalid(format!("required column {c:?} is not a column")));
    }
    if let Some(c) = self.lowercase.iter().find(|c| !declared(**c)) {
      return Err(invalid(format!("lower-cased column {c:?} is not a column")));
    }

    for relation in self.relations {
      if let RelationKind::ToOne { column, .. } = relation.kind
        && !declared(column)
      {
        return Err(invalid(format!(
          "relation {:?} uses undeclared column {column:?}",
          relation.name
        )));
      }
    }
    Ok(())
  }
}
