//! Content fingerprints for attribute-identified entities.
//!
//! A [`Fingerprint`] is the MD5 digest of an entity's identifying attributes
//! rendered in a fixed order. It is a deduplication key, not a security
//! boundary: two submissions that canonicalise to the same bytes are the same
//! logical row.

use std::fmt;

use crate::value::Value;

/// Separates consecutive fields in the canonical buffer.
const SEPARATOR: u8 = 0x1f;

/// A 16-byte content digest, stored raw in the entity's hash column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint([u8; 16]);

impl Fingerprint {
  /// Digest `fields` in the order given.
  ///
  /// Text is case-folded when `fold_case` is set. Every value carries a type
  /// tag so that `NULL`, the empty string and `"0"` never collide.
  pub fn of<'a, I>(fields: I, fold_case: bool) -> Self
  where
    I: IntoIterator<Item = &'a Value>,
  {
    let mut buf = Vec::with_capacity(64);
    for value in fields {
      canonicalize(&mut buf, value, fold_case);
      buf.push(SEPARATOR);
    }
    Self(md5::compute(&buf).0)
  }

  pub fn to_hex(&self) -> String { hex::encode(self.0) }
}

impl fmt::Display for Fingerprint {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.to_hex())
  }
}

impl From<Fingerprint> for Value {
  fn from(fp: Fingerprint) -> Self { Value::Blob(fp.0.to_vec()) }
}

fn canonicalize(buf: &mut Vec<u8>, value: &Value, fold_case: bool) {
  match value {
    Value::Null => buf.push(b'N'),
    Value::Integer(i) => {
      buf.push(b'I');
      buf.extend_from_slice(i.to_string().as_bytes());
    }
    Value::Real(f) => {
      buf.push(b'R');
      buf.extend_from_slice(f.to_string().as_bytes());
    }
    // Booleans hash like the integers they are stored as.
    Value::Bool(b) => {
      buf.push(b'I');
      buf.push(if *b { b'1' } else { b'0' });
    }
    Value::Text(s) => {
      buf.push(b'T');
      if fold_case {
        buf.extend_from_slice(s.to_lowercase().as_bytes());
      } else {
        buf.extend_from_slice(s.as_bytes());
      }
    }
    // Dates hash like the ISO text they are stored as.
    Value::Date(d) => {
      buf.push(b'T');
      buf.extend_from_slice(d.format("%Y-%m-%d").to_string().as_bytes());
    }
    Value::Blob(b) => {
      buf.push(b'B');
      buf.extend_from_slice(b);
    }
  }
}
