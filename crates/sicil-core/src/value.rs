//! Column values exchanged between entities and store backends.
//!
//! Backends never see entity structs directly; they move [`Value`]s in the
//! column order each entity declares. Timestamps travel as
//! [`Value::Timestamp`] and may come back as RFC 3339 text.

use chrono::{DateTime, Utc};

use crate::ValueError;

/// A single column value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
  Null,
  Integer(i64),
  Real(f64),
  Text(String),
  Timestamp(DateTime<Utc>),
}

impl Value {
  /// Short name of the variant, used in decode errors.
  pub fn kind(&self) -> &'static str {
    match self {
      Self::Null => "null",
      Self::Integer(_) => "integer",
      Self::Real(_) => "real",
      Self::Text(_) => "text",
      Self::Timestamp(_) => "timestamp",
    }
  }
}

/// Conversion between a field type and its column [`Value`].
pub trait ColumnValue: Sized {
  /// Name reported when a stored value has the wrong shape.
  const KIND: &'static str;

  fn to_value(&self) -> Value;

  fn from_value(value: Value) -> Result<Self, ValueError>;
}

fn mismatch<T: ColumnValue>(found: &Value) -> ValueError {
  ValueError::Mismatch { expected: T::KIND, found: found.kind() }
}

impl ColumnValue for String {
  const KIND: &'static str = "text";

  fn to_value(&self) -> Value { Value::Text(self.clone()) }

  fn from_value(value: Value) -> Result<Self, ValueError> {
    match value {
      Value::Text(s) => Ok(s),
      other => Err(mismatch::<Self>(&other)),
    }
  }
}

impl ColumnValue for i64 {
  const KIND: &'static str = "integer";

  fn to_value(&self) -> Value { Value::Integer(*self) }

  fn from_value(value: Value) -> Result<Self, ValueError> {
    match value {
      Value::Integer(i) => Ok(i),
      other => Err(mismatch::<Self>(&other)),
    }
  }
}

impl ColumnValue for i32 {
  const KIND: &'static str = "integer";

  fn to_value(&self) -> Value { Value::Integer(i64::from(*self)) }

  fn from_value(value: Value) -> Result<Self, ValueError> {
    match value {
      Value::Integer(i) => i32::try_from(i).map_err(|_| ValueError::OutOfRange(i)),
      other => Err(mismatch::<Self>(&other)),
    }
  }
}

impl ColumnValue for f64 {
  const KIND: &'static str = "real";

  fn to_value(&self) -> Value { Value::Real(*self) }

  fn from_value(value: Value) -> Result<Self, ValueError> {
    match value {
      Value::Real(r) => Ok(r),
      // SQLite hands back whole-number REALs as integers.
      Value::Integer(i) => Ok(i as f64),
      other => Err(mismatch::<Self>(&other)),
    }
  }
}

impl ColumnValue for DateTime<Utc> {
  const KIND: &'static str = "timestamp";

  fn to_value(&self) -> Value { Value::Timestamp(*self) }

  fn from_value(value: Value) -> Result<Self, ValueError> {
    match value {
      Value::Timestamp(t) => Ok(t),
      Value::Text(s) => DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| ValueError::Timestamp(s)),
      other => Err(mismatch::<Self>(&other)),
    }
  }
}

impl<T: ColumnValue> ColumnValue for Option<T> {
  const KIND: &'static str = T::KIND;

  fn to_value(&self) -> Value {
    match self {
      Some(v) => v.to_value(),
      None => Value::Null,
    }
  }

  fn from_value(value: Value) -> Result<Self, ValueError> {
    match value {
      Value::Null => Ok(None),
      other => T::from_value(other).map(Some),
    }
  }
}
