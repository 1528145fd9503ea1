//! Encoding and decoding between core column values and SQLite storage
//! classes.
//!
//! Timestamps are stored as RFC 3339 strings and come back as text; the
//! entity's own field type turns them into `DateTime<Utc>` again.

use rusqlite::types::Value as SqlValue;
use sicil_core::value::Value;

use crate::{Error, Result};

pub fn encode_value(value: Value) -> SqlValue {
  match value {
    Value::Null => SqlValue::Null,
    Value::Integer(i) => SqlValue::Integer(i),
    Value::Real(r) => SqlValue::Real(r),
    Value::Text(s) => SqlValue::Text(s),
    Value::Timestamp(t) => SqlValue::Text(t.to_rfc3339()),
  }
}

pub fn decode_value(table: &'static str, value: SqlValue) -> Result<Value> {
  match value {
    SqlValue::Null => Ok(Value::Null),
    SqlValue::Integer(i) => Ok(Value::Integer(i)),
    SqlValue::Real(r) => Ok(Value::Real(r)),
    SqlValue::Text(s) => Ok(Value::Text(s)),
    SqlValue::Blob(b) => Err(Error::Unsupported {
      table,
      detail: format!("{}-byte blob", b.len()),
    }),
  }
}

/// Quote an identifier so column names that collide with SQL keywords
/// (e.g. `transaction`) are usable.
pub fn quote_ident(name: &str) -> String { format!("\"{name}\"") }
