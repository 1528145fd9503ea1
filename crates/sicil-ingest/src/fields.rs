//! Parse policies for numeric fields that arrive as strings.

use std::str::FromStr;

use crate::{IngestError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
  /// Log a warning and treat the value as absent.
  Lenient,
  /// Abort the ingestion with [`IngestError::Parse`].
  Strict,
}

/// A numeric field of the scraped record and how malformed values are
/// handled.
#[derive(Debug, Clone, Copy)]
pub struct NumericField {
  pub name:   &'static str,
  pub policy: Policy,
}

/// A number a [`NumericField`] can hold. Non-finite values are treated as
/// unparseable, since the store cannot represent them.
pub trait Numeric: FromStr {
  fn is_finite(&self) -> bool { true }
}

impl Numeric for i32 {}

impl Numeric for i64 {}

impl Numeric for f64 {
  fn is_finite(&self) -> bool { f64::is_finite(*self) }
}

/// Company and participant capital.
pub const CAPITAL: NumericField =
  NumericField { name: "capital", policy: Policy::Lenient };

/// Gazette document number.
pub const DOCUMENT_NUMBER: NumericField =
  NumericField { name: "docNumber", policy: Policy::Strict };

impl NumericField {
  /// Parse `raw` exactly as given, without trimming. `Ok(None)` only ever
  /// comes from a lenient field.
  pub fn parse<N: Numeric>(&self, raw: &str) -> Result<Option<N>> {
    if let Ok(n) = raw.parse::<N>()
      && n.is_finite()
    {
      return Ok(Some(n));
    }

    match self.policy {
      Policy::Lenient => {
        tracing::warn!(field = self.name, value = raw, "unparseable value treated as absent");
        Ok(None)
      }
      Policy::Strict => Err(IngestError::Parse {
        field: self.name,
        value: raw.to_owned(),
      }),
    }
  }

  /// Parse an optional field; absence is never an error.
  pub fn parse_opt<N: Numeric>(&self, raw: Option<&str>) -> Result<Option<N>> {
    Ok(raw.map(|raw| self.parse(raw)).transpose()?.flatten())
  }
}
