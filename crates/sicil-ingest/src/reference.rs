//! Find-or-create for lookup tables.

use chrono::{DateTime, Utc};
use sicil_core::{entity::Reference, store::StoreTx};

use crate::{
  Result,
  cache::{Index, Upserted, Write},
};

/// Resolve `value` to the id of its row in `E`'s table, inserting the row
/// with `relevance = now` if the value has never been seen.
///
/// A cache hit writes nothing. Lookup rows are never updated afterwards, so
/// the relevance of an existing value keeps the time it was first seen.
pub fn upsert_reference<E: Reference, T: StoreTx>(
  tx: &mut T,
  index: &mut Index<E>,
  value: &str,
  now: DateTime<Utc>,
) -> Result<Upserted> {
  if let Some(existing) = index.get(value) {
    return Ok(Upserted { id: existing.id, write: Write::Existing });
  }

  let id = index.persist(tx, E::new(value.to_owned(), now))?;
  tracing::trace!(table = E::TABLE, id, value, "created lookup row");
  Ok(Upserted { id, write: Write::Created })
}
