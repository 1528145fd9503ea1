//! Upserts for rows keyed by a tuple of foreign keys and scalars.
//!
//! Two flavours: [`upsert_linked`] for rows whose every field is part of the
//! identity (junction rows, contacts, media), and [`upsert_mergeable`] for
//! rows whose non-key fields follow the latest sighting (companies,
//! participants, term end dates, outbox entries).

use sicil_core::{
  entity::{Mergeable, NaturalKey},
  store::StoreTx,
};

use crate::{
  IngestError, Result,
  cache::{Index, Upserted, Write},
};

/// Insert `row` unless a row with the same natural key is already cached.
pub fn upsert_linked<E: NaturalKey, T: StoreTx>(
  tx: &mut T,
  index: &mut Index<E>,
  row: E,
) -> Result<Upserted> {
  if let Some(existing) = index.get(&row.natural_key()) {
    return Ok(Upserted { id: existing.id, write: Write::Existing });
  }

  let id = index.persist(tx, row)?;
  Ok(Upserted { id, write: Write::Created })
}

/// Insert `row`, or overwrite the mutable fields of the cached row with the
/// same natural key. Repeated sightings never add rows.
pub fn upsert_mergeable<E: Mergeable, T: StoreTx>(
  tx: &mut T,
  index: &mut Index<E>,
  row: E,
) -> Result<Upserted> {
  if let Some(existing) = index.get_mut(&row.natural_key()) {
    existing.row.merge_from(row);
    tx.update(existing.id, &existing.row)
      .map_err(|e| IngestError::persistence(format!("update {}", E::TABLE), e))?;
    return Ok(Upserted { id: existing.id, write: Write::Merged });
  }

  let id = index.persist(tx, row)?;
  Ok(Upserted { id, write: Write::Created })
}
