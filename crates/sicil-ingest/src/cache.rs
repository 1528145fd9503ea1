//! The per-ingestion dedup cache.
//!
//! Every table is scanned once at the start of the transaction into an
//! [`Index`] keyed by natural key. From then on existence checks never touch
//! the store; newly created rows are added to the index as they are written,
//! so a value seen twice in one record resolves to the same id. The cache
//! lives exactly as long as one [`crate::normalize`] call.

use std::{borrow::Borrow, collections::HashMap, hash::Hash};

use sicil_core::{
  entity::{NaturalKey, Stored},
  store::StoreTx,
  tables::{
    Address, Company, CompanyFormerName, CompanyIndustry, CompanyMedia,
    CompanyParticipant, ContactFax, ContactPhone, ContactWebsite,
    FormerName, FormerOfficialsDate, Industry, MediaRegDocType,
    MediaTransaction, OccupationGroup, Participant, ParticipantName,
    ParticipantPosition, ParticipantType, SearchOutboxEntry, Status,
    TaxNumber,
  },
};

use crate::{IngestError, Result};

// ─── Upsert outcome ──────────────────────────────────────────────────────────

/// What an upsert did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Write {
  /// The key was already cached; nothing was written.
  Existing,
  /// A new row was inserted.
  Created,
  /// An existing row's mutable fields were overwritten.
  Merged,
}

/// The surrogate id an upsert resolved to, and how.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Upserted {
  pub id:    i64,
  pub write: Write,
}

// ─── Index ───────────────────────────────────────────────────────────────────

/// All rows of one table, keyed by natural key.
#[derive(Debug)]
pub struct Index<E: NaturalKey> {
  rows: HashMap<E::Key, Stored<E>>,
}

impl<E: NaturalKey> Default for Index<E> {
  fn default() -> Self { Self { rows: HashMap::new() } }
}

impl<E: NaturalKey> Index<E> {
  /// Scan `E`'s table through `tx`.
  pub fn load<T: StoreTx>(tx: &mut T) -> Result<Self> {
    let rows = tx
      .scan::<E>()
      .map_err(|e| IngestError::persistence(format!("scan {}", E::TABLE), e))?;
    Ok(rows.into_iter().collect())
  }

  pub fn get<Q>(&self, key: &Q) -> Option<&Stored<E>>
  where
    E::Key: Borrow<Q>,
    Q: Hash + Eq + ?Sized,
  {
    self.rows.get(key)
  }

  pub(crate) fn get_mut(&mut self, key: &E::Key) -> Option<&mut Stored<E>> {
    self.rows.get_mut(key)
  }

  /// Insert `row` through `tx` and record it under its natural key.
  pub(crate) fn persist<T: StoreTx>(&mut self, tx: &mut T, row: E) -> Result<i64> {
    let id = tx
      .create(&row)
      .map_err(|e| IngestError::persistence(format!("create {}", E::TABLE), e))?;
    self.rows.insert(row.natural_key(), Stored { id, row });
    Ok(id)
  }

  pub fn len(&self) -> usize { self.rows.len() }

  pub fn is_empty(&self) -> bool { self.rows.is_empty() }
}

impl<E: NaturalKey> FromIterator<Stored<E>> for Index<E> {
  fn from_iter<I: IntoIterator<Item = Stored<E>>>(iter: I) -> Self {
    let rows = iter
      .into_iter()
      .map(|stored| (stored.row.natural_key(), stored))
      .collect();
    Self { rows }
  }
}

// ─── Snapshot ────────────────────────────────────────────────────────────────

/// Typed access to the [`Index`] for `E` inside a [`Snapshot`].
pub trait Holds<E: NaturalKey> {
  fn index(&self) -> &Index<E>;

  fn index_mut(&mut self) -> &mut Index<E>;
}

macro_rules! snapshot {
  ( $( $field:ident : $entity:ty ),* $(,)? ) => {
    /// One [`Index`] per table of the registry schema.
    #[derive(Debug, Default)]
    pub struct Snapshot {
      $( pub $field: Index<$entity>, )*
    }

    impl Snapshot {
      /// Scan every table through `tx`.
      pub fn load<T: StoreTx>(tx: &mut T) -> Result<Self> {
        Ok(Self { $( $field: Index::load(tx)?, )* })
      }
    }

    $(
      impl Holds<$entity> for Snapshot {
        fn index(&self) -> &Index<$entity> { &self.$field }

        fn index_mut(&mut self) -> &mut Index<$entity> { &mut self.$field }
      }
    )*
  };
}

snapshot! {
  addresses:              Address,
  statuses:               Status,
  tax_numbers:            TaxNumber,
  industries:             Industry,
  former_names:           FormerName,
  occupation_groups:      OccupationGroup,
  media_reg_doc_types:    MediaRegDocType,
  media_transactions:     MediaTransaction,
  participant_names:      ParticipantName,
  participant_positions:  ParticipantPosition,
  participant_types:      ParticipantType,
  companies:              Company,
  participants:           Participant,
  company_former_names:   CompanyFormerName,
  company_industries:     CompanyIndustry,
  company_participants:   CompanyParticipant,
  contacts_faxes:         ContactFax,
  contacts_phones:        ContactPhone,
  contacts_websites:      ContactWebsite,
  company_medias:         CompanyMedia,
  former_officials_dates: FormerOfficialsDate,
  search_outbox:          SearchOutboxEntry,
}
