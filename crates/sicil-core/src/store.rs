//! The relational store contract.
//!
//! The normalizer runs synchronously inside one transaction scope handed out
//! by [`RegistryStore::transaction`]; it touches the store only through the
//! four [`StoreTx`] operations. Backends (e.g. `sicil-store-sqlite`) implement
//! both traits.

use std::future::Future;

use crate::entity::{Entity, Stored};

// ─── Transaction handle ──────────────────────────────────────────────────────

/// Row-level operations available inside an open transaction.
///
/// Nothing written through a `StoreTx` is visible outside the transaction
/// until the enclosing [`RegistryStore::transaction`] call commits.
pub trait StoreTx {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Read every row of `E`'s table. Used only to preload the dedup cache.
  fn scan<E: Entity>(&mut self) -> Result<Vec<Stored<E>>, Self::Error>;

  /// Insert `row` and return its new surrogate id.
  fn create<E: Entity>(&mut self, row: &E) -> Result<i64, Self::Error>;

  /// Overwrite every column of the row with surrogate id `id`.
  fn update<E: Entity>(&mut self, id: i64, row: &E) -> Result<(), Self::Error>;

  /// Remove the row with surrogate id `id`. Missing rows are not an error.
  fn delete<E: Entity>(&mut self, id: i64) -> Result<(), Self::Error>;
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A relational store that hands out scoped transactions.
pub trait RegistryStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  type Tx<'t>: StoreTx<Error = Self::Error>;

  /// Run `f` inside a single transaction.
  ///
  /// If `f` returns `Ok`, the transaction is committed exactly once; if it
  /// returns `Err`, everything it wrote is rolled back and the error is
  /// handed back untouched as the inner result. The outer `Err` is reserved
  /// for the store failing to begin or commit.
  fn transaction<F, T, E>(
    &self,
    f: F,
  ) -> impl Future<Output = Result<Result<T, E>, Self::Error>> + Send + '_
  where
    F: for<'t> FnOnce(&mut Self::Tx<'t>) -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Send + 'static;
}
