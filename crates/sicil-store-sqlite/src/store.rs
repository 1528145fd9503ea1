//! [`SqliteStore`]: the SQLite implementation of [`RegistryStore`].

use std::path::Path;

use rusqlite::types::Value as SqlValue;
use sicil_core::{
  entity::{Entity, Stored},
  store::{RegistryStore, StoreTx},
};

use crate::{
  Result,
  encode::{decode_value, encode_value, quote_ident},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A registry store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Every committed row of `E`'s table.
  pub async fn rows<E: Entity>(&self) -> Result<Vec<Stored<E>>> {
    self.transaction(|tx| tx.scan::<E>()).await?
  }

  /// Number of committed rows in `E`'s table.
  pub async fn count<E: Entity>(&self) -> Result<usize> {
    let sql = format!("SELECT COUNT(*) FROM {}", E::TABLE);
    let count: i64 = self
      .conn
      .call(move |conn| Ok(conn.query_row(&sql, [], |row| row.get(0))?))
      .await?;
    Ok(usize::try_from(count).unwrap_or_default())
  }
}

// ─── RegistryStore impl ──────────────────────────────────────────────────────

impl RegistryStore for SqliteStore {
  type Error = crate::Error;
  type Tx<'t> = SqliteTx<'t>;

  async fn transaction<F, T, E>(&self, f: F) -> Result<std::result::Result<T, E>>
  where
    F: for<'t> FnOnce(&mut Self::Tx<'t>) -> std::result::Result<T, E>
      + Send
      + 'static,
    T: Send + 'static,
    E: Send + 'static,
  {
    let outcome = self
      .conn
      .call(move |conn| {
        let mut handle = SqliteTx { tx: conn.transaction()? };
        let result = f(&mut handle);
        match result {
          Ok(_) => handle.tx.commit()?,
          Err(_) => handle.tx.rollback()?,
        }
        Ok(result)
      })
      .await?;
    Ok(outcome)
  }
}

// ─── Transaction handle ──────────────────────────────────────────────────────

/// An open SQLite transaction. Only [`SqliteStore::transaction`] creates one.
pub struct SqliteTx<'t> {
  tx: rusqlite::Transaction<'t>,
}

fn column_list(columns: &[&str]) -> String {
  columns
    .iter()
    .map(|c| quote_ident(c))
    .collect::<Vec<_>>()
    .join(", ")
}

impl StoreTx for SqliteTx<'_> {
  type Error = crate::Error;

  fn scan<E: Entity>(&mut self) -> Result<Vec<Stored<E>>> {
    let width = E::COLUMNS.len();
    let sql = format!("SELECT id, {} FROM {}", column_list(E::COLUMNS), E::TABLE);

    let mut stmt = self.tx.prepare_cached(&sql)?;
    let raws = stmt
      .query_map([], |row| {
        let id: i64 = row.get(0)?;
        let values = (1..=width)
          .map(|i| row.get::<_, SqlValue>(i))
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok((id, values))
      })?
      .collect::<rusqlite::Result<Vec<_>>>()?;

    raws
      .into_iter()
      .map(|(id, values)| {
        let values = values
          .into_iter()
          .map(|v| decode_value(E::TABLE, v))
          .collect::<Result<Vec<_>>>()?;
        Ok(Stored { id, row: E::from_values(values)? })
      })
      .collect()
  }

  fn create<E: Entity>(&mut self, row: &E) -> Result<i64> {
    let placeholders = (1..=E::COLUMNS.len())
      .map(|i| format!("?{i}"))
      .collect::<Vec<_>>()
      .join(", ");
    let sql = format!(
      "INSERT INTO {} ({}) VALUES ({placeholders})",
      E::TABLE,
      column_list(E::COLUMNS),
    );

    let params = row.values().into_iter().map(encode_value);
    self
      .tx
      .prepare_cached(&sql)?
      .execute(rusqlite::params_from_iter(params))?;
    Ok(self.tx.last_insert_rowid())
  }

  fn update<E: Entity>(&mut self, id: i64, row: &E) -> Result<()> {
    let assignments = E::COLUMNS
      .iter()
      .enumerate()
      .map(|(i, c)| format!("{} = ?{}", quote_ident(c), i + 1))
      .collect::<Vec<_>>()
      .join(", ");
    let sql = format!(
      "UPDATE {} SET {assignments} WHERE id = ?{}",
      E::TABLE,
      E::COLUMNS.len() + 1,
    );

    let params = row
      .values()
      .into_iter()
      .map(encode_value)
      .chain(std::iter::once(SqlValue::Integer(id)));
    self
      .tx
      .prepare_cached(&sql)?
      .execute(rusqlite::params_from_iter(params))?;
    Ok(())
  }

  fn delete<E: Entity>(&mut self, id: i64) -> Result<()> {
    let sql = format!("DELETE FROM {} WHERE id = ?1", E::TABLE);
    self.tx.prepare_cached(&sql)?.execute(rusqlite::params![id])?;
    Ok(())
  }
}
