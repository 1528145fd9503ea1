//! In-memory collaborators for the ingestion tests.

use std::{
  collections::BTreeMap,
  sync::{
    Mutex,
    atomic::{AtomicBool, AtomicUsize, Ordering},
  },
};

use sicil_core::{
  entity::{Entity, Stored},
  record::CompanyRecord,
  search::{SearchDocument, SearchIndex},
  source::RecordSource,
  store::{RegistryStore, StoreTx},
  value::Value,
};

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct TestError(pub String);

// ─── Store ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
struct Tables {
  rows:    BTreeMap<&'static str, BTreeMap<i64, Vec<Value>>>,
  next_id: i64,
}

/// Fail the `nth` (1-based) create into `table`.
#[derive(Debug, Clone, Copy)]
pub struct FailPoint {
  pub table: &'static str,
  pub nth:   usize,
}

/// A transactional store over copied-on-begin tables.
#[derive(Debug, Default)]
pub struct MemoryStore {
  committed: Mutex<Tables>,
  fail:      Mutex<Option<FailPoint>>,
  commits:   AtomicUsize,
  writes:    AtomicUsize,
}

impl MemoryStore {
  pub fn fail_on(&self, table: &'static str, nth: usize) {
    *self.fail.lock().unwrap() = Some(FailPoint { table, nth });
  }

  pub fn heal(&self) { *self.fail.lock().unwrap() = None; }

  pub fn rows<E: Entity>(&self) -> Vec<Stored<E>> {
    let committed = self.committed.lock().unwrap();
    committed
      .rows
      .get(E::TABLE)
      .into_iter()
      .flatten()
      .map(|(id, values)| Stored {
        id:  *id,
        row: E::from_values(values.clone()).unwrap(),
      })
      .collect()
  }

  pub fn count<E: Entity>(&self) -> usize { self.rows::<E>().len() }

  /// Total rows across every table.
  pub fn total_rows(&self) -> usize {
    let committed = self.committed.lock().unwrap();
    committed.rows.values().map(BTreeMap::len).sum()
  }

  pub fn commits(&self) -> usize { self.commits.load(Ordering::SeqCst) }

  /// Creates, updates and deletes committed so far.
  pub fn writes(&self) -> usize { self.writes.load(Ordering::SeqCst) }
}

impl RegistryStore for MemoryStore {
  type Error = TestError;
  type Tx<'t> = MemoryTx;

  async fn transaction<F, T, E>(&self, f: F) -> Result<Result<T, E>, TestError>
  where
    F: for<'t> FnOnce(&mut Self::Tx<'t>) -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
  {
    let mut tx = MemoryTx {
      tables:  self.committed.lock().unwrap().clone(),
      fail:    *self.fail.lock().unwrap(),
      creates: BTreeMap::new(),
      writes:  0,
    };

    let result = f(&mut tx);
    if result.is_ok() {
      *self.committed.lock().unwrap() = tx.tables;
      self.commits.fetch_add(1, Ordering::SeqCst);
      self.writes.fetch_add(tx.writes, Ordering::SeqCst);
    }
    Ok(result)
  }
}

#[derive(Debug, Default)]
pub struct MemoryTx {
  tables:  Tables,
  fail:    Option<FailPoint>,
  creates: BTreeMap<&'static str, usize>,
  writes:  usize,
}

impl MemoryTx {
  pub fn writes(&self) -> usize { self.writes }
}

impl StoreTx for MemoryTx {
  type Error = TestError;

  fn scan<E: Entity>(&mut self) -> Result<Vec<Stored<E>>, TestError> {
    self
      .tables
      .rows
      .get(E::TABLE)
      .into_iter()
      .flatten()
      .map(|(id, values)| {
        let row = E::from_values(values.clone()).map_err(|e| TestError(e.to_string()))?;
        Ok(Stored { id: *id, row })
      })
      .collect()
  }

  fn create<E: Entity>(&mut self, row: &E) -> Result<i64, TestError> {
    let count = {
      let count = self.creates.entry(E::TABLE).or_default();
      *count += 1;
      *count
    };
    if self.fail.is_some_and(|fail| fail.table == E::TABLE && fail.nth == count) {
      return Err(TestError(format!("injected failure on {} #{count}", E::TABLE)));
    }

    self.tables.next_id += 1;
    let id = self.tables.next_id;
    self.tables.rows.entry(E::TABLE).or_default().insert(id, row.values());
    self.writes += 1;
    Ok(id)
  }

  fn update<E: Entity>(&mut self, id: i64, row: &E) -> Result<(), TestError> {
    let slot = self
      .tables
      .rows
      .get_mut(E::TABLE)
      .and_then(|rows| rows.get_mut(&id))
      .ok_or_else(|| TestError(format!("no row {id} in {}", E::TABLE)))?;
    *slot = row.values();
    self.writes += 1;
    Ok(())
  }

  fn delete<E: Entity>(&mut self, id: i64) -> Result<(), TestError> {
    if let Some(rows) = self.tables.rows.get_mut(E::TABLE) {
      rows.remove(&id);
    }
    self.writes += 1;
    Ok(())
  }
}

// ─── Source ──────────────────────────────────────────────────────────────────

/// Returns a fixed record, or fails when `down` is set.
#[derive(Debug, Default)]
pub struct StaticSource {
  pub record:  Mutex<CompanyRecord>,
  pub down:    AtomicBool,
  pub queries: Mutex<Vec<String>>,
}

impl StaticSource {
  pub fn new(record: CompanyRecord) -> Self {
    Self { record: Mutex::new(record), ..Default::default() }
  }

  pub fn replace(&self, record: CompanyRecord) { *self.record.lock().unwrap() = record; }
}

impl RecordSource for StaticSource {
  type Error = TestError;

  async fn fetch(&self, name_or_uin: &str) -> Result<CompanyRecord, TestError> {
    self.queries.lock().unwrap().push(name_or_uin.to_owned());
    if self.down.load(Ordering::SeqCst) {
      return Err(TestError("scraper unreachable".into()));
    }
    Ok(self.record.lock().unwrap().clone())
  }
}

// ─── Search index ────────────────────────────────────────────────────────────

/// Remembers the last document per `(index, key)`, or rejects everything
/// when `down` is set.
#[derive(Debug, Default)]
pub struct RecordingIndex {
  pub documents: Mutex<BTreeMap<(String, String), SearchDocument>>,
  pub down:      AtomicBool,
}

impl RecordingIndex {
  pub fn get(&self, index: &str, key: &str) -> Option<SearchDocument> {
    self
      .documents
      .lock()
      .unwrap()
      .get(&(index.to_owned(), key.to_owned()))
      .cloned()
  }

  pub fn len(&self) -> usize { self.documents.lock().unwrap().len() }
}

impl SearchIndex for RecordingIndex {
  type Error = TestError;

  async fn upsert_document(
    &self,
    index: &str,
    key: &str,
    document: &SearchDocument,
  ) -> Result<(), TestError> {
    if self.down.load(Ordering::SeqCst) {
      return Err(TestError("index unavailable".into()));
    }
    self
      .documents
      .lock()
      .unwrap()
      .insert((index.to_owned(), key.to_owned()), document.clone());
    Ok(())
  }
}
