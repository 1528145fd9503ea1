//! Ingestion tests against the in-memory store, plus an end-to-end run on
//! SQLite.

use std::{
  collections::BTreeMap,
  sync::atomic::{AtomicUsize, Ordering},
};

use chrono::{DateTime, TimeZone, Utc};
use sicil_core::{
  category::ParticipantCategory,
  entity::{Reference, Stored},
  record::{
    CompanyRecord, Contacts, FormerNameEntry, IndustryEntry, MediaEntry,
    OfficialEntry, ShareholderEntry, Unit,
  },
  search::{SearchDocument, SearchIndex},
  source::RecordSource,
  tables::{
    Address, Company, CompanyIndustry, CompanyMedia, CompanyParticipant,
    ContactPhone, FormerOfficialsDate, Industry, Participant,
    ParticipantName, ParticipantPosition, ParticipantType,
    SearchOutboxEntry, Status, TaxNumber,
  },
};
use sicil_store_sqlite::SqliteStore;
use tokio::sync::Notify;

use crate::{
  IngestError, Ingestor,
  cache::{Index, Write},
  composite::upsert_mergeable,
  reference::upsert_reference,
  testing::{MemoryStore, MemoryTx, RecordingIndex, StaticSource, TestError},
};

const INDEX: &str = "companies";

fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
  Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
}

fn shareholder(position: &str, name: &str, capital: &str) -> ShareholderEntry {
  ShareholderEntry {
    position: Some(position.into()),
    name:     Some(name.into()),
    capital:  Some(capital.into()),
  }
}

fn official(task: &str, name: &str, end_date: Option<DateTime<Utc>>) -> OfficialEntry {
  OfficialEntry { task: Some(task.into()), name: Some(name.into()), end_date }
}

fn media(doc_number: &str) -> MediaEntry {
  MediaEntry {
    reg_doc_type: Some("Gazette notice".into()),
    transaction:  Some("Establishment".into()),
    doc_number:   Some(doc_number.into()),
    reg_history:  Some(at(2020, 5, 2)),
  }
}

fn acme_unit() -> Unit {
  Unit {
    uin: Some("1234567890".into()),
    name: Some("Acme AS".into()),
    chamber_reg_no: Some("ITO-77".into()),
    status: Some("active".into()),
    address: Some("Levent, Istanbul".into()),
    tax_number: Some("TAX-1".into()),
    occupational_group: Some("Trade".into()),
    reg_date: Some(at(2020, 5, 1)),
    capital: Some("10000".into()),
    contacts: Some(Contacts {
      fax:     None,
      phone:   Some("+90 212 000 00 00".into()),
      website: Some("acme.example".into()),
    }),
    former_names: vec![FormerNameEntry { name: Some("Acme Ltd".into()) }],
    industries: vec![
      IndustryEntry { branch: Some("Retail".into()) },
      IndustryEntry { branch: Some("Logistics".into()) },
    ],
    media: vec![media("17")],
    partners: vec![shareholder("Partner", "Ali Veli", "500")],
    officials: vec![official("Signatory", "Ayse Yilmaz", None)],
    former_officials: vec![official("Signatory", "Mehmet Kaya", Some(at(2021, 1, 1)))],
    ..Default::default()
  }
}

fn record(units: Vec<Unit>) -> CompanyRecord { CompanyRecord { units } }

fn ingestor(record: CompanyRecord) -> Ingestor<MemoryStore, RecordingIndex, StaticSource> {
  Ingestor::new(
    MemoryStore::default(),
    RecordingIndex::default(),
    StaticSource::new(record),
    INDEX,
  )
}

/// Outbox rows the search index has not yet acknowledged.
fn pending_outbox(rows: &[Stored<SearchOutboxEntry>]) -> usize {
  rows.iter().filter(|stored| stored.row.published_at.is_none()).count()
}

fn id_of<E: Reference>(rows: &[Stored<E>], value: &str) -> i64 {
  rows
    .iter()
    .find(|stored| stored.row.value() == value)
    .map(|stored| stored.id)
    .unwrap_or_else(|| panic!("no row {value:?}"))
}

fn values<E: Reference>(rows: &[Stored<E>]) -> Vec<String> {
  let mut values: Vec<_> = rows.iter().map(|s| s.row.value().to_owned()).collect();
  values.sort();
  values
}

// ─── Engines ─────────────────────────────────────────────────────────────────

#[test]
fn reference_cache_hit_writes_nothing() {
  let mut tx = MemoryTx::default();
  let mut index = Index::<Address>::default();

  let first = upsert_reference(&mut tx, &mut index, "Levent", at(2024, 1, 1)).unwrap();
  let second = upsert_reference(&mut tx, &mut index, "Levent", at(2024, 1, 2)).unwrap();

  assert_eq!(first.write, Write::Created);
  assert_eq!(second.write, Write::Existing);
  assert_eq!(first.id, second.id);
  assert_eq!(tx.writes(), 1);
  assert_eq!(index.len(), 1);
}

#[test]
fn mergeable_row_is_updated_in_place() {
  let mut tx = MemoryTx::default();
  let mut index = Index::<Participant>::default();
  let row = |capital| Participant {
    name_id: 1,
    position_id: 2,
    capital: Some(capital),
    type_id: 3,
    relevance: at(2024, 1, 1),
  };

  let first = upsert_mergeable(&mut tx, &mut index, row(1000.0)).unwrap();
  let second = upsert_mergeable(&mut tx, &mut index, row(1500.0)).unwrap();

  assert_eq!(second.write, Write::Merged);
  assert_eq!(first.id, second.id);
  assert_eq!(index.len(), 1);
  assert_eq!(index.get(&(1_i64, 2_i64, 3_i64)).unwrap().row.capital, Some(1500.0));
}

// ─── Ingestion ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn ingests_company_with_partner_and_projection() {
  let ing = ingestor(record(vec![acme_unit()]));

  let report = ing.ingest("  Acme AS ").await.unwrap();

  assert_eq!(*ing.source().queries.lock().unwrap(), vec!["Acme AS".to_owned()]);
  assert_eq!(report.query, "Acme AS");
  assert_eq!(report.published, vec!["1234567890".to_owned()]);

  let store = ing.store();
  let companies = store.rows::<Company>();
  assert_eq!(companies.len(), 1);
  let company = &companies[0];
  assert_eq!(company.row.uin, "1234567890");
  assert_eq!(company.row.name, "Acme AS");
  assert_eq!(company.row.capital, Some(10000.0));
  assert_eq!(report.companies[0].id, company.id);

  let names = store.rows::<ParticipantName>();
  let types = store.rows::<ParticipantType>();
  let partner = store
    .rows::<Participant>()
    .into_iter()
    .find(|p| p.row.name_id == id_of(&names, "Ali Veli"))
    .unwrap();
  assert_eq!(partner.row.capital, Some(500.0));
  assert_eq!(partner.row.type_id, id_of(&types, ParticipantCategory::Partner.label()));
  assert!(
    store
      .rows::<CompanyParticipant>()
      .iter()
      .any(|l| l.row.participant_id == partner.id && l.row.company_id == company.id)
  );

  let doc = ing.index().get(INDEX, "1234567890").unwrap();
  assert_eq!(doc.uin, 1234567890);
  assert_eq!(doc.name, "Acme AS");
  assert_eq!(doc.registration_date.as_deref(), Some("2020-05-01"));
  assert_eq!(doc.address.as_deref(), Some("Levent, Istanbul"));
  assert_eq!(store.count::<SearchOutboxEntry>(), 1);
  assert_eq!(pending_outbox(&store.rows::<SearchOutboxEntry>()), 0);
}

#[tokio::test]
async fn minimal_record_produces_exactly_the_expected_rows() {
  let unit = Unit {
    uin: Some("1234567890".into()),
    name: Some("Acme AS".into()),
    partners: vec![shareholder("Partner", "Ali Veli", "500")],
    ..Default::default()
  };
  let ing = ingestor(record(vec![unit]));

  ing.ingest("1234567890").await.unwrap();

  let store = ing.store();
  let companies = store.rows::<Company>();
  assert_eq!(companies.len(), 1);
  assert_eq!(companies[0].row.uin, "1234567890");
  assert_eq!(companies[0].row.name, "Acme AS");
  assert_eq!(companies[0].row.address_id, None);
  assert_eq!(values(&store.rows::<ParticipantPosition>()), vec!["Partner"]);
  assert_eq!(values(&store.rows::<ParticipantName>()), vec!["Ali Veli"]);

  let participants = store.rows::<Participant>();
  let types = store.rows::<ParticipantType>();
  assert_eq!(participants.len(), 1);
  assert_eq!(participants[0].row.capital, Some(500.0));
  assert_eq!(participants[0].row.type_id, id_of(&types, "ПАРТНЁР"));
  assert_eq!(store.count::<CompanyParticipant>(), 1);
  assert_eq!(store.count::<Address>(), 0);

  assert_eq!(ing.index().len(), 1);
  let doc = ing.index().get(INDEX, "1234567890").unwrap();
  assert_eq!(doc.registration_date, None);
  assert_eq!(doc.address, None);
}

#[tokio::test]
async fn reingesting_the_same_record_adds_no_rows() {
  let ing = ingestor(record(vec![acme_unit()]));

  ing.ingest("Acme").await.unwrap();
  let rows_after_first = ing.store().total_rows();
  let second = ing.ingest("Acme").await.unwrap();

  assert_eq!(ing.store().total_rows(), rows_after_first);
  for (table, stats) in &second.stats {
    assert_eq!(stats.created, 0, "second run created rows in {table}");
  }
  assert_eq!(ing.store().count::<Company>(), 1);
  assert_eq!(ing.store().count::<ParticipantType>(), 6);
}

#[tokio::test]
async fn lookup_values_are_stored_once() {
  let mut second = acme_unit();
  second.uin = Some("9876543210".into());
  second.name = Some("Beta AS".into());
  second.industries.push(IndustryEntry { branch: Some("Retail".into()) });

  let ing = ingestor(record(vec![acme_unit(), second]));
  ing.ingest("Acme").await.unwrap();

  let store = ing.store();
  assert_eq!(values(&store.rows::<Address>()), vec!["Levent, Istanbul"]);
  assert_eq!(values(&store.rows::<Industry>()), vec!["Logistics", "Retail"]);
  assert_eq!(values(&store.rows::<ParticipantPosition>()), vec!["Partner", "Signatory"]);
  assert_eq!(store.count::<ParticipantName>(), 3);
  assert_eq!(store.count::<ParticipantType>(), 6);
  assert_eq!(store.count::<Company>(), 2);
  // shared participants, one link per company
  assert_eq!(store.count::<Participant>(), 3);
  assert_eq!(store.count::<CompanyParticipant>(), 6);
}

#[tokio::test]
async fn industries_link_to_their_company() {
  let ing = ingestor(record(vec![acme_unit()]));
  ing.ingest("Acme").await.unwrap();

  let store = ing.store();
  let company_id = store.rows::<Company>()[0].id;
  let industries = store.rows::<Industry>();
  let mut linked: Vec<_> = store
    .rows::<CompanyIndustry>()
    .into_iter()
    .inspect(|l| assert_eq!(l.row.company_id, company_id))
    .map(|l| l.row.industry_id)
    .collect();
  linked.sort();

  let mut expected = vec![id_of(&industries, "Retail"), id_of(&industries, "Logistics")];
  expected.sort();
  assert_eq!(linked, expected);
}

#[tokio::test]
async fn participant_capital_follows_latest_sighting() {
  let mut unit = acme_unit();
  unit.director_board = vec![shareholder("Director", "Ahmet Yilmaz", "1000")];
  let ing = ingestor(record(vec![unit.clone()]));
  ing.ingest("Acme").await.unwrap();

  unit.director_board = vec![shareholder("Director", "Ahmet Yilmaz", "1500")];
  ing.source().replace(record(vec![unit]));
  ing.ingest("Acme").await.unwrap();

  let store = ing.store();
  let names = store.rows::<ParticipantName>();
  let types = store.rows::<ParticipantType>();
  let directors: Vec<_> = store
    .rows::<Participant>()
    .into_iter()
    .filter(|p| p.row.name_id == id_of(&names, "Ahmet Yilmaz"))
    .collect();
  assert_eq!(directors.len(), 1);
  assert_eq!(directors[0].row.capital, Some(1500.0));
  assert_eq!(directors[0].row.type_id, id_of(&types, ParticipantCategory::Director.label()));
  assert_eq!(store.count::<CompanyParticipant>(), 4);
}

#[tokio::test]
async fn former_official_end_date_keeps_only_latest() {
  let mut unit = acme_unit();
  let ing = ingestor(record(vec![unit.clone()]));
  ing.ingest("Acme").await.unwrap();

  unit.former_officials = vec![official("Signatory", "Mehmet Kaya", Some(at(2022, 6, 30)))];
  ing.source().replace(record(vec![unit]));
  ing.ingest("Acme").await.unwrap();

  let dates = ing.store().rows::<FormerOfficialsDate>();
  assert_eq!(dates.len(), 1);
  assert_eq!(dates[0].row.end_date, Some(at(2022, 6, 30)));
}

#[tokio::test]
async fn current_and_former_officials_get_distinct_participants() {
  let mut unit = acme_unit();
  unit.officials = vec![official("Signatory", "Mehmet Kaya", None)];
  let ing = ingestor(record(vec![unit]));
  ing.ingest("Acme").await.unwrap();

  let store = ing.store();
  let types = store.rows::<ParticipantType>();
  let mut type_ids: Vec<_> = store
    .rows::<Participant>()
    .into_iter()
    .filter(|p| p.row.capital.is_none())
    .map(|p| p.row.type_id)
    .collect();
  type_ids.sort();

  let mut expected = vec![
    id_of(&types, ParticipantCategory::Official.label()),
    id_of(&types, ParticipantCategory::FormerOfficial.label()),
  ];
  expected.sort();
  assert_eq!(type_ids, expected);

  // the end date hangs off the former official, not the current one
  let former = store
    .rows::<Participant>()
    .into_iter()
    .find(|p| p.row.type_id == id_of(&types, ParticipantCategory::FormerOfficial.label()))
    .unwrap();
  assert_eq!(store.rows::<FormerOfficialsDate>()[0].row.participant_id, former.id);
}

#[tokio::test]
async fn tax_number_and_status_resolve_from_their_own_fields() {
  let ing = ingestor(record(vec![acme_unit()]));
  ing.ingest("Acme").await.unwrap();

  let store = ing.store();
  let taxes = store.rows::<TaxNumber>();
  let statuses = store.rows::<Status>();
  assert_eq!(values(&taxes), vec!["TAX-1"]);
  assert_eq!(values(&statuses), vec!["active"]);

  let company = &store.rows::<Company>()[0].row;
  assert_eq!(company.tax_number_id, Some(id_of(&taxes, "TAX-1")));
  assert_eq!(company.status_id, Some(id_of(&statuses, "active")));
}

#[tokio::test]
async fn contacts_are_deduplicated_per_company() {
  let mut second = acme_unit();
  second.uin = Some("555".into());
  let ing = ingestor(record(vec![acme_unit(), second]));

  ing.ingest("Acme").await.unwrap();
  ing.ingest("Acme").await.unwrap();

  // same phone, two companies
  assert_eq!(ing.store().count::<ContactPhone>(), 2);
}

// ─── Partial input ───────────────────────────────────────────────────────────

#[tokio::test]
async fn incomplete_entries_are_skipped() {
  let mut unit = acme_unit();
  unit.media = vec![MediaEntry { transaction: None, ..media("3") }];
  unit.partners = vec![ShareholderEntry { capital: None, ..shareholder("Partner", "Ali Veli", "") }];
  unit.officials = vec![OfficialEntry { name: None, ..official("Signatory", "", None) }];
  unit.former_officials.clear();
  let nameless = Unit { name: Some("No UIN Ltd".into()), ..Default::default() };

  let ing = ingestor(record(vec![nameless, unit]));
  let report = ing.ingest("Acme").await.unwrap();

  let store = ing.store();
  assert_eq!(report.skipped_units, 1);
  assert_eq!(store.count::<Company>(), 1);
  assert_eq!(store.count::<CompanyMedia>(), 0);
  assert_eq!(store.count::<Participant>(), 0);
  assert_eq!(store.count::<ParticipantType>(), 6);
}

#[tokio::test]
async fn unparseable_capital_is_stored_as_absent() {
  let mut unit = acme_unit();
  unit.capital = Some("on bin".into());
  let ing = ingestor(record(vec![unit]));

  ing.ingest("Acme").await.unwrap();

  assert_eq!(ing.store().rows::<Company>()[0].row.capital, None);
}

#[tokio::test]
async fn unparseable_document_number_aborts_the_ingestion() {
  let mut unit = acme_unit();
  unit.media = vec![media("17"), media("xvii")];
  let ing = ingestor(record(vec![unit]));

  let err = ing.ingest("Acme").await.unwrap_err();

  assert!(matches!(err, IngestError::Parse { field: "docNumber", .. }));
  assert_eq!(ing.store().total_rows(), 0);
  assert_eq!(ing.index().len(), 0);
}

#[tokio::test]
async fn non_numeric_uin_is_persisted_but_not_indexed() {
  let mut unit = acme_unit();
  unit.uin = Some("TR-77".into());
  let ing = ingestor(record(vec![unit]));

  let report = ing.ingest("Acme").await.unwrap();

  assert_eq!(ing.store().count::<Company>(), 1);
  assert!(report.published.is_empty());
  assert_eq!(ing.index().len(), 0);
}

// ─── Failures ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn failure_mid_transaction_rolls_back_everything() {
  let mut unit = acme_unit();
  unit.media = (1..=5).map(|n| media(&n.to_string())).collect();
  let ing = ingestor(record(vec![unit]));
  ing.store().fail_on("company_medias", 5);

  let err = ing.ingest("Acme").await.unwrap_err();

  assert!(matches!(
    err,
    IngestError::Persistence { ref step, .. } if step == "create company_medias"
  ));
  assert_eq!(ing.store().total_rows(), 0);
  assert_eq!(ing.store().commits(), 0);
  assert_eq!(ing.index().len(), 0);

  ing.store().heal();
  ing.ingest("Acme").await.unwrap();
  assert_eq!(ing.store().count::<CompanyMedia>(), 5);
}

#[tokio::test]
async fn fetch_failure_opens_no_transaction() {
  let ing = ingestor(record(vec![acme_unit()]));
  ing.source().down.store(true, Ordering::SeqCst);

  let err = ing.ingest("Acme").await.unwrap_err();

  assert!(matches!(err, IngestError::Fetch { ref query, .. } if query == "Acme"));
  assert_eq!(ing.store().commits(), 0);
}

#[tokio::test]
async fn index_failure_keeps_rows_and_outbox_until_flushed() {
  let ing = ingestor(record(vec![acme_unit()]));
  ing.index().down.store(true, Ordering::SeqCst);

  let err = ing.ingest("Acme").await.unwrap_err();

  assert!(matches!(err, IngestError::IndexSync { ref key, .. } if key == "1234567890"));
  assert_eq!(ing.store().count::<Company>(), 1);
  assert_eq!(pending_outbox(&ing.store().rows::<SearchOutboxEntry>()), 1);

  ing.index().down.store(false, Ordering::SeqCst);
  assert_eq!(ing.flush_outbox().await.unwrap(), 1);
  assert_eq!(pending_outbox(&ing.store().rows::<SearchOutboxEntry>()), 0);
  assert_eq!(ing.index().get(INDEX, "1234567890").unwrap().name, "Acme AS");
  assert_eq!(ing.flush_outbox().await.unwrap(), 0);
}

// ─── Interleaved publishes ───────────────────────────────────────────────────

const ACME_UIN: &str = "1234567890";

/// Serves one record per query. The `"second"` fetch waits for the `"first"`
/// one, so the first ingestion always commits first.
struct OrderedSource {
  records:       BTreeMap<&'static str, CompanyRecord>,
  first_fetched: Notify,
}

impl RecordSource for OrderedSource {
  type Error = TestError;

  async fn fetch(&self, query: &str) -> Result<CompanyRecord, TestError> {
    if query == "second" {
      self.first_fetched.notified().await;
    } else {
      self.first_fetched.notify_one();
    }
    self
      .records
      .get(query)
      .cloned()
      .ok_or_else(|| TestError(format!("no record for {query}")))
  }
}

/// Holds back documents named `held` until a document named `rejected` has
/// been refused, and refuses `rejected` while `rejections` lasts.
struct GatedIndex {
  inner:      RecordingIndex,
  held:       &'static str,
  rejected:   &'static str,
  rejections: AtomicUsize,
  refused:    Notify,
}

impl SearchIndex for GatedIndex {
  type Error = TestError;

  async fn upsert_document(
    &self,
    index: &str,
    key: &str,
    document: &SearchDocument,
  ) -> Result<(), TestError> {
    if document.name == self.rejected
      && self
        .rejections
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
    {
      self.refused.notify_one();
      return Err(TestError("index rejected the document".into()));
    }
    if document.name == self.held {
      self.refused.notified().await;
    }
    self.inner.upsert_document(index, key, document).await
  }
}

fn named(name: &str) -> CompanyRecord {
  record(vec![Unit {
    uin: Some(ACME_UIN.into()),
    name: Some(name.into()),
    ..Default::default()
  }])
}

/// The first ingestion commits "Acme AS", the second rewrites the same outbox
/// row with "Acme Holding AS" and its publish is refused; only then does the
/// first publish land.
fn interleaved(rejections: usize) -> Ingestor<MemoryStore, GatedIndex, OrderedSource> {
  Ingestor::new(
    MemoryStore::default(),
    GatedIndex {
      inner: RecordingIndex::default(),
      held: "Acme AS",
      rejected: "Acme Holding AS",
      rejections: AtomicUsize::new(rejections),
      refused: Notify::new(),
    },
    OrderedSource {
      records:       BTreeMap::from([
        ("first", named("Acme AS")),
        ("second", named("Acme Holding AS")),
      ]),
      first_fetched: Notify::new(),
    },
    INDEX,
  )
}

fn outbox_row(store: &MemoryStore) -> SearchOutboxEntry {
  let rows = store.rows::<SearchOutboxEntry>();
  assert_eq!(rows.len(), 1);
  rows[0].row.clone()
}

#[tokio::test]
async fn older_publish_does_not_acknowledge_a_newer_pending_document() {
  let ing = interleaved(usize::MAX);

  let (first, second) = tokio::join!(ing.ingest("first"), ing.ingest("second"));

  assert!(matches!(second, Err(IngestError::IndexSync { ref key, .. }) if key == ACME_UIN));
  // The first call republishes the newer document it found, which is refused.
  assert!(matches!(first, Err(IngestError::IndexSync { ref key, .. }) if key == ACME_UIN));

  let row = outbox_row(ing.store());
  assert!(row.document.contains("Acme Holding AS"));
  assert_eq!(row.published_at, None);
  assert_eq!(ing.index().inner.get(INDEX, ACME_UIN).unwrap().name, "Acme AS");

  ing.index().rejections.store(0, Ordering::SeqCst);
  assert_eq!(ing.flush_outbox().await.unwrap(), 1);
  assert_eq!(ing.index().inner.get(INDEX, ACME_UIN).unwrap().name, "Acme Holding AS");
  assert!(outbox_row(ing.store()).published_at.is_some());
  assert_eq!(ing.flush_outbox().await.unwrap(), 0);
}

#[tokio::test]
async fn superseded_publish_republishes_the_current_document() {
  let ing = interleaved(1);

  let (first, second) = tokio::join!(ing.ingest("first"), ing.ingest("second"));

  assert!(second.is_err());
  assert_eq!(first.unwrap().published, vec![ACME_UIN.to_owned()]);
  assert_eq!(ing.index().inner.get(INDEX, ACME_UIN).unwrap().name, "Acme Holding AS");

  let row = outbox_row(ing.store());
  assert!(row.document.contains("Acme Holding AS"));
  assert!(row.published_at.is_some());
  assert_eq!(ing.flush_outbox().await.unwrap(), 0);
}

// ─── SQLite ──────────────────────────────────────────────────────────────────

async fn sqlite_ingestor(
  record: CompanyRecord,
) -> Ingestor<SqliteStore, RecordingIndex, StaticSource> {
  Ingestor::new(
    SqliteStore::open_in_memory().await.unwrap(),
    RecordingIndex::default(),
    StaticSource::new(record),
    INDEX,
  )
}

#[tokio::test]
async fn sqlite_ingestion_is_idempotent() {
  let ing = sqlite_ingestor(record(vec![acme_unit()])).await;

  ing.ingest("Acme").await.unwrap();
  ing.ingest("Acme").await.unwrap();

  let store = ing.store();
  assert_eq!(store.count::<Company>().await.unwrap(), 1);
  assert_eq!(store.count::<Participant>().await.unwrap(), 3);
  assert_eq!(store.count::<CompanyParticipant>().await.unwrap(), 3);
  assert_eq!(store.count::<CompanyMedia>().await.unwrap(), 1);
  assert_eq!(store.count::<FormerOfficialsDate>().await.unwrap(), 1);
  assert_eq!(store.count::<ParticipantType>().await.unwrap(), 6);
  assert_eq!(store.count::<SearchOutboxEntry>().await.unwrap(), 1);
  assert_eq!(pending_outbox(&store.rows::<SearchOutboxEntry>().await.unwrap()), 0);

  let types = store.rows::<ParticipantType>().await.unwrap();
  let names = store.rows::<ParticipantName>().await.unwrap();
  let partner = store
    .rows::<Participant>()
    .await
    .unwrap()
    .into_iter()
    .find(|p| p.row.name_id == id_of(&names, "Ali Veli"))
    .unwrap();
  assert_eq!(partner.row.type_id, id_of(&types, "ПАРТНЁР"));
  assert_eq!(partner.row.capital, Some(500.0));
  assert!(ing.index().get(INDEX, "1234567890").is_some());
}

#[tokio::test]
async fn sqlite_rolls_back_on_parse_failure() {
  let mut unit = acme_unit();
  unit.media.push(media("seventeen"));
  let ing = sqlite_ingestor(record(vec![unit])).await;

  assert!(ing.ingest("Acme").await.is_err());

  let store = ing.store();
  assert_eq!(store.count::<Company>().await.unwrap(), 0);
  assert_eq!(store.count::<ParticipantType>().await.unwrap(), 0);
  assert_eq!(store.count::<Address>().await.unwrap(), 0);
}
