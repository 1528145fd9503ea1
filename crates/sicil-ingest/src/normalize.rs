//! Walks one scraped record and writes it into the registry schema.
//!
//! Everything here runs synchronously inside a single store transaction:
//! [`normalize`] is handed the open [`StoreTx`] and either returns the full
//! result or an error, in which case the caller's transaction rolls back.
//!
//! Per unit, tables are visited in foreign-key order:
//!
//! 1. lookup values of the company (address, occupation group, status, tax
//!    number)
//! 2. the company itself, merged by UIN
//! 3. contacts
//! 4. former names and their links
//! 5. industries and their links
//! 6. gazette media
//! 7. participants with their links and term end dates
//! 8. the search projection, into the outbox
//!
//! The six participant categories are resolved once per call, before the
//! first unit.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sicil_core::{
  category::ParticipantCategory,
  entity::{Mergeable, NaturalKey, Reference},
  record::{CompanyRecord, MediaEntry, Unit},
  store::StoreTx,
  tables::{
    Address, Company, CompanyFormerName, CompanyIndustry, CompanyMedia,
    CompanyParticipant, ContactFax, ContactPhone, ContactWebsite,
    FormerName, FormerOfficialsDate, Industry, MediaRegDocType,
    MediaTransaction, OccupationGroup, Participant, ParticipantName,
    ParticipantPosition, ParticipantType, Status, TaxNumber,
  },
};

use crate::{
  Result,
  cache::{Holds, Snapshot, Upserted, Write},
  composite::{upsert_linked, upsert_mergeable},
  fields::{CAPITAL, DOCUMENT_NUMBER},
  projection::{PendingProjection, outbox_entry, project},
  reference::upsert_reference,
};

// ─── Output ──────────────────────────────────────────────────────────────────

/// Rows written per table during one call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TableStats {
  pub created: usize,
  pub merged:  usize,
}

/// Per-table write counts, keyed by table name.
pub type WriteStats = BTreeMap<&'static str, TableStats>;

/// A company row touched by the call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedCompany {
  pub id:  i64,
  pub uin: String,
}

/// Everything one [`normalize`] call produced.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Normalized {
  pub companies:     Vec<NormalizedCompany>,
  /// Outbox rows written by this call, one per indexed UIN.
  pub projections:   Vec<PendingProjection>,
  pub stats:         WriteStats,
  /// Units dropped for lacking a UIN.
  pub skipped_units: usize,
}

/// Normalize every unit of `record` through `tx`, stamping new and merged
/// rows with `now`.
pub fn normalize<T: StoreTx>(
  tx: &mut T,
  record: &CompanyRecord,
  now: DateTime<Utc>,
) -> Result<Normalized> {
  let cache = Snapshot::load(tx)?;
  let mut normalizer = Normalizer { tx, cache, now, out: Normalized::default() };

  let categories = normalizer.categories()?;
  for unit in &record.units {
    normalizer.unit(unit, &categories)?;
  }

  Ok(normalizer.out)
}

// ─── Normalizer ──────────────────────────────────────────────────────────────

/// Surrogate ids of the six `participant_types` rows.
struct CategoryIds([i64; 6]);

impl CategoryIds {
  fn get(&self, category: ParticipantCategory) -> i64 { self.0[category as usize] }
}

/// One participant line of a unit, after the presence checks.
struct ParticipantLine<'u> {
  category: ParticipantCategory,
  position: &'u str,
  name:     &'u str,
  capital:  Option<&'u str>,
  end_date: Option<DateTime<Utc>>,
}

struct Normalizer<'a, T> {
  tx:    &'a mut T,
  cache: Snapshot,
  now:   DateTime<Utc>,
  out:   Normalized,
}

impl<T: StoreTx> Normalizer<'_, T> {
  fn count<E: NaturalKey>(&mut self, upserted: Upserted) -> i64 {
    let stats = self.out.stats.entry(E::TABLE).or_default();
    match upserted.write {
      Write::Existing => {}
      Write::Created => stats.created += 1,
      Write::Merged => stats.merged += 1,
    }
    upserted.id
  }

  fn reference<E: Reference>(&mut self, value: &str) -> Result<i64>
  where
    Snapshot: Holds<E>,
  {
    let upserted =
      upsert_reference::<E, _>(self.tx, self.cache.index_mut(), value, self.now)?;
    Ok(self.count::<E>(upserted))
  }

  fn optional_reference<E: Reference>(&mut self, value: Option<&str>) -> Result<Option<i64>>
  where
    Snapshot: Holds<E>,
  {
    value.map(|value| self.reference::<E>(value)).transpose()
  }

  fn link<E: NaturalKey>(&mut self, row: E) -> Result<i64>
  where
    Snapshot: Holds<E>,
  {
    let upserted = upsert_linked::<E, _>(self.tx, self.cache.index_mut(), row)?;
    Ok(self.count::<E>(upserted))
  }

  fn merge<E: Mergeable>(&mut self, row: E) -> Result<i64>
  where
    Snapshot: Holds<E>,
  {
    let upserted = upsert_mergeable::<E, _>(self.tx, self.cache.index_mut(), row)?;
    Ok(self.count::<E>(upserted))
  }

  fn categories(&mut self) -> Result<CategoryIds> {
    let mut ids = [0; 6];
    for category in ParticipantCategory::all() {
      ids[category as usize] = self.reference::<ParticipantType>(category.label())?;
    }
    Ok(CategoryIds(ids))
  }

  fn unit(&mut self, unit: &Unit, categories: &CategoryIds) -> Result<()> {
    let Some(uin) = unit.uin.as_deref().filter(|uin| !uin.is_empty()) else {
      tracing::warn!(name = unit.name.as_deref(), "skipping unit without UIN");
      self.out.skipped_units += 1;
      return Ok(());
    };
    let now = self.now;

    let address_id = self.optional_reference::<Address>(unit.address.as_deref())?;
    let occupation_group_id =
      self.optional_reference::<OccupationGroup>(unit.occupational_group.as_deref())?;
    let status_id = self.optional_reference::<Status>(unit.status.as_deref())?;
    let tax_number_id = self.optional_reference::<TaxNumber>(unit.tax_number.as_deref())?;

    let company_id = self.merge(Company {
      uin: uin.to_owned(),
      chamber_reg_no: unit.chamber_reg_no.clone(),
      central_reg_system_no: unit.central_reg_system_no.clone(),
      name: unit.name.clone().unwrap_or_default(),
      status_id,
      reg_date: unit.reg_date,
      address_id,
      main_contract_reg_date: unit.main_contract_reg_date,
      tax_number_id,
      capital: CAPITAL.parse_opt(unit.capital.as_deref())?,
      occupation_group_id,
      relevance: now,
    })?;
    tracing::debug!(uin, company_id, "company resolved");

    if let Some(contacts) = &unit.contacts {
      if let Some(fax) = &contacts.fax {
        self.link(ContactFax { company_id, fax: fax.clone(), relevance: now })?;
      }
      if let Some(phone) = &contacts.phone {
        self.link(ContactPhone { company_id, phone: phone.clone(), relevance: now })?;
      }
      if let Some(website) = &contacts.website {
        self.link(ContactWebsite { company_id, website: website.clone(), relevance: now })?;
      }
    }

    for name in unit.former_names.iter().filter_map(|e| e.name.as_deref()) {
      let former_name_id = self.reference::<FormerName>(name)?;
      self.link(CompanyFormerName { former_name_id, company_id, relevance: now })?;
    }

    for branch in unit.industries.iter().filter_map(|e| e.branch.as_deref()) {
      let industry_id = self.reference::<Industry>(branch)?;
      self.link(CompanyIndustry { industry_id, company_id, relevance: now })?;
    }

    for media in &unit.media {
      self.media(company_id, media)?;
    }

    for line in participant_lines(unit) {
      self.participant(company_id, categories, line)?;
    }

    self.out.companies.push(NormalizedCompany { id: company_id, uin: uin.to_owned() });

    if let Some(document) = project(unit, uin) {
      let outbox_id = self.merge(outbox_entry(&document, now)?)?;
      let key = document.key();
      self.out.projections.retain(|p| p.key != key);
      self.out.projections.push(PendingProjection { outbox_id, key, document });
    }

    Ok(())
  }

  fn media(&mut self, company_id: i64, media: &MediaEntry) -> Result<()> {
    let (Some(doc_type), Some(transaction), Some(doc_number), Some(reg_history)) = (
      media.reg_doc_type.as_deref(),
      media.transaction.as_deref(),
      media.doc_number.as_deref(),
      media.reg_history,
    ) else {
      tracing::debug!(company_id, "skipping incomplete media entry");
      return Ok(());
    };

    let reg_doc_type_id = self.reference::<MediaRegDocType>(doc_type)?;
    let transaction_id = self.reference::<MediaTransaction>(transaction)?;
    let Some(document_number) = DOCUMENT_NUMBER.parse::<i32>(doc_number)? else {
      return Ok(());
    };

    self.link(CompanyMedia {
      document_number,
      transaction_id,
      reg_doc_type_id,
      company_id,
      reg_history,
      relevance: self.now,
    })?;
    Ok(())
  }

  fn participant(
    &mut self,
    company_id: i64,
    categories: &CategoryIds,
    line: ParticipantLine<'_>,
  ) -> Result<()> {
    let now = self.now;
    let position_id = self.reference::<ParticipantPosition>(line.position)?;
    let name_id = self.reference::<ParticipantName>(line.name)?;

    let participant_id = self.merge(Participant {
      name_id,
      position_id,
      capital: CAPITAL.parse_opt(line.capital)?,
      type_id: categories.get(line.category),
      relevance: now,
    })?;
    self.link(CompanyParticipant { participant_id, company_id, relevance: now })?;

    if let (true, Some(end_date)) = (line.category.is_official(), line.end_date) {
      self.merge(FormerOfficialsDate {
        participant_id,
        end_date: Some(end_date),
        relevance: now,
      })?;
    }
    Ok(())
  }
}

/// Every participant line of `unit` that carries its required fields, in
/// category order. Shareholder lines need position, name and capital;
/// official lines need task and name.
fn participant_lines(unit: &Unit) -> impl Iterator<Item = ParticipantLine<'_>> {
  use ParticipantCategory::*;

  let shareholders = [
    (Partner, &unit.partners),
    (FormerPartner, &unit.former_partners),
    (Director, &unit.director_board),
    (FormerDirector, &unit.former_director_board),
  ]
  .into_iter()
  .flat_map(|(category, entries)| {
    entries.iter().filter_map(move |e| {
      Some(ParticipantLine {
        category,
        position: e.position.as_deref()?,
        name: e.name.as_deref()?,
        capital: Some(e.capital.as_deref()?),
        end_date: None,
      })
    })
  });

  let officials = [(Official, &unit.officials), (FormerOfficial, &unit.former_officials)]
    .into_iter()
    .flat_map(|(category, entries)| {
      entries.iter().filter_map(move |e| {
        Some(ParticipantLine {
          category,
          position: e.task.as_deref()?,
          name: e.name.as_deref()?,
          capital: None,
          end_date: e.end_date,
        })
      })
    });

  shareholders.chain(officials)
}
