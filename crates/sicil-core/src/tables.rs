//! Every table of the normalized registry schema.
//!
//! Lookup tables come first, then the company aggregate, junction rows,
//! contacts, media facts, participant history and the search outbox.

use chrono::{DateTime, Utc};

use crate::entity::{Mergeable, NaturalKey, entity, reference_entity};

// ─── Lookup tables ───────────────────────────────────────────────────────────

reference_entity! {
  /// A registered business address.
  pub struct Address in "addresses" { address }
}

reference_entity! {
  /// Company registration status, e.g. "active" or "in liquidation".
  pub struct Status in "statuses" { status }
}

reference_entity! {
  pub struct TaxNumber in "tax_numbers" { tax_number }
}

reference_entity! {
  pub struct Industry in "industries" { industry }
}

reference_entity! {
  pub struct FormerName in "former_names" { former_name }
}

reference_entity! {
  /// Chamber occupation group.
  pub struct OccupationGroup in "occupation_groups" { occupation_group }
}

reference_entity! {
  /// Registry gazette document type.
  pub struct MediaRegDocType in "media_reg_doc_types" { reg_doc_type }
}

reference_entity! {
  /// Registry gazette transaction kind.
  pub struct MediaTransaction in "media_transactions" { transaction }
}

reference_entity! {
  pub struct ParticipantName in "participant_names" { name }
}

reference_entity! {
  pub struct ParticipantPosition in "participant_positions" { position }
}

reference_entity! {
  /// Participant category label (partner, director, ...); see
  /// [`crate::category::ParticipantCategory`].
  pub struct ParticipantType in "participant_types" { status }
}

// ─── Company aggregate ───────────────────────────────────────────────────────

entity! {
  /// The aggregate root, keyed by registry UIN. Every other field is
  /// overwritten with the latest scraped value on each sighting.
  pub struct Company in "companies" {
    uin: String,
    chamber_reg_no: Option<String>,
    central_reg_system_no: Option<String>,
    name: String,
    status_id: Option<i64>,
    reg_date: Option<DateTime<Utc>>,
    address_id: Option<i64>,
    main_contract_reg_date: Option<DateTime<Utc>>,
    tax_number_id: Option<i64>,
    capital: Option<f64>,
    occupation_group_id: Option<i64>,
    relevance: DateTime<Utc>,
  }
}

impl NaturalKey for Company {
  type Key = String;

  fn natural_key(&self) -> String { self.uin.clone() }
}

impl Mergeable for Company {
  fn merge_from(&mut self, incoming: Self) {
    let uin = std::mem::take(&mut self.uin);
    *self = Self { uin, ..incoming };
  }
}

entity! {
  /// A person or organisation holding a position in some company. Name,
  /// position and type are the identity; only capital and relevance change.
  pub struct Participant in "participants" {
    name_id: i64,
    position_id: i64,
    capital: Option<f64>,
    type_id: i64,
    relevance: DateTime<Utc>,
  }
}

impl NaturalKey for Participant {
  type Key = (i64, i64, i64);

  fn natural_key(&self) -> Self::Key {
    (self.name_id, self.position_id, self.type_id)
  }
}

impl Mergeable for Participant {
  fn merge_from(&mut self, incoming: Self) {
    self.capital = incoming.capital;
    self.relevance = incoming.relevance;
  }
}

// ─── Junction rows ───────────────────────────────────────────────────────────

entity! {
  pub struct CompanyFormerName in "company_former_names" {
    former_name_id: i64,
    company_id: i64,
    relevance: DateTime<Utc>,
  }
}

impl NaturalKey for CompanyFormerName {
  type Key = (i64, i64);

  fn natural_key(&self) -> Self::Key { (self.former_name_id, self.company_id) }
}

entity! {
  pub struct CompanyIndustry in "company_industries" {
    industry_id: i64,
    company_id: i64,
    relevance: DateTime<Utc>,
  }
}

impl NaturalKey for CompanyIndustry {
  type Key = (i64, i64);

  fn natural_key(&self) -> Self::Key { (self.industry_id, self.company_id) }
}

entity! {
  pub struct CompanyParticipant in "company_participants" {
    participant_id: i64,
    company_id: i64,
    relevance: DateTime<Utc>,
  }
}

impl NaturalKey for CompanyParticipant {
  type Key = (i64, i64);

  fn natural_key(&self) -> Self::Key { (self.participant_id, self.company_id) }
}

// ─── Contacts ────────────────────────────────────────────────────────────────

entity! {
  pub struct ContactFax in "contacts_faxes" {
    company_id: i64,
    fax: String,
    relevance: DateTime<Utc>,
  }
}

impl NaturalKey for ContactFax {
  type Key = (i64, String);

  fn natural_key(&self) -> Self::Key { (self.company_id, self.fax.clone()) }
}

entity! {
  pub struct ContactPhone in "contacts_phones" {
    company_id: i64,
    phone: String,
    relevance: DateTime<Utc>,
  }
}

impl NaturalKey for ContactPhone {
  type Key = (i64, String);

  fn natural_key(&self) -> Self::Key { (self.company_id, self.phone.clone()) }
}

entity! {
  pub struct ContactWebsite in "contacts_websites" {
    company_id: i64,
    website: String,
    relevance: DateTime<Utc>,
  }
}

impl NaturalKey for ContactWebsite {
  type Key = (i64, String);

  fn natural_key(&self) -> Self::Key { (self.company_id, self.website.clone()) }
}

// ─── Media ───────────────────────────────────────────────────────────────────

entity! {
  /// A registry gazette publication concerning a company.
  pub struct CompanyMedia in "company_medias" {
    document_number: i32,
    transaction_id: i64,
    reg_doc_type_id: i64,
    company_id: i64,
    reg_history: DateTime<Utc>,
    relevance: DateTime<Utc>,
  }
}

impl NaturalKey for CompanyMedia {
  type Key = (i32, i64, i64, i64, DateTime<Utc>);

  fn natural_key(&self) -> Self::Key {
    (
      self.document_number,
      self.transaction_id,
      self.reg_doc_type_id,
      self.company_id,
      self.reg_history,
    )
  }
}

// ─── Participant history ─────────────────────────────────────────────────────

entity! {
  /// End of an official's term. At most one row per participant: a later
  /// sighting replaces the stored end date instead of adding history.
  pub struct FormerOfficialsDate in "former_officials_dates" {
    participant_id: i64,
    end_date: Option<DateTime<Utc>>,
    relevance: DateTime<Utc>,
  }
}

impl NaturalKey for FormerOfficialsDate {
  type Key = i64;

  fn natural_key(&self) -> i64 { self.participant_id }
}

impl Mergeable for FormerOfficialsDate {
  fn merge_from(&mut self, incoming: Self) {
    self.end_date = incoming.end_date;
    self.relevance = incoming.relevance;
  }
}

// ─── Search outbox ───────────────────────────────────────────────────────────

entity! {
  /// The latest search document committed for one key, alongside the
  /// relational rows.
  pub struct SearchOutboxEntry in "search_outbox" {
    document_key: String,
    /// JSON-encoded [`crate::search::SearchDocument`].
    document: String,
    relevance: DateTime<Utc>,
    /// Set once the search index has accepted exactly this `document`;
    /// `None` while it is pending.
    published_at: Option<DateTime<Utc>>,
  }
}

impl NaturalKey for SearchOutboxEntry {
  type Key = String;

  fn natural_key(&self) -> String { self.document_key.clone() }
}

impl Mergeable for SearchOutboxEntry {
  fn merge_from(&mut self, incoming: Self) {
    self.document = incoming.document;
    self.relevance = incoming.relevance;
    self.published_at = incoming.published_at;
  }
}
