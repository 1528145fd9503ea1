//! The nested company record as delivered by the registry scraper.
//!
//! Every scalar is optional and every list may be missing; the normalizer
//! decides which gaps are tolerable. Numeric fields arrive as strings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One scraper reply: every registry unit matching the query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompanyRecord {
  pub units: Vec<Unit>,
}

/// A single registered company as scraped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Unit {
  pub uin:                    Option<String>,
  pub name:                   Option<String>,
  pub chamber_reg_no:         Option<String>,
  pub central_reg_system_no:  Option<String>,
  pub status:                 Option<String>,
  pub address:                Option<String>,
  pub tax_number:             Option<String>,
  pub occupational_group:     Option<String>,
  pub reg_date:               Option<DateTime<Utc>>,
  pub main_contract_reg_date: Option<DateTime<Utc>>,
  /// Decimal string; unparseable values are treated as absent.
  pub capital:                Option<String>,
  pub contacts:               Option<Contacts>,
  pub former_names:           Vec<FormerNameEntry>,
  pub industries:             Vec<IndustryEntry>,
  pub media:                  Vec<MediaEntry>,

  pub partners:               Vec<ShareholderEntry>,
  pub former_partners:        Vec<ShareholderEntry>,
  pub director_board:         Vec<ShareholderEntry>,
  pub former_director_board:  Vec<ShareholderEntry>,
  pub officials:              Vec<OfficialEntry>,
  pub former_officials:       Vec<OfficialEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Contacts {
  pub fax:     Option<String>,
  pub phone:   Option<String>,
  pub website: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormerNameEntry {
  pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IndustryEntry {
  pub branch: Option<String>,
}

/// A registry gazette publication. Skipped unless all four fields are present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MediaEntry {
  pub reg_doc_type: Option<String>,
  pub transaction:  Option<String>,
  /// Decimal string; an unparseable value aborts the ingestion.
  pub doc_number:   Option<String>,
  pub reg_history:  Option<DateTime<Utc>>,
}

/// A partner or board member.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShareholderEntry {
  pub position: Option<String>,
  pub name:     Option<String>,
  pub capital:  Option<String>,
}

/// An authorised official. `task` plays the role of the position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OfficialEntry {
  pub task:     Option<String>,
  pub name:     Option<String>,
  pub end_date: Option<DateTime<Utc>>,
}
