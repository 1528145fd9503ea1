//! The upstream fetch collaborator.

use std::future::Future;

use crate::record::CompanyRecord;

/// Fetches the nested registry record for a company name or registry id.
pub trait RecordSource: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn fetch<'a>(
    &'a self,
    name_or_uin: &'a str,
  ) -> impl Future<Output = Result<CompanyRecord, Self::Error>> + Send + 'a;
}
