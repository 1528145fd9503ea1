//! The six fixed participant categories.
//!
//! Each category is persisted once per ingestion as a
//! [`ParticipantType`](crate::tables::ParticipantType) row whose value is the
//! registry's own label; participants reference that row as their type.

use strum::{EnumIter, IntoEnumIterator as _, IntoStaticStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, IntoStaticStr)]
pub enum ParticipantCategory {
  #[strum(serialize = "ПАРТНЁР")]
  Partner,
  #[strum(serialize = "БЫВШИЙ ПАРТНЁР")]
  FormerPartner,
  #[strum(serialize = "ДИРЕКТОР")]
  Director,
  #[strum(serialize = "БЫВШИЙ ДИРЕКТОР")]
  FormerDirector,
  #[strum(serialize = "УПОЛНОМОЧЕННОЕ ЛИЦО")]
  Official,
  #[strum(serialize = "БЫВШЕЕ УПОЛНОМОЧЕННОЕ ЛИЦО")]
  FormerOfficial,
}

impl ParticipantCategory {
  /// The label stored in `participant_types.status`.
  pub fn label(self) -> &'static str { self.into() }

  /// All categories in registration order.
  pub fn all() -> impl Iterator<Item = Self> { Self::iter() }

  /// Officials carry an optional end-of-term date instead of capital.
  pub fn is_official(self) -> bool {
    matches!(self, Self::Official | Self::FormerOfficial)
  }
}
