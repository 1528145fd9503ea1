//! Row shapes shared by the normalizer and the store backends.
//!
//! An [`Entity`] is one row of one table. Surrogate identities live outside
//! the row, in [`Stored`], so a row built from scraped data and a row read
//! back from the store have the same type.
//!
//! Table definitions are declarative: [`entity!`] derives the column list and
//! value conversions from the struct fields, and [`reference_entity!`]
//! additionally wires up the single-string natural key used by every lookup
//! table.

use std::{fmt::Debug, hash::Hash};

use chrono::{DateTime, Utc};

use crate::{Result, value::Value};

// ─── Traits ──────────────────────────────────────────────────────────────────

/// A persisted row type.
pub trait Entity: Clone + Debug + Send + 'static {
  /// Table name in the relational store.
  const TABLE: &'static str;
  /// Column names in the order produced by [`Entity::values`]. The surrogate
  /// `id` column is implicit and never listed.
  const COLUMNS: &'static [&'static str];

  fn values(&self) -> Vec<Value>;

  fn from_values(values: Vec<Value>) -> Result<Self>;
}

/// An entity with a natural key that is unique across its table.
pub trait NaturalKey: Entity {
  type Key: Eq + Hash + Clone + Debug + Send;

  fn natural_key(&self) -> Self::Key;
}

/// A lookup-table entity identified by a single string value. Immutable once
/// inserted.
pub trait Reference: NaturalKey<Key = String> {
  fn new(value: String, relevance: DateTime<Utc>) -> Self;

  fn value(&self) -> &str;
}

/// An entity whose non-key fields are overwritten on every sighting
/// (last write wins).
pub trait Mergeable: NaturalKey {
  /// Copy the mutable fields of `incoming` onto `self`. Key fields are left
  /// untouched.
  fn merge_from(&mut self, incoming: Self);
}

// ─── Stored ──────────────────────────────────────────────────────────────────

/// A row together with its surrogate identity.
#[derive(Debug, Clone, PartialEq)]
pub struct Stored<E> {
  pub id:  i64,
  pub row: E,
}

// ─── Declaration macros ──────────────────────────────────────────────────────

/// Declare a row struct and its [`Entity`] implementation. Column names are
/// the field names, in declaration order.
macro_rules! entity {
  (
    $(#[$meta:meta])*
    pub struct $name:ident in $table:literal {
      $( $(#[$fmeta:meta])* $field:ident : $ty:ty ),* $(,)?
    }
  ) => {
    $(#[$meta])*
    #[derive(Debug, Clone, PartialEq)]
    pub struct $name {
      $( $(#[$fmeta])* pub $field: $ty, )*
    }

    impl $crate::entity::Entity for $name {
      const TABLE: &'static str = $table;
      const COLUMNS: &'static [&'static str] = &[$( stringify!($field) ),*];

      fn values(&self) -> Vec<$crate::value::Value> {
        vec![$( $crate::value::ColumnValue::to_value(&self.$field) ),*]
      }

      fn from_values(
        values: Vec<$crate::value::Value>,
      ) -> $crate::Result<Self> {
        let mut values = values.into_iter();
        Ok(Self {
          $(
            $field: $crate::value::ColumnValue::from_value(
              values.next().unwrap_or($crate::value::Value::Null),
            )
            .map_err(|source| $crate::Error::Column {
              table: $table,
              column: stringify!($field),
              source,
            })?,
          )*
        })
      }
    }
  };
}

/// Declare a lookup table keyed by one string column, plus a `relevance`
/// timestamp.
macro_rules! reference_entity {
  (
    $(#[$meta:meta])*
    pub struct $name:ident in $table:literal { $field:ident }
  ) => {
    $crate::entity::entity! {
      $(#[$meta])*
      pub struct $name in $table {
        $field: String,
        relevance: ::chrono::DateTime<::chrono::Utc>,
      }
    }

    impl $crate::entity::NaturalKey for $name {
      type Key = String;

      fn natural_key(&self) -> String { self.$field.clone() }
    }

    impl $crate::entity::Reference for $name {
      fn new(value: String, relevance: ::chrono::DateTime<::chrono::Utc>) -> Self {
        Self { $field: value, relevance }
      }

      fn value(&self) -> &str { &self.$field }
    }
  };
}

pub(crate) use entity;
pub(crate) use reference_entity;
