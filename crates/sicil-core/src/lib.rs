//! Core types and trait definitions for the sicil company-registry ingester.
//!
//! This crate is deliberately free of HTTP and database dependencies. The
//! normalizer depends on the traits defined here; storage, search and scraper
//! backends implement them.

pub mod category;
pub mod entity;
pub mod error;
pub mod record;
pub mod search;
pub mod source;
pub mod store;
pub mod tables;
pub mod value;

pub use error::{Error, Result, ValueError};
