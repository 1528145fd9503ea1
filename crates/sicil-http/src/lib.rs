//! HTTP collaborators: the registry scraper and the search index.
//!
//! Both clients are cheap to clone; the inner [`reqwest::Client`] is
//! `Arc`-based.

pub mod error;
pub mod scraper;
pub mod search;

pub use error::{Error, Result};
pub use scraper::{ScraperClient, ScraperConfig};
pub use search::{SearchClient, SearchConfig};
