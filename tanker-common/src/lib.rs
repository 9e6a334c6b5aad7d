//! # Tanker Common Library
//!
//! Batched resolution of reference fields embedded in JSON records:
//! - Collector engine (registration, aggregation, single fetch, merge-back)
//! - Fetch capability trait and a SQLite-backed implementation
//! - Error types
//! - Configuration loading

pub mod collector;
pub mod config;
#[cfg(feature = "sqlx")]
pub mod db;
pub mod error;

pub use collector::fetch::Fetcher;
pub use collector::normalize::{normalize, NormalizedValue};
pub use collector::types::{IdSet, Identifier, Record, Resolved};
pub use collector::{Batch, Collector, FillReport};
pub use config::CollectorConfig;
pub use error::{Error, Result};
