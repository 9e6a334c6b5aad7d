//! SQLite-backed fetch capability
//!
//! Resolves identifiers against one table of a SQLite database, turning each
//! row into a JSON record.

pub mod connect;
pub mod fetcher;
pub mod rows;

pub use connect::*;
pub use fetcher::SqliteFetcher;
pub use rows::{is_valid_name, row_to_record};
