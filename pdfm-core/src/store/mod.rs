//! Document storage
//!
//! A small document store: typed in-memory collections queried by predicate,
//! with optional JSON snapshot persistence. Last write wins.

mod collection;
mod database;

pub use collection::{Collection, Guarded};
pub use database::Database;
