//! Core domain entities.
//!
//! - [`UrlRecord`] - A persisted id to URL mapping
//! - [`InsertOutcome`] - Result of an insert-if-absent write

pub mod url_record;

pub use url_record::{InsertOutcome, UrlRecord};
