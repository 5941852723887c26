//! Url record entity representing an id to URL mapping.

use serde_json::json;

use crate::error::AppError;
use crate::utils::base62;

/// A persisted mapping from a sequential id to the URL it was issued for.
///
/// The URL is kept exactly as submitted; no normalization is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlRecord {
    pub id: u64,
    pub url: String,
}

impl UrlRecord {
    /// Creates a new UrlRecord instance.
    pub fn new(id: u64, url: String) -> Self {
        Self { id, url }
    }

    /// Builds a record from a raw store row.
    ///
    /// The store column is a signed `BIGINT`; rows with a negative id are
    /// rejected instead of being reinterpreted.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if `id` is negative.
    pub fn from_row(id: i64, url: String) -> Result<Self, AppError> {
        let id = u64::try_from(id).map_err(|_| {
            AppError::internal(
                "Store returned an invalid record",
                json!({ "id": id, "reason": "negative id" }),
            )
        })?;

        Ok(Self { id, url })
    }

    /// Returns the base-62 short code for this record.
    pub fn code(&self) -> String {
        base62::encode(self.id)
    }
}

/// Outcome of an insert-if-absent write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The record was written with the requested id.
    Inserted(UrlRecord),
    /// A record for the same URL already existed; nothing was written.
    Existing(UrlRecord),
}
