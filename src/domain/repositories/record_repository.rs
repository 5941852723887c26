//! Repository trait for url record data access.

use crate::domain::entities::{InsertOutcome, UrlRecord};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for the record store.
///
/// Records are looked up by exact id or exact URL. Both lookups are expected
/// to be index-backed.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgRecordRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryRecordRepository`] - Process-local implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordRepository: Send + Sync {
    /// Returns the largest id across all records, or `None` for an empty store.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on store errors.
    async fn max_id(&self) -> Result<Option<u64>, AppError>;

    /// Finds a record by its id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on store errors.
    async fn find_by_id(&self, id: u64) -> Result<Option<UrlRecord>, AppError>;

    /// Finds a record by its exact URL.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on store errors.
    async fn find_by_url(&self, url: &str) -> Result<Option<UrlRecord>, AppError>;

    /// Writes `record` unless a record with the same URL already exists.
    ///
    /// The check and the write are a single atomic step: concurrent calls for
    /// the same URL produce exactly one [`InsertOutcome::Inserted`], and every
    /// other caller receives the winner as [`InsertOutcome::Existing`].
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the id is already taken by a
    /// different URL.
    /// Returns [`AppError::Internal`] on store errors.
    async fn insert_if_absent(&self, record: UrlRecord) -> Result<InsertOutcome, AppError>;

    /// Counts all records.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on store errors.
    async fn count(&self) -> Result<u64, AppError>;
}
