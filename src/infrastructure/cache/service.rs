//! Cache service trait and error types.

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur during cache operations.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),
    #[error("Cache operation error: {0}")]
    OperationError(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Read-through cache for resolved redirects.
///
/// Records are never updated once written, so an entry keyed by id stays
/// valid for as long as the cache keeps it. Implementations fail open: a
/// broken cache degrades to store lookups instead of failing requests.
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Returns the cached URL for a record id.
    ///
    /// `Ok(None)` means a miss.
    async fn get_url(&self, id: u64) -> CacheResult<Option<String>>;

    /// Stores the URL for a record id.
    ///
    /// `ttl_seconds = None` applies the implementation's default TTL.
    async fn set_url(&self, id: u64, url: &str, ttl_seconds: Option<u64>) -> CacheResult<()>;

    /// Checks if the cache backend is reachable.
    async fn health_check(&self) -> bool;
}
