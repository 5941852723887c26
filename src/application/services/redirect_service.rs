//! Short code resolution service.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, warn};

use crate::domain::repositories::RecordRepository;
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;
use crate::utils::base62;

/// Service that resolves short codes back to their URLs.
pub struct RedirectService<R: RecordRepository + ?Sized> {
    repository: Arc<R>,
    cache: Arc<dyn CacheService>,
}

impl<R: RecordRepository + ?Sized> RedirectService<R> {
    /// Creates a new redirect service.
    pub fn new(repository: Arc<R>, cache: Arc<dyn CacheService>) -> Self {
        Self { repository, cache }
    }

    /// Resolves a short code to the stored URL.
    ///
    /// A code that fails to decode is reported exactly like a code with no
    /// matching record.
    ///
    /// # Cache Strategy
    ///
    /// - **Hit**: returned without touching the store
    /// - **Miss**: store lookup, then the cache is populated
    /// - **Error**: logged, falls back to the store
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code is malformed or unknown.
    /// Returns [`AppError::Internal`] on store errors.
    pub async fn resolve(&self, code: &str) -> Result<String, AppError> {
        let id = base62::decode(code).map_err(|e| {
            debug!("Rejecting short code: {}", e);
            not_found(code)
        })?;

        match self.cache.get_url(id).await {
            Ok(Some(url)) => return Ok(url),
            Ok(None) => {}
            Err(e) => warn!("Cache error, falling back to store: {}", e),
        }

        let record = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found(code))?;

        if let Err(e) = self.cache.set_url(record.id, &record.url, None).await {
            warn!("Failed to cache URL for id {}: {}", record.id, e);
        }

        Ok(record.url)
    }
}

fn not_found(code: &str) -> AppError {
    AppError::not_found(
        format!("Short URL '{}' not found", code),
        json!({ "code": code }),
    )
}
