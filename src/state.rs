//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{RedirectService, ShortenService};
use crate::domain::id_allocator::IdAllocator;
use crate::domain::repositories::RecordRepository;
use crate::infrastructure::cache::CacheService;

/// Handler state. Cloning is cheap; every field is reference counted.
#[derive(Clone)]
pub struct AppState {
    pub shorten_service: Arc<ShortenService<dyn RecordRepository>>,
    pub redirect_service: Arc<RedirectService<dyn RecordRepository>>,
    pub repository: Arc<dyn RecordRepository>,
    pub allocator: Arc<IdAllocator>,
    pub cache: Arc<dyn CacheService>,
    /// Seconds the redirect page waits before following the link.
    pub redirect_delay_seconds: u64,
}

impl AppState {
    /// Wires services around one store, one allocator and one cache.
    pub fn new(
        repository: Arc<dyn RecordRepository>,
        allocator: Arc<IdAllocator>,
        cache: Arc<dyn CacheService>,
        redirect_delay_seconds: u64,
    ) -> Self {
        let shorten_service = Arc::new(ShortenService::new(repository.clone(), allocator.clone()));
        let redirect_service = Arc::new(RedirectService::new(repository.clone(), cache.clone()));

        Self {
            shorten_service,
            redirect_service,
            repository,
            allocator,
            cache,
            redirect_delay_seconds,
        }
    }
}
