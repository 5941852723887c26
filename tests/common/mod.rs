#![allow(dead_code)]

use axum::ServiceExt;
use axum::extract::Request;
use axum_test::TestServer;
use shortlink::domain::entities::UrlRecord;
use shortlink::domain::id_allocator::IdAllocator;
use shortlink::infrastructure::cache::NullCache;
use shortlink::infrastructure::persistence::InMemoryRecordRepository;
use shortlink::routes::app_router;
use shortlink::state::AppState;
use std::sync::Arc;

pub const REDIRECT_DELAY_SECONDS: u64 = 3;

/// State over an in-memory store whose allocator has been seeded.
pub async fn create_test_state(records: Vec<UrlRecord>) -> AppState {
    let repository = Arc::new(InMemoryRecordRepository::with_records(records));
    let allocator = Arc::new(IdAllocator::new());
    allocator.initialize(repository.as_ref()).await.unwrap();

    AppState::new(
        repository,
        allocator,
        Arc::new(NullCache::new()),
        REDIRECT_DELAY_SECONDS,
    )
}

/// State whose allocator was never seeded.
pub fn create_unready_state() -> AppState {
    AppState::new(
        Arc::new(InMemoryRecordRepository::new()),
        Arc::new(IdAllocator::new()),
        Arc::new(NullCache::new()),
        REDIRECT_DELAY_SECONDS,
    )
}

/// Serves the production router, middleware included.
pub fn make_server(state: AppState) -> TestServer {
    let app = ServiceExt::<Request>::into_make_service(app_router(state));

    TestServer::new(app).unwrap()
}
