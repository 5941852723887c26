use shortlink::domain::entities::{InsertOutcome, UrlRecord};
use shortlink::domain::id_allocator::IdAllocator;
use shortlink::domain::repositories::RecordRepository;
use shortlink::infrastructure::persistence::PgRecordRepository;
use sqlx::PgPool;
use std::sync::Arc;

async fn seed(pool: &PgPool, id: i64, url: &str) {
    sqlx::query("INSERT INTO url_records (id, url) VALUES ($1, $2)")
        .bind(id)
        .bind(url)
        .execute(pool)
        .await
        .unwrap();
}

#[sqlx::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_insert_if_absent_inserts(pool: PgPool) {
    let repo = PgRecordRepository::new(Arc::new(pool));

    let outcome = repo
        .insert_if_absent(UrlRecord::new(0, "http://a.example".to_string()))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        InsertOutcome::Inserted(UrlRecord::new(0, "http://a.example".to_string()))
    );
    assert_eq!(repo.count().await.unwrap(), 1);
}

#[sqlx::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_insert_if_absent_returns_existing_record(pool: PgPool) {
    seed(&pool, 4, "http://a.example").await;
    let repo = PgRecordRepository::new(Arc::new(pool));

    let outcome = repo
        .insert_if_absent(UrlRecord::new(5, "http://a.example".to_string()))
        .await
        .unwrap();

    assert_eq!(
        outcome,
        InsertOutcome::Existing(UrlRecord::new(4, "http://a.example".to_string()))
    );
    assert_eq!(repo.count().await.unwrap(), 1);
}

#[sqlx::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_insert_duplicate_id_is_conflict(pool: PgPool) {
    seed(&pool, 7, "http://a.example").await;
    let repo = PgRecordRepository::new(Arc::new(pool));

    let result = repo
        .insert_if_absent(UrlRecord::new(7, "http://b.example".to_string()))
        .await;

    let err = result.unwrap_err();
    assert_eq!(err.status_code(), axum::http::StatusCode::CONFLICT);
}

#[sqlx::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_find_by_id_and_url(pool: PgPool) {
    seed(&pool, 62, "http://a.example").await;
    let repo = PgRecordRepository::new(Arc::new(pool));

    let by_id = repo.find_by_id(62).await.unwrap();
    assert_eq!(by_id.map(|r| r.url), Some("http://a.example".to_string()));

    let by_url = repo.find_by_url("http://a.example").await.unwrap();
    assert_eq!(by_url.map(|r| r.id), Some(62));

    assert!(repo.find_by_id(63).await.unwrap().is_none());
    assert!(repo.find_by_id(u64::MAX).await.unwrap().is_none());
    assert!(repo.find_by_url("http://A.example").await.unwrap().is_none());
}

#[sqlx::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_long_url_round_trips(pool: PgPool) {
    let long_url = format!("https://example.com/{}", "x".repeat(10_000));
    let repo = PgRecordRepository::new(Arc::new(pool));

    repo.insert_if_absent(UrlRecord::new(0, long_url.clone()))
        .await
        .unwrap();

    let found = repo.find_by_url(&long_url).await.unwrap();
    assert_eq!(found.map(|r| r.id), Some(0));
}

#[sqlx::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_max_id(pool: PgPool) {
    let repo = PgRecordRepository::new(Arc::new(pool.clone()));
    assert_eq!(repo.max_id().await.unwrap(), None);

    seed(&pool, 3, "http://a.example").await;
    seed(&pool, 40, "http://b.example").await;

    assert_eq!(repo.max_id().await.unwrap(), Some(40));
}

#[sqlx::test]
#[ignore = "requires PostgreSQL (DATABASE_URL)"]
async fn test_allocator_seeds_from_database(pool: PgPool) {
    seed(&pool, 61, "http://a.example").await;
    let repo = PgRecordRepository::new(Arc::new(pool));

    let allocator = IdAllocator::new();
    allocator.initialize(&repo).await.unwrap();

    assert_eq!(allocator.allocate().unwrap(), 62);
}
