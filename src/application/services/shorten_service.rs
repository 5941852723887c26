//! Find-or-create service for submitted URLs.

use std::sync::Arc;

use serde::Serialize;
use serde_json::json;

use crate::domain::entities::{InsertOutcome, UrlRecord};
use crate::domain::id_allocator::IdAllocator;
use crate::domain::repositories::RecordRepository;
use crate::error::AppError;

/// Whether a shorten call created a record or found one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ShortenStatus {
    Existing,
    Inserted,
}

/// Result of [`ShortenService::shorten`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortened {
    pub status: ShortenStatus,
    pub record: UrlRecord,
}

/// Service that maps a URL to exactly one record id.
///
/// URLs are compared byte for byte; no normalization is applied.
pub struct ShortenService<R: RecordRepository + ?Sized> {
    repository: Arc<R>,
    allocator: Arc<IdAllocator>,
}

impl<R: RecordRepository + ?Sized> ShortenService<R> {
    /// Creates a new shorten service.
    pub fn new(repository: Arc<R>, allocator: Arc<IdAllocator>) -> Self {
        Self {
            repository,
            allocator,
        }
    }

    /// Returns the record for `url`, creating it if needed.
    ///
    /// # Flow
    ///
    /// 1. Reject an empty URL
    /// 2. Fail fast if the allocator has not been seeded
    /// 3. Return the existing record when the URL is already stored
    /// 4. Otherwise allocate an id and insert-if-absent
    ///
    /// When a concurrent call stores the same URL between steps 3 and 4, the
    /// store reports the winner and this call returns it as
    /// [`ShortenStatus::Existing`]. The id allocated here is then skipped.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `url` is empty.
    /// Returns [`AppError::NotReady`] if the allocator is not initialized.
    /// Returns [`AppError::Conflict`] if the allocated id is already taken.
    /// Returns [`AppError::Internal`] on store errors.
    pub async fn shorten(&self, url: &str) -> Result<Shortened, AppError> {
        if url.is_empty() {
            return Err(AppError::bad_request(
                "Parameter 'longUrl' not specified",
                json!({ "field": "longUrl" }),
            ));
        }

        if !self.allocator.is_ready() {
            return Err(AppError::not_ready(
                "Sorry, database not ready yet, please try again later",
                json!({}),
            ));
        }

        if let Some(record) = self.repository.find_by_url(url).await? {
            tracing::debug!(id = record.id, "URL already shortened");
            return Ok(Shortened {
                status: ShortenStatus::Existing,
                record,
            });
        }

        let id = self.allocator.allocate()?;

        match self
            .repository
            .insert_if_absent(UrlRecord::new(id, url.to_string()))
            .await?
        {
            InsertOutcome::Inserted(record) => {
                tracing::info!(id = record.id, "Record inserted");
                Ok(Shortened {
                    status: ShortenStatus::Inserted,
                    record,
                })
            }
            InsertOutcome::Existing(record) => {
                tracing::info!(
                    id = record.id,
                    skipped_id = id,
                    "URL stored concurrently, allocated id skipped"
                );
                Ok(Shortened {
                    status: ShortenStatus::Existing,
                    record,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockRecordRepository;
    use crate::infrastructure::persistence::InMemoryRecordRepository;
    use crate::utils::base62;

    fn ready_allocator(next: u64) -> Arc<IdAllocator> {
        let allocator = IdAllocator::new();
        allocator.seed(next);
        Arc::new(allocator)
    }

    async fn in_memory_service() -> ShortenService<InMemoryRecordRepository> {
        let repo = Arc::new(InMemoryRecordRepository::new());
        let allocator = Arc::new(IdAllocator::new());
        allocator.initialize(repo.as_ref()).await.unwrap();
        ShortenService::new(repo, allocator)
    }

    #[tokio::test]
    async fn test_shorten_empty_url_rejected() {
        let mut mock_repo = MockRecordRepository::new();
        mock_repo.expect_find_by_url().times(0);
        mock_repo.expect_insert_if_absent().times(0);

        let service = ShortenService::new(Arc::new(mock_repo), ready_allocator(0));

        let result = service.shorten("").await;

        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_shorten_not_ready() {
        let mut mock_repo = MockRecordRepository::new();
        mock_repo.expect_find_by_url().times(0);

        let service = ShortenService::new(Arc::new(mock_repo), Arc::new(IdAllocator::new()));

        let result = service.shorten("http://a.example").await;

        assert!(matches!(result, Err(AppError::NotReady { .. })));
    }

    #[tokio::test]
    async fn test_shorten_existing_url_does_not_allocate() {
        let mut mock_repo = MockRecordRepository::new();
        mock_repo
            .expect_find_by_url()
            .withf(|url| url == "http://a.example")
            .times(1)
            .returning(|url| Ok(Some(UrlRecord::new(5, url.to_string()))));
        mock_repo.expect_insert_if_absent().times(0);

        let allocator = ready_allocator(10);
        let service = ShortenService::new(Arc::new(mock_repo), allocator.clone());

        let shortened = service.shorten("http://a.example").await.unwrap();

        assert_eq!(shortened.status, ShortenStatus::Existing);
        assert_eq!(shortened.record.id, 5);
        assert_eq!(allocator.peek_next(), Some(10));
    }

    #[tokio::test]
    async fn test_shorten_new_url_inserts_allocated_id() {
        let mut mock_repo = MockRecordRepository::new();
        mock_repo
            .expect_find_by_url()
            .times(1)
            .returning(|_| Ok(None));
        mock_repo
            .expect_insert_if_absent()
            .withf(|record| record.id == 10 && record.url == "http://a.example")
            .times(1)
            .returning(|record| Ok(InsertOutcome::Inserted(record)));

        let allocator = ready_allocator(10);
        let service = ShortenService::new(Arc::new(mock_repo), allocator.clone());

        let shortened = service.shorten("http://a.example").await.unwrap();

        assert_eq!(shortened.status, ShortenStatus::Inserted);
        assert_eq!(shortened.record.id, 10);
        assert_eq!(allocator.peek_next(), Some(11));
    }

    #[tokio::test]
    async fn test_shorten_lost_insert_race_returns_winner() {
        let mut mock_repo = MockRecordRepository::new();
        mock_repo
            .expect_find_by_url()
            .times(1)
            .returning(|_| Ok(None));
        mock_repo
            .expect_insert_if_absent()
            .times(1)
            .returning(|record| Ok(InsertOutcome::Existing(UrlRecord::new(3, record.url))));

        let allocator = ready_allocator(7);
        let service = ShortenService::new(Arc::new(mock_repo), allocator.clone());

        let shortened = service.shorten("http://a.example").await.unwrap();

        assert_eq!(shortened.status, ShortenStatus::Existing);
        assert_eq!(shortened.record.id, 3);
        // id 7 is burned
        assert_eq!(allocator.peek_next(), Some(8));
    }

    #[tokio::test]
    async fn test_shorten_store_error_propagates() {
        let mut mock_repo = MockRecordRepository::new();
        mock_repo
            .expect_find_by_url()
            .times(1)
            .returning(|_| Err(AppError::internal("Database error", json!({}))));

        let service = ShortenService::new(Arc::new(mock_repo), ready_allocator(0));

        let result = service.shorten("http://a.example").await;

        assert!(matches!(result, Err(AppError::Internal { .. })));
    }

    #[tokio::test]
    async fn test_shorten_same_url_twice() {
        let service = in_memory_service().await;

        let first = service.shorten("http://a.example").await.unwrap();
        let second = service.shorten("http://a.example").await.unwrap();

        assert_eq!(first.status, ShortenStatus::Inserted);
        assert_eq!(second.status, ShortenStatus::Existing);
        assert_eq!(first.record.id, second.record.id);
    }

    #[tokio::test]
    async fn test_shorten_distinct_urls_increase_by_one() {
        let service = in_memory_service().await;

        let mut ids = Vec::new();
        for url in ["http://a.example", "http://b.example", "http://c.example"] {
            let shortened = service.shorten(url).await.unwrap();
            assert_eq!(shortened.status, ShortenStatus::Inserted);
            ids.push(shortened.record.id);
        }

        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_empty_store_scenario() {
        let service = in_memory_service().await;

        let a = service.shorten("http://a.example").await.unwrap();
        assert_eq!(a.status, ShortenStatus::Inserted);
        assert_eq!(a.record.code(), base62::encode(0));

        let a_again = service.shorten("http://a.example").await.unwrap();
        assert_eq!(a_again.status, ShortenStatus::Existing);
        assert_eq!(a_again.record.code(), "0");

        let b = service.shorten("http://b.example").await.unwrap();
        assert_eq!(b.status, ShortenStatus::Inserted);
        assert_eq!(b.record.code(), "1");
    }

    #[tokio::test]
    async fn test_shorten_continues_after_existing_records() {
        let repo = Arc::new(InMemoryRecordRepository::with_records([
            UrlRecord::new(60, "http://old.example".to_string()),
            UrlRecord::new(61, "http://older.example".to_string()),
        ]));
        let allocator = Arc::new(IdAllocator::new());
        allocator.initialize(repo.as_ref()).await.unwrap();
        let service = ShortenService::new(repo, allocator);

        let shortened = service.shorten("http://new.example").await.unwrap();

        assert_eq!(shortened.record.id, 62);
        assert_eq!(shortened.record.code(), "10");
    }

    #[tokio::test]
    async fn test_concurrent_shorten_same_url_single_id() {
        let service = Arc::new(in_memory_service().await);

        let tasks: Vec<_> = (0..10)
            .map(|_| {
                let service = service.clone();
                tokio::spawn(async move { service.shorten("http://race.example").await })
            })
            .collect();

        let mut ids = Vec::new();
        let mut inserted = 0;
        for task in tasks {
            let shortened = task.await.unwrap().unwrap();
            if shortened.status == ShortenStatus::Inserted {
                inserted += 1;
            }
            ids.push(shortened.record.id);
        }

        assert_eq!(inserted, 1);
        assert!(ids.windows(2).all(|w| w[0] == w[1]));
    }
}
