//! PostgreSQL implementation of the record repository.

use async_trait::async_trait;
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{InsertOutcome, UrlRecord};
use crate::domain::repositories::RecordRepository;
use crate::error::AppError;

/// PostgreSQL repository backed by the `url_records` table.
///
/// `id` is the primary key and `md5(url)` carries a unique index, so both
/// lookups are index-backed and insert-if-absent is enforced by the database.
pub struct PgRecordRepository {
    pool: Arc<PgPool>,
}

impl PgRecordRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    async fn fetch_by_url(&self, url: &str) -> Result<Option<UrlRecord>, AppError> {
        let row = sqlx::query_as::<_, (i64, String)>(
            "SELECT id, url FROM url_records WHERE md5(url) = md5($1) AND url = $1",
        )
        .bind(url)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(|(id, url)| UrlRecord::from_row(id, url))
            .transpose()
    }
}

#[async_trait]
impl RecordRepository for PgRecordRepository {
    async fn max_id(&self) -> Result<Option<u64>, AppError> {
        let max = sqlx::query_scalar::<_, Option<i64>>("SELECT MAX(id) FROM url_records")
            .fetch_one(self.pool.as_ref())
            .await?;

        max.map(|id| {
            u64::try_from(id).map_err(|_| {
                AppError::internal("Store returned an invalid max id", json!({ "id": id }))
            })
        })
        .transpose()
    }

    async fn find_by_id(&self, id: u64) -> Result<Option<UrlRecord>, AppError> {
        // ids beyond the BIGINT range can never have been stored
        let Ok(id) = i64::try_from(id) else {
            return Ok(None);
        };

        let row = sqlx::query_as::<_, (i64, String)>(
            "SELECT id, url FROM url_records WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(|(id, url)| UrlRecord::from_row(id, url))
            .transpose()
    }

    async fn find_by_url(&self, url: &str) -> Result<Option<UrlRecord>, AppError> {
        self.fetch_by_url(url).await
    }

    async fn insert_if_absent(&self, record: UrlRecord) -> Result<InsertOutcome, AppError> {
        let id = i64::try_from(record.id).map_err(|_| {
            AppError::internal("Record id out of range", json!({ "id": record.id }))
        })?;

        let inserted = sqlx::query_as::<_, (i64, String)>(
            r#"
            INSERT INTO url_records (id, url)
            VALUES ($1, $2)
            ON CONFLICT ((md5(url))) DO NOTHING
            RETURNING id, url
            "#,
        )
        .bind(id)
        .bind(&record.url)
        .fetch_optional(self.pool.as_ref())
        .await?;

        if let Some((id, url)) = inserted {
            return Ok(InsertOutcome::Inserted(UrlRecord::from_row(id, url)?));
        }

        // The conflicting row is committed by the time DO NOTHING returns.
        // A miss here means a different URL shares the md5 digest.
        self.fetch_by_url(&record.url)
            .await?
            .map(InsertOutcome::Existing)
            .ok_or_else(|| {
                AppError::internal("URL hash collision", json!({ "url": record.url }))
            })
    }

    async fn count(&self) -> Result<u64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM url_records")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(u64::try_from(count).unwrap_or(0))
    }
}
