//! In-memory implementation of the record repository.

use async_trait::async_trait;
use serde_json::json;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

use crate::domain::entities::{InsertOutcome, UrlRecord};
use crate::domain::repositories::RecordRepository;
use crate::error::AppError;

#[derive(Default)]
struct Records {
    by_id: BTreeMap<u64, String>,
    by_url: HashMap<String, u64>,
}

/// Process-local record store.
///
/// Mirrors the PostgreSQL schema: ids are unique, URLs are unique, and
/// insert-if-absent happens under a single write lock. Contents are lost when
/// the process exits.
#[derive(Default)]
pub struct InMemoryRecordRepository {
    records: RwLock<Records>,
}

impl InMemoryRecordRepository {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `records`.
    ///
    /// Later entries win on duplicate ids or URLs.
    pub fn with_records(records: impl IntoIterator<Item = UrlRecord>) -> Self {
        let mut inner = Records::default();
        for record in records {
            inner.by_url.insert(record.url.clone(), record.id);
            inner.by_id.insert(record.id, record.url);
        }

        Self {
            records: RwLock::new(inner),
        }
    }
}

#[async_trait]
impl RecordRepository for InMemoryRecordRepository {
    async fn max_id(&self) -> Result<Option<u64>, AppError> {
        let records = self.records.read().await;
        Ok(records.by_id.keys().next_back().copied())
    }

    async fn find_by_id(&self, id: u64) -> Result<Option<UrlRecord>, AppError> {
        let records = self.records.read().await;
        Ok(records
            .by_id
            .get(&id)
            .map(|url| UrlRecord::new(id, url.clone())))
    }

    async fn find_by_url(&self, url: &str) -> Result<Option<UrlRecord>, AppError> {
        let records = self.records.read().await;
        Ok(records
            .by_url
            .get(url)
            .map(|&id| UrlRecord::new(id, url.to_string())))
    }

    async fn insert_if_absent(&self, record: UrlRecord) -> Result<InsertOutcome, AppError> {
        let mut records = self.records.write().await;

        if let Some(&id) = records.by_url.get(&record.url) {
            return Ok(InsertOutcome::Existing(UrlRecord::new(id, record.url)));
        }

        if records.by_id.contains_key(&record.id) {
            return Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "url_records_pkey", "id": record.id }),
            ));
        }

        records.by_url.insert(record.url.clone(), record.id);
        records.by_id.insert(record.id, record.url.clone());

        Ok(InsertOutcome::Inserted(record))
    }

    async fn count(&self) -> Result<u64, AppError> {
        let records = self.records.read().await;
        Ok(records.by_id.len() as u64)
    }
}
