//! Process-local store used when no database is configured.
//!
//! Implements the same contract as the PostgreSQL repositories: slugs are
//! unique across live and deleted records, listings skip deleted records and
//! are ordered newest first, and counters only move through
//! `increment_visit`. Nothing survives a restart.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use tokio::sync::RwLock;

use crate::domain::entities::{NewUrlRecord, NewVisit, UrlPage, UrlRecord, Visit};
use crate::domain::repositories::{UrlRepository, VisitRepository};
use crate::error::AppError;

#[derive(Default)]
struct UrlTable {
    records: Vec<UrlRecord>,
    last_id: i64,
}

/// In-memory URL repository.
#[derive(Default)]
pub struct InMemoryUrlRepository {
    table: RwLock<UrlTable>,
}

impl InMemoryUrlRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks a record up by id regardless of its state.
    pub async fn get(&self, id: i64) -> Option<UrlRecord> {
        self.table
            .read()
            .await
            .records
            .iter()
            .find(|r| r.id == id)
            .cloned()
    }
}

#[async_trait]
impl UrlRepository for InMemoryUrlRepository {
    async fn create(&self, new_record: NewUrlRecord) -> Result<UrlRecord, AppError> {
        let mut table = self.table.write().await;

        if table.records.iter().any(|r| r.slug == new_record.slug) {
            return Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "urls_slug_key" }),
            ));
        }

        table.last_id += 1;
        let record = UrlRecord {
            id: table.last_id,
            owner_id: new_record.owner_id,
            original_url: new_record.original_url,
            slug: new_record.slug,
            is_custom_alias: new_record.is_custom_alias,
            created_at: Utc::now(),
            expires_at: new_record.expires_at,
            visit_count: 0,
            last_visited_at: None,
            deleted: false,
            qr_code_image_url: new_record.qr_code_image_url,
        };
        table.records.push(record.clone());

        Ok(record)
    }

    async fn find_by_slug(
        &self,
        slug: &str,
        include_deleted: bool,
    ) -> Result<Option<UrlRecord>, AppError> {
        let table = self.table.read().await;

        Ok(table
            .records
            .iter()
            .find(|r| r.slug == slug && (include_deleted || !r.deleted))
            .cloned())
    }

    async fn find_by_owner(
        &self,
        owner_id: &str,
        offset: i64,
        limit: i64,
    ) -> Result<UrlPage, AppError> {
        let table = self.table.read().await;

        let mut live: Vec<&UrlRecord> = table
            .records
            .iter()
            .filter(|r| r.owner_id == owner_id && !r.deleted)
            .collect();
        live.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        let skip = usize::try_from(offset).unwrap_or(0);
        let take = usize::try_from(limit).unwrap_or(0);

        Ok(UrlPage {
            total: live.len() as i64,
            items: live.into_iter().skip(skip).take(take).cloned().collect(),
        })
    }

    async fn soft_delete(&self, id: i64, owner_id: &str) -> Result<bool, AppError> {
        let mut table = self.table.write().await;

        match table
            .records
            .iter_mut()
            .find(|r| r.id == id && r.owner_id == owner_id && !r.deleted)
        {
            Some(record) => {
                record.deleted = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn increment_visit(&self, url_id: i64) -> Result<(), AppError> {
        let mut table = self.table.write().await;

        if let Some(record) = table.records.iter_mut().find(|r| r.id == url_id) {
            record.visit_count += 1;
            record.last_visited_at = Some(Utc::now());
        }

        Ok(())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

/// In-memory visit log.
#[derive(Default)]
pub struct InMemoryVisitRepository {
    visits: RwLock<Vec<Visit>>,
}

impl InMemoryVisitRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every recorded visit, oldest first.
    pub async fn all(&self) -> Vec<Visit> {
        self.visits.read().await.clone()
    }
}

#[async_trait]
impl VisitRepository for InMemoryVisitRepository {
    async fn insert(&self, new_visit: NewVisit) -> Result<Visit, AppError> {
        let mut visits = self.visits.write().await;

        let visit = Visit {
            id: visits.len() as i64 + 1,
            url_id: new_visit.url_id,
            browser: new_visit.browser,
            device_type: new_visit.device_type,
            referrer: new_visit.referrer,
            ip_address: new_visit.ip_address,
            visited_at: new_visit.visited_at,
        };
        visits.push(visit.clone());

        Ok(visit)
    }

    async fn count_by_url(&self, url_id: i64) -> Result<i64, AppError> {
        Ok(self
            .visits
            .read()
            .await
            .iter()
            .filter(|v| v.url_id == url_id)
            .count() as i64)
    }
}
