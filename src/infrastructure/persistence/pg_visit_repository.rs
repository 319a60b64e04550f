//! PostgreSQL implementation of the visit repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

use super::bounded;
use crate::domain::entities::{NewVisit, Visit};
use crate::domain::repositories::VisitRepository;
use crate::error::AppError;

#[derive(sqlx::FromRow)]
struct VisitRow {
    id: i64,
    url_id: i64,
    browser: String,
    device_type: String,
    referrer: String,
    ip_address: String,
    visited_at: DateTime<Utc>,
}

impl From<VisitRow> for Visit {
    fn from(r: VisitRow) -> Self {
        Visit {
            id: r.id,
            url_id: r.url_id,
            browser: r.browser,
            device_type: r.device_type,
            referrer: r.referrer,
            ip_address: r.ip_address,
            visited_at: r.visited_at,
        }
    }
}

/// PostgreSQL repository for the append-only visit log.
pub struct PgVisitRepository {
    pool: Arc<PgPool>,
    timeout: Duration,
}

impl PgVisitRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>, timeout: Duration) -> Self {
        Self { pool, timeout }
    }
}

#[async_trait]
impl VisitRepository for PgVisitRepository {
    async fn insert(&self, new_visit: NewVisit) -> Result<Visit, AppError> {
        let row = bounded(
            self.timeout,
            "visits.insert",
            sqlx::query_as::<_, VisitRow>(
                r#"
                INSERT INTO visits (url_id, browser, device_type, referrer, ip_address, visited_at)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING id, url_id, browser, device_type, referrer, ip_address, visited_at
                "#,
            )
            .bind(new_visit.url_id)
            .bind(&new_visit.browser)
            .bind(&new_visit.device_type)
            .bind(&new_visit.referrer)
            .bind(&new_visit.ip_address)
            .bind(new_visit.visited_at)
            .fetch_one(self.pool.as_ref()),
        )
        .await?;

        Ok(row.into())
    }

    async fn count_by_url(&self, url_id: i64) -> Result<i64, AppError> {
        bounded(
            self.timeout,
            "visits.count_by_url",
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM visits WHERE url_id = $1")
                .bind(url_id)
                .fetch_one(self.pool.as_ref()),
        )
        .await
    }
}
