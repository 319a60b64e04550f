//! PostgreSQL implementation of the URL repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

use super::bounded;
use crate::domain::entities::{NewUrlRecord, UrlPage, UrlRecord};
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;

#[derive(sqlx::FromRow)]
struct UrlRow {
    id: i64,
    owner_id: String,
    original_url: String,
    slug: String,
    is_custom_alias: bool,
    created_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
    visit_count: i64,
    last_visited_at: Option<DateTime<Utc>>,
    deleted: bool,
    qr_code_image_url: String,
}

impl From<UrlRow> for UrlRecord {
    fn from(r: UrlRow) -> Self {
        UrlRecord {
            id: r.id,
            owner_id: r.owner_id,
            original_url: r.original_url,
            slug: r.slug,
            is_custom_alias: r.is_custom_alias,
            created_at: r.created_at,
            expires_at: r.expires_at,
            visit_count: r.visit_count,
            last_visited_at: r.last_visited_at,
            deleted: r.deleted,
            qr_code_image_url: r.qr_code_image_url,
        }
    }
}

/// PostgreSQL repository for URL records.
///
/// `urls.slug` is unique across live and deleted rows; an insert losing the
/// alias race surfaces as [`AppError::Conflict`].
pub struct PgUrlRepository {
    pool: Arc<PgPool>,
    timeout: Duration,
}

impl PgUrlRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>, timeout: Duration) -> Self {
        Self { pool, timeout }
    }
}

#[async_trait]
impl UrlRepository for PgUrlRepository {
    async fn create(&self, new_record: NewUrlRecord) -> Result<UrlRecord, AppError> {
        let row = bounded(
            self.timeout,
            "urls.create",
            sqlx::query_as::<_, UrlRow>(
                r#"
                INSERT INTO urls (owner_id, original_url, slug, is_custom_alias, expires_at, qr_code_image_url)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING id, owner_id, original_url, slug, is_custom_alias, created_at,
                          expires_at, visit_count, last_visited_at, deleted, qr_code_image_url
                "#,
            )
            .bind(&new_record.owner_id)
            .bind(&new_record.original_url)
            .bind(&new_record.slug)
            .bind(new_record.is_custom_alias)
            .bind(new_record.expires_at)
            .bind(&new_record.qr_code_image_url)
            .fetch_one(self.pool.as_ref()),
        )
        .await?;

        Ok(row.into())
    }

    async fn find_by_slug(
        &self,
        slug: &str,
        include_deleted: bool,
    ) -> Result<Option<UrlRecord>, AppError> {
        let row = bounded(
            self.timeout,
            "urls.find_by_slug",
            sqlx::query_as::<_, UrlRow>(
                r#"
                SELECT id, owner_id, original_url, slug, is_custom_alias, created_at,
                       expires_at, visit_count, last_visited_at, deleted, qr_code_image_url
                FROM urls
                WHERE slug = $1 AND ($2 OR deleted = FALSE)
                "#,
            )
            .bind(slug)
            .bind(include_deleted)
            .fetch_optional(self.pool.as_ref()),
        )
        .await?;

        Ok(row.map(Into::into))
    }

    async fn find_by_owner(
        &self,
        owner_id: &str,
        offset: i64,
        limit: i64,
    ) -> Result<UrlPage, AppError> {
        let rows = bounded(
            self.timeout,
            "urls.find_by_owner",
            sqlx::query_as::<_, UrlRow>(
                r#"
                SELECT id, owner_id, original_url, slug, is_custom_alias, created_at,
                       expires_at, visit_count, last_visited_at, deleted, qr_code_image_url
                FROM urls
                WHERE owner_id = $1 AND deleted = FALSE
                ORDER BY created_at DESC, id DESC
                LIMIT $2 OFFSET $3
                "#,
            )
            .bind(owner_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(self.pool.as_ref()),
        )
        .await?;

        let total = bounded(
            self.timeout,
            "urls.count_by_owner",
            sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM urls WHERE owner_id = $1 AND deleted = FALSE",
            )
            .bind(owner_id)
            .fetch_one(self.pool.as_ref()),
        )
        .await?;

        Ok(UrlPage {
            items: rows.into_iter().map(Into::into).collect(),
            total,
        })
    }

    async fn soft_delete(&self, id: i64, owner_id: &str) -> Result<bool, AppError> {
        let result = bounded(
            self.timeout,
            "urls.soft_delete",
            sqlx::query(
                "UPDATE urls SET deleted = TRUE \
                 WHERE id = $1 AND owner_id = $2 AND deleted = FALSE",
            )
            .bind(id)
            .bind(owner_id)
            .execute(self.pool.as_ref()),
        )
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn increment_visit(&self, url_id: i64) -> Result<(), AppError> {
        bounded(
            self.timeout,
            "urls.increment_visit",
            sqlx::query(
                "UPDATE urls SET visit_count = visit_count + 1, last_visited_at = NOW() \
                 WHERE id = $1",
            )
            .bind(url_id)
            .execute(self.pool.as_ref()),
        )
        .await?;

        Ok(())
    }

    async fn ping(&self) -> Result<(), AppError> {
        bounded(
            self.timeout,
            "urls.ping",
            sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(self.pool.as_ref()),
        )
        .await?;

        Ok(())
    }
}
