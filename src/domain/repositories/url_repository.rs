//! Repository trait for URL record persistence.

use crate::domain::entities::{NewUrlRecord, UrlPage, UrlRecord};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for shortened URL records.
///
/// Records are never physically removed. Soft-deleted records are hidden from
/// listing and resolution but still count for slug uniqueness.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUrlRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryUrlRepository`] - in-process store
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlRepository: Send + Sync {
    /// Persists a new record with `deleted = false`, `visit_count = 0` and no
    /// last visit.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the slug is already present.
    /// Returns [`AppError::Internal`] on store errors.
    async fn create(&self, new_record: NewUrlRecord) -> Result<UrlRecord, AppError>;

    /// Finds a record by slug.
    ///
    /// With `include_deleted = false` soft-deleted records are treated as absent.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on store errors.
    async fn find_by_slug(
        &self,
        slug: &str,
        include_deleted: bool,
    ) -> Result<Option<UrlRecord>, AppError>;

    /// Lists an owner's live records, newest first.
    ///
    /// Skips `offset` records and returns at most `limit`; `total` counts every
    /// live record of the owner regardless of the window requested.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on store errors.
    async fn find_by_owner(
        &self,
        owner_id: &str,
        offset: i64,
        limit: i64,
    ) -> Result<UrlPage, AppError>;

    /// Marks a live record owned by `owner_id` as deleted.
    ///
    /// Returns `Ok(false)` when the record is missing, owned by someone else or
    /// already deleted.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on store errors.
    async fn soft_delete(&self, id: i64, owner_id: &str) -> Result<bool, AppError>;

    /// Atomically increments `visit_count` and sets `last_visited_at` to now.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on store errors.
    async fn increment_visit(&self, url_id: i64) -> Result<(), AppError>;

    /// Round-trips to the store; used by health checks.
    async fn ping(&self) -> Result<(), AppError>;
}
