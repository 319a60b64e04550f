//! Slug resolution for the redirect path.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;

use crate::domain::entities::UrlRecord;
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;

/// Read-only resolver behind `GET /{slug}`.
///
/// Deleted records are filtered out by the lookup itself, so they look the
/// same as slugs that never existed. Expired records are reported distinctly.
pub struct RedirectService<R: UrlRepository + ?Sized> {
    repository: Arc<R>,
}

impl<R: UrlRepository + ?Sized> RedirectService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Resolves `slug` to its live record without mutating it.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for unknown or deleted slugs,
    /// [`AppError::Expired`] once `expires_at` is not in the future, and
    /// [`AppError::Internal`] on store failures.
    pub async fn resolve(&self, slug: &str) -> Result<UrlRecord, AppError> {
        let record = self
            .repository
            .find_by_slug(slug, false)
            .await?
            .ok_or_else(|| AppError::not_found("Invalid slug", json!({ "slug": slug })))?;

        if record.is_expired_at(Utc::now()) {
            return Err(AppError::expired(
                "This link has expired",
                json!({ "slug": slug }),
            ));
        }

        Ok(record)
    }
}
