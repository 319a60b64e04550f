//! Visit recording.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error};

use crate::domain::entities::NewVisit;
use crate::domain::repositories::{UrlRepository, VisitRepository};
use crate::domain::visit_worker::VisitRecorder;
use crate::error::AppError;

/// Appends visits and bumps the per-URL counter.
///
/// The visit insert and the counter increment are independent writes with no
/// compensation. A failed increment after a successful insert is logged and
/// leaves the visit log one ahead of `visit_count`.
pub struct AnalyticsService<U: UrlRepository + ?Sized, V: VisitRepository + ?Sized> {
    url_repository: Arc<U>,
    visit_repository: Arc<V>,
}

impl<U: UrlRepository + ?Sized, V: VisitRepository + ?Sized> AnalyticsService<U, V> {
    pub fn new(url_repository: Arc<U>, visit_repository: Arc<V>) -> Self {
        Self {
            url_repository,
            visit_repository,
        }
    }

    /// Records one visit.
    ///
    /// # Errors
    ///
    /// Returns the insert error if the visit row could not be written. In that
    /// case the counter is left untouched.
    pub async fn record_visit(&self, visit: NewVisit) -> Result<(), AppError> {
        let url_id = visit.url_id;
        let stored = self.visit_repository.insert(visit).await?;

        if let Err(e) = self.url_repository.increment_visit(url_id).await {
            error!(url_id, visit_id = stored.id, error = %e, "Visit counter increment failed");
            return Ok(());
        }

        debug!(url_id, visit_id = stored.id, "Visit recorded");
        Ok(())
    }
}

#[async_trait]
impl<U, V> VisitRecorder for AnalyticsService<U, V>
where
    U: UrlRepository + ?Sized,
    V: VisitRepository + ?Sized,
{
    async fn record(&self, visit: NewVisit) -> Result<(), AppError> {
        self.record_visit(visit).await
    }
}
