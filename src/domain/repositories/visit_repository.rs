//! Repository trait for visit records.

use crate::domain::entities::{NewVisit, Visit};
use crate::error::AppError;
use async_trait::async_trait;

/// Append-only store of visits.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VisitRepository: Send + Sync {
    /// Appends a visit record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on store errors.
    async fn insert(&self, new_visit: NewVisit) -> Result<Visit, AppError>;

    /// Counts the visits referencing `url_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on store errors.
    async fn count_by_url(&self, url_id: i64) -> Result<i64, AppError>;
}
