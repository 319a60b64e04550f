//! QR image capability consumed during URL creation.

use crate::error::AppError;
use async_trait::async_trait;

/// Publishes a QR image encoding `content` and returns where it is hosted.
///
/// Called once per successful creation, after the slug is chosen and before
/// the record is persisted. Rendering and hosting are owned by the
/// implementation; the core only keeps the returned reference.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QrCodeHost: Send + Sync {
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the image cannot be produced or hosted.
    async fn publish(&self, content: &str, name: &str) -> Result<String, AppError>;
}
