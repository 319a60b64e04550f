//! DTOs for the URL creation endpoint.

use crate::application::services::ShortenedUrl;
use crate::error::ErrorInfo;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to shorten one or more URLs.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    #[validate(length(min = 1, max = 100, message = "Between 1 and 100 URLs per request"))]
    pub urls: Vec<UrlItem>,
}

/// Individual URL to be shortened.
///
/// Field rules are enforced per item by the URL service so one bad item does
/// not fail the batch.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlItem {
    /// Absolute or scheme-less URL.
    pub url: String,

    /// Optional custom alias used as the slug.
    #[serde(default)]
    pub alias: Option<String>,

    /// Optional expiry in `DD-MM-YYYY`, midnight UTC.
    #[serde(default)]
    pub expiry_date: Option<String>,
}

/// Response containing batch processing results.
#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub summary: BatchSummary,
    pub items: Vec<ShortenResultItem>,
}

/// Individual result for a URL in the batch.
///
/// Uses untagged enum for cleaner JSON structure (no discriminator field).
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ShortenResultItem {
    Success(ShortenedItem),
    Error(FailedItem),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortenedItem {
    pub id: i64,
    pub slug: String,
    pub short_url: String,
    pub original_url: String,
    pub custom_alias: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub qr_code_image_url: String,
}

impl From<ShortenedUrl> for ShortenedItem {
    fn from(s: ShortenedUrl) -> Self {
        Self {
            id: s.record.id,
            slug: s.record.slug,
            short_url: s.short_url,
            original_url: s.record.original_url,
            custom_alias: s.record.is_custom_alias,
            expires_at: s.record.expires_at,
            qr_code_image_url: s.record.qr_code_image_url,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailedItem {
    pub original_url: String,
    pub error: ErrorInfo,
}

/// Summary statistics for batch processing.
#[derive(Debug, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
}
