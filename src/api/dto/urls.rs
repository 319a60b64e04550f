//! DTOs for listing an owner's URLs.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One live record as returned by the listing endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlListItem {
    pub id: i64,
    pub slug: String,
    pub short_url: String,
    pub original_url: String,
    pub custom_alias: bool,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub visit_count: i64,
    pub last_visited_at: Option<DateTime<Utc>>,
    pub qr_code_image_url: String,
}

/// Paginated listing response.
#[derive(Debug, Serialize)]
pub struct UrlListResponse {
    pub message: String,
    pub data: Vec<UrlListItem>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}
