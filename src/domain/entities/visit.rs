//! Visit entity representing a single successful redirect.

use chrono::{DateTime, Utc};

/// A recorded visit to a shortened URL.
///
/// `url_id` is a plain reference; visits are never updated or deleted.
/// The descriptive fields are best-effort and may be empty or `"Unknown"`.
#[derive(Debug, Clone, PartialEq)]
pub struct Visit {
    pub id: i64,
    pub url_id: i64,
    pub browser: String,
    pub device_type: String,
    pub referrer: String,
    pub ip_address: String,
    pub visited_at: DateTime<Utc>,
}

/// Input data for recording a visit.
#[derive(Debug, Clone, PartialEq)]
pub struct NewVisit {
    pub url_id: i64,
    pub browser: String,
    pub device_type: String,
    pub referrer: String,
    pub ip_address: String,
    pub visited_at: DateTime<Utc>,
}
