//! URL record entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};

/// A shortened URL owned by an account.
///
/// Created once, read many times. Only the visit counter, the last-visit
/// timestamp and the soft-delete flag ever change after creation, and the
/// slug stays reserved even once `deleted` is set.
#[derive(Debug, Clone, PartialEq)]
pub struct UrlRecord {
    pub id: i64,
    pub owner_id: String,
    pub original_url: String,
    pub slug: String,
    pub is_custom_alias: bool,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub visit_count: i64,
    pub last_visited_at: Option<DateTime<Utc>>,
    pub deleted: bool,
    pub qr_code_image_url: String,
}

impl UrlRecord {
    /// Returns true if the record has an expiry that is not strictly in the future.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|e| e <= now)
    }

    /// Returns true if the record has passed its expiry time.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

/// Input data for persisting a new URL record.
///
/// Counters, timestamps and the soft-delete flag are initialised by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUrlRecord {
    pub owner_id: String,
    pub original_url: String,
    pub slug: String,
    pub is_custom_alias: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub qr_code_image_url: String,
}

/// One page of an owner's live records plus the owner's total live count.
#[derive(Debug, Clone, Default)]
pub struct UrlPage {
    pub items: Vec<UrlRecord>,
    pub total: i64,
}
