//! Short URL creation, listing and deletion.

use std::sync::Arc;

use serde_json::json;
use tracing::{error, info, warn};

use crate::application::services::alias_registry::{AliasRegistry, alias_taken};
use crate::domain::entities::{NewUrlRecord, UrlPage, UrlRecord};
use crate::domain::qr_code::QrCodeHost;
use crate::domain::repositories::UrlRepository;
use crate::error::AppError;
use crate::utils::code_generator::{CodeGenerator, validate_alias};
use crate::utils::expiry::parse_expiry;
use crate::utils::url_normalizer::normalize_url;

/// Page used when the caller does not ask for one.
pub const DEFAULT_PAGE: i64 = 1;

/// Page size used when the caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Largest page size a caller may request.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Number of records to skip for a 1-indexed `page` of `page_size` records.
///
/// # Errors
///
/// Returns [`AppError::Validation`] if `page < 1`, `page_size` is outside
/// `1..=100`, or the offset does not fit in an `i64`.
pub fn page_offset(page: i64, page_size: i64) -> Result<i64, AppError> {
    if page < 1 {
        return Err(AppError::bad_request(
            "Page must be at least 1",
            json!({ "page": page }),
        ));
    }

    if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
        return Err(AppError::bad_request(
            format!("Limit must be between 1 and {MAX_PAGE_SIZE}"),
            json!({ "limit": page_size }),
        ));
    }

    (page - 1).checked_mul(page_size).ok_or_else(|| {
        AppError::bad_request("Page is out of range", json!({ "page": page }))
    })
}

/// Input for a single short URL creation.
#[derive(Debug, Clone, Default)]
pub struct CreateUrl {
    pub owner_id: String,
    pub url: String,
    pub alias: Option<String>,
    pub expiry_date: Option<String>,
}

/// A freshly persisted record together with its public short URL.
#[derive(Debug, Clone)]
pub struct ShortenedUrl {
    pub record: UrlRecord,
    pub short_url: String,
}

/// Service owning the write side of URL records.
///
/// Generated slugs are not checked against the store; the digest-based
/// generator makes collisions practically impossible and the unique index
/// rejects the rest. Custom aliases go through the [`AliasRegistry`].
pub struct UrlService<R: UrlRepository + ?Sized, Q: QrCodeHost + ?Sized> {
    repository: Arc<R>,
    aliases: AliasRegistry<R>,
    qr_codes: Arc<Q>,
    generator: CodeGenerator,
    base_url: String,
}

impl<R: UrlRepository + ?Sized, Q: QrCodeHost + ?Sized> UrlService<R, Q> {
    /// Creates a new URL service.
    ///
    /// # Arguments
    ///
    /// - `repository` - URL store
    /// - `qr_codes` - image host asked for one QR reference per creation
    /// - `generator` - slug generator with its injected counter
    /// - `base_url` - prefix of every short URL, e.g. `https://lk.example`
    pub fn new(
        repository: Arc<R>,
        qr_codes: Arc<Q>,
        generator: CodeGenerator,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            aliases: AliasRegistry::new(Arc::clone(&repository)),
            repository,
            qr_codes,
            generator,
            base_url: base_url.into(),
        }
    }

    /// Shortens one URL for `owner_id`.
    ///
    /// Validation runs before any I/O. The QR image is published after the
    /// slug is decided and before the insert, so a failed publish persists
    /// nothing.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if:
    /// - URL is empty or malformed
    /// - Alias breaks the alias rules
    /// - Expiry date is not `DD-MM-YYYY`
    ///
    /// Returns [`AppError::Conflict`] if the alias is taken, or in the rare
    /// case of a generated slug colliding with an existing one.
    ///
    /// Returns [`AppError::Internal`] on store or QR host failures.
    pub async fn create_short_url(&self, request: CreateUrl) -> Result<ShortenedUrl, AppError> {
        let original_url = normalize_url(&request.url).map_err(|e| {
            AppError::bad_request("Invalid URL format", json!({ "reason": e.to_string() }))
        })?;

        let alias = request
            .alias
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty());
        if let Some(alias) = alias {
            validate_alias(alias)?;
        }

        let expires_at = parse_expiry(request.expiry_date.as_deref())?;

        let (slug, is_custom_alias) = match alias {
            Some(alias) => {
                self.aliases.reserve(alias).await?;
                (alias.to_string(), true)
            }
            None => (self.generator.generate(&original_url), false),
        };

        let short_url = self.short_url(&slug);

        let qr_code_image_url = self
            .qr_codes
            .publish(&short_url, &slug)
            .await
            .map_err(|e| {
                error!(slug = %slug, error = %e, "QR code publish failed");
                AppError::opaque()
            })?;

        let record = self
            .repository
            .create(NewUrlRecord {
                owner_id: request.owner_id,
                original_url,
                slug: slug.clone(),
                is_custom_alias,
                expires_at,
                qr_code_image_url,
            })
            .await
            .map_err(|e| match e {
                AppError::Conflict { .. } if is_custom_alias => alias_taken(&slug),
                AppError::Conflict { .. } => {
                    warn!(slug = %slug, "Generated slug collided with an existing record");
                    AppError::conflict(
                        "Generated slug collided, please retry",
                        json!({ "slug": slug }),
                    )
                }
                other => other,
            })?;

        info!(
            id = record.id,
            slug = %record.slug,
            custom_alias = record.is_custom_alias,
            "Short URL created"
        );

        Ok(ShortenedUrl { record, short_url })
    }

    /// Lists the owner's live records, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the paging is rejected by
    /// [`page_offset`], and [`AppError::Internal`] on store failures.
    pub async fn list_by_owner(
        &self,
        owner_id: &str,
        page: i64,
        page_size: i64,
    ) -> Result<UrlPage, AppError> {
        let offset = page_offset(page, page_size)?;

        self.repository
            .find_by_owner(owner_id, offset, page_size)
            .await
    }

    /// Soft-deletes a record owned by `owner_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the record does not exist, belongs to
    /// someone else or is already deleted. The three cases are not told apart.
    pub async fn soft_delete(&self, id: i64, owner_id: &str) -> Result<(), AppError> {
        if !self.repository.soft_delete(id, owner_id).await? {
            return Err(AppError::not_found(
                "No matching URL found",
                json!({ "id": id }),
            ));
        }

        info!(id, "Short URL deleted");
        Ok(())
    }

    /// Checks that the store answers.
    pub async fn ping(&self) -> Result<(), AppError> {
        self.repository.ping().await
    }

    /// Builds the public short URL for `slug`.
    pub fn short_url(&self, slug: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), slug)
    }
}
