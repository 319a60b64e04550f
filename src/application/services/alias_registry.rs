//! Custom alias reservation.

use std::sync::Arc;

use serde_json::json;

use crate::domain::repositories::UrlRepository;
use crate::error::AppError;

/// Checks caller-supplied aliases against every stored slug.
///
/// Soft-deleted records still hold their slug, so the lookup always includes
/// them. The check and the following insert are not atomic; the unique index
/// on `urls.slug` catches the race loser.
pub struct AliasRegistry<R: UrlRepository + ?Sized> {
    repository: Arc<R>,
}

impl<R: UrlRepository + ?Sized> AliasRegistry<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Succeeds if no record, live or deleted, uses `alias` as its slug.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the alias is taken and
    /// [`AppError::Internal`] on store failures.
    pub async fn reserve(&self, alias: &str) -> Result<(), AppError> {
        match self.repository.find_by_slug(alias, true).await? {
            Some(_) => Err(alias_taken(alias)),
            None => Ok(()),
        }
    }
}

pub(crate) fn alias_taken(alias: &str) -> AppError {
    AppError::conflict("Alias is already taken", json!({ "alias": alias }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::UrlRecord;
    use crate::domain::repositories::MockUrlRepository;
    use chrono::Utc;

    fn record(slug: &str, deleted: bool) -> UrlRecord {
        UrlRecord {
            id: 7,
            owner_id: "owner-1".to_string(),
            original_url: "example.com/a".to_string(),
            slug: slug.to_string(),
            is_custom_alias: true,
            created_at: Utc::now(),
            expires_at: None,
            visit_count: 0,
            last_visited_at: None,
            deleted,
            qr_code_image_url: String::new(),
        }
    }

    #[tokio::test]
    async fn test_reserve_free_alias() {
        let mut mock_repo = MockUrlRepository::new();
        mock_repo
            .expect_find_by_slug()
            .withf(|slug, include_deleted| slug == "promo" && *include_deleted)
            .times(1)
            .returning(|_, _| Ok(None));

        let registry = AliasRegistry::new(Arc::new(mock_repo));

        assert!(registry.reserve("promo").await.is_ok());
    }

    #[tokio::test]
    async fn test_reserve_taken_by_live_record() {
        let mut mock_repo = MockUrlRepository::new();
        mock_repo
            .expect_find_by_slug()
            .returning(|slug, _| Ok(Some(record(slug, false))));

        let registry = AliasRegistry::new(Arc::new(mock_repo));
        let err = registry.reserve("promo").await.unwrap_err();

        assert!(matches!(err, AppError::Conflict { .. }));
        assert_eq!(err.to_error_info().details["alias"], "promo");
    }

    #[tokio::test]
    async fn test_reserve_taken_by_deleted_record() {
        let mut mock_repo = MockUrlRepository::new();
        mock_repo
            .expect_find_by_slug()
            .returning(|slug, _| Ok(Some(record(slug, true))));

        let registry = AliasRegistry::new(Arc::new(mock_repo));

        assert!(matches!(
            registry.reserve("promo").await,
            Err(AppError::Conflict { .. })
        ));
    }

    #[tokio::test]
    async fn test_reserve_propagates_store_failure() {
        let mut mock_repo = MockUrlRepository::new();
        mock_repo
            .expect_find_by_slug()
            .returning(|_, _| Err(AppError::opaque()));

        let registry = AliasRegistry::new(Arc::new(mock_repo));

        assert!(matches!(
            registry.reserve("promo").await,
            Err(AppError::Internal { .. })
        ));
    }
}
