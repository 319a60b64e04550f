//! Handlers for an owner's URL collection.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::api::dto::pagination::ListUrlsQuery;
use crate::api::dto::urls::{UrlListItem, UrlListResponse};
use crate::application::services::Owner;
use crate::error::AppError;
use crate::state::AppState;

/// Lists the caller's live URLs, newest first.
///
/// # Endpoint
///
/// `GET /v1/api/urls?page=1&limit=10`
///
/// `pageSize` is accepted in place of `limit`. `total` counts every live
/// record of the caller, independent of paging.
///
/// # Errors
///
/// Returns 400 Bad Request if `page < 1` or `limit` is outside 1..=100.
pub async fn list_urls_handler(
    State(state): State<AppState>,
    Extension(owner): Extension<Owner>,
    Query(query): Query<ListUrlsQuery>,
) -> Result<Json<UrlListResponse>, AppError> {
    let page = query.page();
    let limit = query.limit();

    let listing = state
        .url_service
        .list_by_owner(owner.as_str(), page, limit)
        .await?;

    let data = listing
        .items
        .into_iter()
        .map(|r| UrlListItem {
            short_url: state.url_service.short_url(&r.slug),
            id: r.id,
            slug: r.slug,
            original_url: r.original_url,
            custom_alias: r.is_custom_alias,
            created_at: r.created_at,
            expires_at: r.expires_at,
            visit_count: r.visit_count,
            last_visited_at: r.last_visited_at,
            qr_code_image_url: r.qr_code_image_url,
        })
        .collect();

    Ok(Json(UrlListResponse {
        message: "URLs retrieved successfully".to_string(),
        data,
        total: listing.total,
        page,
        limit,
    }))
}

/// Soft-deletes one of the caller's URLs.
///
/// # Endpoint
///
/// `DELETE /v1/api/urls/{id}`
///
/// The slug stays reserved after deletion.
///
/// # Errors
///
/// Returns 404 Not Found if the URL does not exist, belongs to someone else
/// or was already deleted.
pub async fn delete_url_handler(
    State(state): State<AppState>,
    Extension(owner): Extension<Owner>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.url_service.soft_delete(id, owner.as_str()).await?;

    Ok(StatusCode::NO_CONTENT)
}
