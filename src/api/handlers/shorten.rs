//! Handler for the URL creation endpoint.

use axum::{Extension, Json, extract::State, http::StatusCode};
use validator::Validate;

use crate::api::dto::shorten::{
    BatchSummary, FailedItem, ShortenRequest, ShortenResponse, ShortenResultItem, UrlItem,
};
use crate::application::services::{CreateUrl, Owner};
use crate::error::AppError;
use crate::state::AppState;

/// Creates short URLs for one or more original URLs.
///
/// # Endpoint
///
/// `POST /v1/api/urls`
///
/// # Batch Processing
///
/// Processes URLs independently. If one fails, others continue processing.
/// Each result includes either success data or error information.
///
/// # Request Body
///
/// ```json
/// {
///   "urls": [
///     {
///       "url": "https://example.com/sale",
///       "alias": "promo",          // optional
///       "expiryDate": "31-12-2030" // optional, DD-MM-YYYY
///     }
///   ]
/// }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "summary": { "total": 1, "successful": 1, "failed": 0 },
///   "items": [
///     {
///       "id": 1,
///       "slug": "promo",
///       "shortUrl": "http://localhost:5500/promo",
///       "originalUrl": "https://example.com/sale",
///       "customAlias": true,
///       "expiresAt": "2030-12-31T00:00:00Z",
///       "qrCodeImageUrl": "https://api.qrserver.com/v1/create-qr-code/?size=256x256&data=..."
///     }
///   ]
/// }
/// ```
///
/// # Status Codes
///
/// - **201 Created**: at least one item succeeded
/// - **422 Unprocessable Entity**: every item failed; reasons are per item
/// - **400 Bad Request**: empty batch or more than 100 items
pub async fn shorten_handler(
    State(state): State<AppState>,
    Extension(owner): Extension<Owner>,
    Json(payload): Json<ShortenRequest>,
) -> Result<(StatusCode, Json<ShortenResponse>), AppError> {
    payload.validate()?;

    let total = payload.urls.len();
    let mut results = Vec::with_capacity(total);
    let mut successful = 0;
    let mut failed = 0;

    for item in payload.urls {
        let original_url = item.url.clone();

        match state.url_service.create_short_url(to_request(&owner, item)).await {
            Ok(created) => {
                successful += 1;
                results.push(ShortenResultItem::Success(created.into()));
            }
            Err(err) => {
                failed += 1;
                results.push(ShortenResultItem::Error(FailedItem {
                    original_url,
                    error: err.to_error_info(),
                }));
            }
        }
    }

    let status = if successful > 0 {
        StatusCode::CREATED
    } else {
        StatusCode::UNPROCESSABLE_ENTITY
    };

    Ok((
        status,
        Json(ShortenResponse {
            summary: BatchSummary {
                total,
                successful,
                failed,
            },
            items: results,
        }),
    ))
}

fn to_request(owner: &Owner, item: UrlItem) -> CreateUrl {
    CreateUrl {
        owner_id: owner.as_str().to_string(),
        url: item.url,
        alias: item.alias,
        expiry_date: item.expiry_date,
    }
}
