//! Handler for short URL redirect.

use axum::{
    extract::{ConnectInfo, Path, State},
    http::HeaderMap,
    response::{IntoResponse, Redirect},
};
use std::net::SocketAddr;
use tracing::debug;

use crate::domain::visit_event::VisitEvent;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::client_info::{client_ip, referrer, user_agent};
use crate::utils::url_normalizer::redirect_target;

/// Redirects a slug to its original URL.
///
/// # Endpoint
///
/// `GET /{slug}`
///
/// # Request Flow
///
/// 1. Resolve the slug (deleted records are treated as unknown)
/// 2. Reject expired records
/// 3. Hand a visit event to the background worker
/// 4. Return 307 Temporary Redirect
///
/// # Visit Tracking
///
/// Visit events are sent to a bounded channel for async processing.
/// If the queue is full, the visit is dropped (fire-and-forget) and the
/// redirect still succeeds.
///
/// # Errors
///
/// Returns 404 Not Found if the slug is unknown or deleted.
/// Returns 410 Gone if the link has expired.
pub async fn redirect_handler(
    Path(slug): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Result<impl IntoResponse, AppError> {
    let record = state.redirect_service.resolve(&slug).await?;

    let event = VisitEvent::new(
        record.id,
        user_agent(&headers),
        referrer(&headers),
        Some(client_ip(&headers, addr, state.behind_proxy)),
    );
    state.visits.dispatch(event);

    let target = redirect_target(&record.original_url);
    debug!(slug = %slug, target = %target, "Redirecting");

    Ok(Redirect::temporary(&target))
}
