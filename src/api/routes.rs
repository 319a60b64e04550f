//! API route configuration.
//!
//! All API endpoints require Bearer token authentication via
//! [`crate::api::middleware::auth`].

use crate::api::handlers::{delete_url_handler, list_urls_handler, shorten_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get},
};

/// All API routes, protected by Bearer token authentication.
///
/// # Endpoints
///
/// - `POST   /urls`        - Create short URLs (batch-capable)
/// - `GET    /urls`        - List the caller's live URLs (paginated)
/// - `DELETE /urls/{id}`   - Soft-delete one of the caller's URLs
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/urls", get(list_urls_handler).post(shorten_handler))
        .route("/urls/{id}", delete(delete_url_handler))
}
