//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /{slug}`      - Short URL redirect (public)
//! - `GET  /health`      - Health check: store, visit queue (public)
//! - `/v1/api/*`         - REST API (Bearer identity token required)
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Authentication** - Bearer identity token on the API
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler};
use crate::api::middleware::{auth, tracing};
use crate::state::AppState;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Builds the router with all routes and middleware but without path
/// normalization.
///
/// `/health` and the `v1` prefix are static segments and win over `/{slug}`;
/// the alias rules keep them out of the slug space.
pub fn build_router(state: AppState) -> Router {
    let api_router = api::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_owner));

    Router::new()
        .route("/health", get(health_handler))
        .route("/{slug}", get(redirect_handler))
        .nest("/v1/api", api_router)
        .with_state(state)
        .layer(tracing::layer())
}

/// Constructs the application router served in production.
///
/// Trailing slashes are trimmed before routing, so `/promo/` redirects like
/// `/promo`.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(build_router(state))
}
