//! Owner identity for the `/v1/api` routes.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;
use serde_json::json;

use crate::application::services::Owner;
use crate::error::AppError;
use crate::state::AppState;

/// Resolves the caller's [`Owner`] and stores it in request extensions.
///
/// Expects `Authorization: Bearer <owner-id>.<signature>`. Handlers behind
/// this layer read the identity with `Extension<Owner>`; the owner id itself
/// is never interpreted.
///
/// # Errors
///
/// `401 Unauthorized` (with `WWW-Authenticate: Bearer`) when the header is
/// absent, not a bearer credential, or carries a token that fails
/// verification.
pub async fn require_owner(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let owner = owner_from_parts(&state, &mut parts).await?;
    parts.extensions.insert(owner);

    Ok(next.run(Request::from_parts(parts, body)).await)
}

async fn owner_from_parts(state: &AppState, parts: &mut Parts) -> Result<Owner, AppError> {
    let AuthBearer(token) = AuthBearer::from_request_parts(parts, &())
        .await
        .map_err(|_| {
            AppError::unauthorized(
                "Unauthorized",
                json!({ "reason": "Missing bearer token" }),
            )
        })?;

    state.auth_service.authenticate(&token)
}
