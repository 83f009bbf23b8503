//! Session authentication middleware
//!
//! Mutating requests (POST, PATCH, DELETE) must carry a session token in
//! the `Authorization: Bearer` header. The validated username is injected
//! as the [`ActingUser`] request extension; it is the only source of the
//! acting identity for mutation handlers, closing the path for ownership
//! spoofing via request bodies.
//!
//! Read requests pass through untouched; every read surface of the
//! catalog is public.

use axum::{
    extract::{Request, State},
    http::{header, Method},
    middleware::Next,
    response::Response,
};
use mxs_common::api::auth::validate_token;
use mxs_common::Error;
use tracing::warn;

use crate::api::error::ApiError;
use crate::AppState;

/// Authenticated acting username for the current request
#[derive(Debug, Clone)]
pub struct ActingUser(pub String);

/// Authentication middleware
///
/// Applied to the whole API router; only mutating methods are gated.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    match request.method() {
        &Method::POST | &Method::PATCH | &Method::DELETE => {}
        _ => return Ok(next.run(request).await),
    }

    let header_value = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| Error::Auth("missing Authorization header".to_string()))?;

    let token = header_value
        .strip_prefix("Bearer ")
        .ok_or_else(|| Error::Auth("Authorization header is not a Bearer token".to_string()))?;

    let username = validate_token(token, state.shared_secret).map_err(|e| {
        warn!("Session validation failed: {}", e);
        Error::Auth(e.to_string())
    })?;

    request.extensions_mut().insert(ActingUser(username));

    Ok(next.run(request).await)
}
