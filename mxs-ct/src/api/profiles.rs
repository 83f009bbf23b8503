//! Profile API handlers
//!
//! Profiles live in the external identity directory; these handlers are
//! read-only projections of it.

use axum::{
    extract::{Path, State},
    Json,
};
use mxs_common::db::models::Profile;
use mxs_common::Error;

use crate::api::error::ApiError;
use crate::AppState;

/// GET /api/profiles
pub async fn list_profiles(State(state): State<AppState>) -> Result<Json<Vec<Profile>>, ApiError> {
    let profiles = state.identity.list_profiles().await?;

    Ok(Json(profiles))
}

/// GET /api/profiles/{username}
pub async fn get_profile(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<Profile>, ApiError> {
    let profile = state
        .identity
        .lookup_by_username(&username)
        .await?
        .ok_or_else(|| Error::NotFound(format!("profile '{}'", username)))?;

    Ok(Json(profile))
}
