//! Unified search endpoint

use axum::{
    extract::{Query, State},
    Json,
};
use std::collections::BTreeMap;

use crate::api::error::ApiError;
use crate::services::search::{self, SearchItem};
use crate::AppState;

/// GET /api/search?q=...
///
/// `q` is the search text; every other query parameter is treated as the
/// caller's opaque route context and merged into song overlay hrefs.
/// Zero matches (or an empty query) is a `200` with an empty list, never
/// an error.
pub async fn search(
    State(state): State<AppState>,
    Query(mut params): Query<BTreeMap<String, String>>,
) -> Result<Json<Vec<SearchItem>>, ApiError> {
    let query = params.remove("q").unwrap_or_default();
    let context = params;

    let items =
        search::filtered_items(&state.db, state.identity.as_ref(), &query, &context).await?;

    Ok(Json(items))
}
