//! Playlist API handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use mxs_common::db::models::{Playlist, PlaylistKey, SongKey};
use mxs_common::Error;

use crate::api::auth::ActingUser;
use crate::api::error::ApiError;
use crate::db;
use crate::services::playlists::{NewPlaylist, PlaylistService};
use crate::AppState;

/// GET /api/profiles/{username}/playlists/{playlist}
pub async fn get_playlist(
    State(state): State<AppState>,
    Path((username, playlist)): Path<(String, String)>,
) -> Result<Json<Playlist>, ApiError> {
    let key = PlaylistKey::new(playlist, username);
    let playlist = db::playlists::get(&state.db, &key)
        .await?
        .ok_or_else(|| {
            Error::NotFound(format!(
                "playlist '{}' for author '{}'",
                key.name, key.author_name
            ))
        })?;

    Ok(Json(playlist))
}

/// GET /api/profiles/{username}/playlists
pub async fn profile_playlists(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<Vec<Playlist>>, ApiError> {
    let playlists = db::playlists::by_author(&state.db, &username).await?;

    Ok(Json(playlists))
}

/// POST /api/playlists
pub async fn create_playlist(
    State(state): State<AppState>,
    Extension(ActingUser(acting)): Extension<ActingUser>,
    Json(new): Json<NewPlaylist>,
) -> Result<(StatusCode, Json<Playlist>), ApiError> {
    let playlist = PlaylistService::new(state.db.clone())
        .create(&acting, new)
        .await?;

    Ok((StatusCode::CREATED, Json(playlist)))
}

/// POST /api/playlists/{name}/songs
///
/// Link an existing song (any author's) into the acting user's playlist.
/// The body is the song's composite key.
pub async fn add_playlist_song(
    State(state): State<AppState>,
    Extension(ActingUser(acting)): Extension<ActingUser>,
    Path(playlist): Path<String>,
    Json(song): Json<SongKey>,
) -> Result<StatusCode, ApiError> {
    PlaylistService::new(state.db.clone())
        .add_song(&acting, &playlist, &song)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/playlists/{name}/songs
pub async fn remove_playlist_song(
    State(state): State<AppState>,
    Extension(ActingUser(acting)): Extension<ActingUser>,
    Path(playlist): Path<String>,
    Json(song): Json<SongKey>,
) -> Result<StatusCode, ApiError> {
    PlaylistService::new(state.db.clone())
        .remove_song(&acting, &playlist, &song)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
