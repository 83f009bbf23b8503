//! Song API handlers
//!
//! Reads are public; create/update/delete require a session and act on
//! rows in the acting user's namespace only.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use mxs_common::db::models::{PlaylistKey, Song, SongKey};
use mxs_common::Error;

use crate::api::auth::ActingUser;
use crate::api::error::ApiError;
use crate::db;
use crate::services::songs::{NewSong, SongPatch, SongService, RECENT_SONGS_LIMIT};
use crate::AppState;

/// GET /api/songs
///
/// The most recent songs system-wide, newest first.
pub async fn recent_songs(State(state): State<AppState>) -> Result<Json<Vec<Song>>, ApiError> {
    let songs = db::songs::recent(&state.db, RECENT_SONGS_LIMIT).await?;
    Ok(Json(songs))
}

/// GET /api/profiles/{username}/playlists/{playlist}/songs/{song}
pub async fn get_song(
    State(state): State<AppState>,
    Path((username, playlist, song)): Path<(String, String, String)>,
) -> Result<Json<Song>, ApiError> {
    let key = SongKey::new(song, username, playlist);
    let song = db::songs::get(&state.db, &key)
        .await?
        .ok_or_else(|| Error::NotFound(format!("song '{}'", key.name)))?;

    Ok(Json(song))
}

/// GET /api/profiles/{username}/playlists/{playlist}/songs
///
/// Songs whose membership includes the given playlist.
pub async fn playlist_songs(
    State(state): State<AppState>,
    Path((username, playlist)): Path<(String, String)>,
) -> Result<Json<Vec<Song>>, ApiError> {
    let key = PlaylistKey::new(playlist, username);
    let songs = db::songs::in_playlist(&state.db, &key).await?;

    Ok(Json(songs))
}

/// POST /api/songs
pub async fn create_song(
    State(state): State<AppState>,
    Extension(ActingUser(acting)): Extension<ActingUser>,
    Json(new): Json<NewSong>,
) -> Result<(StatusCode, Json<Song>), ApiError> {
    let song = SongService::new(state.db.clone()).create(&acting, new).await?;

    Ok((StatusCode::CREATED, Json(song)))
}

/// PATCH /api/songs/{playlist}/{name}
///
/// Partial update addressed by the pre-update name and playlist; the
/// acting user is always the author component of the key.
pub async fn update_song(
    State(state): State<AppState>,
    Extension(ActingUser(acting)): Extension<ActingUser>,
    Path((playlist, name)): Path<(String, String)>,
    Json(patch): Json<SongPatch>,
) -> Result<Json<Song>, ApiError> {
    let song = SongService::new(state.db.clone())
        .update(&acting, &name, &playlist, patch)
        .await?;

    Ok(Json(song))
}

/// DELETE /api/songs/{playlist}/{name}
pub async fn delete_song(
    State(state): State<AppState>,
    Extension(ActingUser(acting)): Extension<ActingUser>,
    Path((playlist, name)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    SongService::new(state.db.clone())
        .delete(&acting, &name, &playlist)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
