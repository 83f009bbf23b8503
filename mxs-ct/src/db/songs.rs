//! Song table queries
//!
//! Read paths for song rows. All keyed lookups take a [`SongKey`] so key
//! fields cannot be transposed; writes live in the song service where they
//! run inside transactions.

use mxs_common::db::models::{PlaylistKey, Song, SongKey};
use mxs_common::Result;
use sqlx::SqlitePool;

use super::escape_like;

const SONG_COLUMNS: &str = "name, author_name, playlist_name, picture_url, song_url, genre, \
     album, artist, description, rating, created_at, updated_at";

/// Get a song by its composite key
pub async fn get(db: &SqlitePool, key: &SongKey) -> Result<Option<Song>> {
    let song = sqlx::query_as::<_, Song>(&format!(
        "SELECT {SONG_COLUMNS} FROM songs \
         WHERE name = ? AND author_name = ? AND playlist_name = ?"
    ))
    .bind(&key.name)
    .bind(&key.author_name)
    .bind(&key.playlist_name)
    .fetch_optional(db)
    .await?;

    Ok(song)
}

/// Most recently created songs system-wide, newest first
pub async fn recent(db: &SqlitePool, limit: i64) -> Result<Vec<Song>> {
    let songs = sqlx::query_as::<_, Song>(&format!(
        "SELECT {SONG_COLUMNS} FROM songs ORDER BY created_at DESC LIMIT ?"
    ))
    .bind(limit)
    .fetch_all(db)
    .await?;

    Ok(songs)
}

/// Substring match of a query against song names
pub async fn search_by_name(db: &SqlitePool, fragment: &str) -> Result<Vec<Song>> {
    let pattern = format!("%{}%", escape_like(fragment));

    let songs = sqlx::query_as::<_, Song>(&format!(
        "SELECT {SONG_COLUMNS} FROM songs WHERE name LIKE ? ESCAPE '\\' ORDER BY name ASC"
    ))
    .bind(pattern)
    .fetch_all(db)
    .await?;

    Ok(songs)
}

/// Songs whose membership includes the given playlist
///
/// Returns songs linked into `(playlist.name, playlist.author_name)` via
/// the membership table, in the order they were added. The owning playlist
/// always has a membership row, so this covers owned and adopted songs
/// alike.
pub async fn in_playlist(db: &SqlitePool, playlist: &PlaylistKey) -> Result<Vec<Song>> {
    let songs = sqlx::query_as::<_, Song>(
        r#"
        SELECT s.name, s.author_name, s.playlist_name, s.picture_url, s.song_url, s.genre,
               s.album, s.artist, s.description, s.rating, s.created_at, s.updated_at
        FROM songs s
        JOIN playlist_songs ps
          ON ps.song_name = s.name
         AND ps.song_author = s.author_name
         AND ps.song_playlist = s.playlist_name
        WHERE ps.playlist_name = ? AND ps.playlist_author = ?
        ORDER BY ps.added_at ASC, s.name ASC
        "#,
    )
    .bind(&playlist.name)
    .bind(&playlist.author_name)
    .fetch_all(db)
    .await?;

    Ok(songs)
}
