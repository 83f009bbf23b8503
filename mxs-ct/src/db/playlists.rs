//! Playlist table queries

use mxs_common::db::models::{Playlist, PlaylistKey};
use mxs_common::Result;
use sqlx::SqlitePool;

use super::escape_like;

const PLAYLIST_COLUMNS: &str = "name, author_name, genre, picture_url, created_at";

/// Get a playlist by its composite key
pub async fn get(db: &SqlitePool, key: &PlaylistKey) -> Result<Option<Playlist>> {
    let playlist = sqlx::query_as::<_, Playlist>(&format!(
        "SELECT {PLAYLIST_COLUMNS} FROM playlists WHERE name = ? AND author_name = ?"
    ))
    .bind(&key.name)
    .bind(&key.author_name)
    .fetch_optional(db)
    .await?;

    Ok(playlist)
}

/// Whether a playlist row exists for the given key
pub async fn exists(db: &SqlitePool, key: &PlaylistKey) -> Result<bool> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM playlists WHERE name = ? AND author_name = ?")
            .bind(&key.name)
            .bind(&key.author_name)
            .fetch_one(db)
            .await?;

    Ok(count > 0)
}

/// All playlists owned by one author
pub async fn by_author(db: &SqlitePool, author_name: &str) -> Result<Vec<Playlist>> {
    let playlists = sqlx::query_as::<_, Playlist>(&format!(
        "SELECT {PLAYLIST_COLUMNS} FROM playlists WHERE author_name = ? ORDER BY created_at DESC"
    ))
    .bind(author_name)
    .fetch_all(db)
    .await?;

    Ok(playlists)
}

/// Substring match of a query against playlist names
pub async fn search_by_name(db: &SqlitePool, fragment: &str) -> Result<Vec<Playlist>> {
    let pattern = format!("%{}%", escape_like(fragment));

    let playlists = sqlx::query_as::<_, Playlist>(&format!(
        "SELECT {PLAYLIST_COLUMNS} FROM playlists WHERE name LIKE ? ESCAPE '\\' ORDER BY name ASC"
    ))
    .bind(pattern)
    .fetch_all(db)
    .await?;

    Ok(playlists)
}
