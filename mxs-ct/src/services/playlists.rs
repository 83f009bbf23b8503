//! Playlist mutation service
//!
//! Playlist creation plus the membership links that let a song appear in
//! playlists beyond its owning one. Linking never copies or re-keys the
//! song row; the composite identity of a song stays with its original
//! author and playlist.

use chrono::Utc;
use mxs_common::db::models::{Playlist, SongKey};
use mxs_common::{Error, Result};
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::debug;

use crate::services::image_checker::is_image;
use crate::services::songs::PICTURE_URL_MESSAGE;

/// Fields of a playlist create request; the author is the acting username
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewPlaylist {
    pub name: String,
    #[serde(default)]
    pub genre: String,
    pub picture_url: String,
}

/// Playlist create and membership management
pub struct PlaylistService {
    db: SqlitePool,
}

impl PlaylistService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Create a playlist owned by the acting user
    pub async fn create(&self, acting: &str, new: NewPlaylist) -> Result<Playlist> {
        if new.name.trim().is_empty() {
            return Err(Error::Validation("name must not be empty".to_string()));
        }
        if !is_image(&new.picture_url) {
            return Err(Error::Validation(PICTURE_URL_MESSAGE.to_string()));
        }

        let playlist = Playlist {
            name: new.name,
            author_name: acting.to_string(),
            genre: new.genre,
            picture_url: new.picture_url,
            created_at: Utc::now(),
        };

        sqlx::query(
            r#"
            INSERT INTO playlists (name, author_name, genre, picture_url, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&playlist.name)
        .bind(&playlist.author_name)
        .bind(&playlist.genre)
        .bind(&playlist.picture_url)
        .bind(playlist.created_at)
        .execute(&self.db)
        .await
        .map_err(|e| Error::from_write(e, "playlist"))?;

        debug!(playlist = %playlist.name, author = %playlist.author_name, "Created playlist");

        Ok(playlist)
    }

    /// Link an existing song into a playlist owned by the acting user
    ///
    /// The song may belong to any author; the playlist must belong to the
    /// acting user. Both must exist, the check fails closed.
    pub async fn add_song(&self, acting: &str, playlist_name: &str, song: &SongKey) -> Result<()> {
        let mut tx = self.db.begin().await?;

        let playlist_exists: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM playlists WHERE name = ? AND author_name = ?")
                .bind(playlist_name)
                .bind(acting)
                .fetch_one(&mut *tx)
                .await?;
        if playlist_exists == 0 {
            return Err(Error::NotFound(format!(
                "playlist '{}' for author '{}'",
                playlist_name, acting
            )));
        }

        let song_exists: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM songs WHERE name = ? AND author_name = ? AND playlist_name = ?",
        )
        .bind(&song.name)
        .bind(&song.author_name)
        .bind(&song.playlist_name)
        .fetch_one(&mut *tx)
        .await?;
        if song_exists == 0 {
            return Err(Error::NotFound(format!(
                "song '{}' in playlist '{}' for author '{}'",
                song.name, song.playlist_name, song.author_name
            )));
        }

        sqlx::query(
            r#"
            INSERT INTO playlist_songs (
                song_name, song_author, song_playlist,
                playlist_name, playlist_author, added_at
            )
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&song.name)
        .bind(&song.author_name)
        .bind(&song.playlist_name)
        .bind(playlist_name)
        .bind(acting)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await
        .map_err(|e| Error::from_write(e, "playlist membership"))?;

        tx.commit().await?;

        debug!(
            song = %song.name,
            song_author = %song.author_name,
            playlist = %playlist_name,
            author = %acting,
            "Linked song into playlist"
        );

        Ok(())
    }

    /// Remove a membership link from a playlist owned by the acting user
    pub async fn remove_song(
        &self,
        acting: &str,
        playlist_name: &str,
        song: &SongKey,
    ) -> Result<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM playlist_songs
            WHERE song_name = ? AND song_author = ? AND song_playlist = ?
              AND playlist_name = ? AND playlist_author = ?
            "#,
        )
        .bind(&song.name)
        .bind(&song.author_name)
        .bind(&song.playlist_name)
        .bind(playlist_name)
        .bind(acting)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!(
                "song '{}' is not in playlist '{}' for author '{}'",
                song.name, playlist_name, acting
            )));
        }

        Ok(())
    }
}
