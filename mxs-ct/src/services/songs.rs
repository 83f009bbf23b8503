//! Song mutation service
//!
//! Enforces the catalog's write rules: the acting username (from the
//! session layer, never the request body) is the only possible author of a
//! created, updated, or deleted row; picture URLs are gated by the image
//! check before any write; and a create links the new song into its owning
//! playlist in the same transaction, failing closed when the playlist does
//! not exist.

use chrono::Utc;
use mxs_common::db::models::{Song, SongKey};
use mxs_common::{Error, Result};
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::debug;

use crate::services::image_checker::is_image;

/// How many songs the system-wide recent feed returns
pub const RECENT_SONGS_LIMIT: i64 = 8;

/// Surfaced when a picture URL fails the image check
pub const PICTURE_URL_MESSAGE: &str = "Please make sure your URL is a picture URL.";

const MAX_RATING: i64 = 10;

/// Fields of a song create request
///
/// There is deliberately no `author_name` field: the author is always the
/// acting username. Unknown fields are rejected at deserialization.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewSong {
    pub name: String,
    pub playlist_name: String,
    pub picture_url: String,
    pub song_url: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub album: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub rating: i64,
}

/// Partial field update for a song
///
/// `playlist_name` and `author_name` are identity- and ownership-bearing
/// and cannot appear here; together with the pre-update name they are the
/// lookup key of the row being changed. Supplying them is rejected at
/// deserialization, not silently ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SongPatch {
    pub name: Option<String>,
    pub picture_url: Option<String>,
    pub song_url: Option<String>,
    pub genre: Option<String>,
    pub album: Option<String>,
    pub artist: Option<String>,
    pub description: Option<String>,
    pub rating: Option<i64>,
}

/// Song create/update/delete with ownership and membership consistency
pub struct SongService {
    db: SqlitePool,
}

impl SongService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Create a song owned by the acting user
    ///
    /// The owning playlist `(new.playlist_name, acting)` must already
    /// exist; it is never auto-created. The song row and its membership
    /// link are written in one transaction.
    pub async fn create(&self, acting: &str, new: NewSong) -> Result<Song> {
        validate_required("name", &new.name)?;
        validate_required("playlist_name", &new.playlist_name)?;
        validate_required("song_url", &new.song_url)?;
        validate_rating(new.rating)?;

        if !is_image(&new.picture_url) {
            return Err(Error::Validation(PICTURE_URL_MESSAGE.to_string()));
        }

        let now = Utc::now();
        let song = Song {
            name: new.name,
            author_name: acting.to_string(),
            playlist_name: new.playlist_name,
            picture_url: new.picture_url,
            song_url: new.song_url,
            genre: new.genre,
            album: new.album,
            artist: new.artist,
            description: new.description,
            rating: new.rating,
            created_at: now,
            updated_at: now,
        };

        let mut tx = self.db.begin().await?;

        let playlist_exists: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM playlists WHERE name = ? AND author_name = ?")
                .bind(&song.playlist_name)
                .bind(acting)
                .fetch_one(&mut *tx)
                .await?;
        if playlist_exists == 0 {
            return Err(Error::NotFound(format!(
                "playlist '{}' for author '{}'",
                song.playlist_name, acting
            )));
        }

        sqlx::query(
            r#"
            INSERT INTO songs (
                name, author_name, playlist_name, picture_url, song_url,
                genre, album, artist, description, rating,
                created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&song.name)
        .bind(&song.author_name)
        .bind(&song.playlist_name)
        .bind(&song.picture_url)
        .bind(&song.song_url)
        .bind(&song.genre)
        .bind(&song.album)
        .bind(&song.artist)
        .bind(&song.description)
        .bind(song.rating)
        .bind(song.created_at)
        .bind(song.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| Error::from_write(e, "song"))?;

        // Membership link into the owning playlist
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
        .bind(&song.playlist_name)
        .bind(acting)
        .bind(song.created_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| Error::from_write(e, "playlist membership"))?;

        tx.commit().await?;

        debug!(
            song = %song.name,
            author = %song.author_name,
            playlist = %song.playlist_name,
            "Created song"
        );

        Ok(song)
    }

    /// Partially update a song owned by the acting user
    ///
    /// The row is addressed by `(current_song_name, acting,
    /// current_playlist_name)`; a foreign row is simply absent in the
    /// caller's namespace. The picture URL is re-validated when present.
    pub async fn update(
        &self,
        acting: &str,
        current_song_name: &str,
        current_playlist_name: &str,
        patch: SongPatch,
    ) -> Result<Song> {
        if let Some(name) = &patch.name {
            validate_required("name", name)?;
        }
        if let Some(song_url) = &patch.song_url {
            validate_required("song_url", song_url)?;
        }
        if let Some(rating) = patch.rating {
            validate_rating(rating)?;
        }
        if let Some(picture_url) = &patch.picture_url {
            if !is_image(picture_url) {
                return Err(Error::Validation(PICTURE_URL_MESSAGE.to_string()));
            }
        }

        let updated_at = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE songs SET
                name = COALESCE(?, name),
                picture_url = COALESCE(?, picture_url),
                song_url = COALESCE(?, song_url),
                genre = COALESCE(?, genre),
                album = COALESCE(?, album),
                artist = COALESCE(?, artist),
                description = COALESCE(?, description),
                rating = COALESCE(?, rating),
                updated_at = ?
            WHERE name = ? AND author_name = ? AND playlist_name = ?
            "#,
        )
        .bind(patch.name.as_deref())
        .bind(patch.picture_url.as_deref())
        .bind(patch.song_url.as_deref())
        .bind(patch.genre.as_deref())
        .bind(patch.album.as_deref())
        .bind(patch.artist.as_deref())
        .bind(patch.description.as_deref())
        .bind(patch.rating)
        .bind(updated_at)
        .bind(current_song_name)
        .bind(acting)
        .bind(current_playlist_name)
        .execute(&self.db)
        .await
        .map_err(|e| Error::from_write(e, "song"))?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!(
                "song '{}' in playlist '{}' for author '{}'",
                current_song_name, current_playlist_name, acting
            )));
        }

        let key = SongKey::new(
            patch.name.as_deref().unwrap_or(current_song_name),
            acting,
            current_playlist_name,
        );
        crate::db::songs::get(&self.db, &key)
            .await?
            .ok_or_else(|| Error::Internal("updated song row disappeared".to_string()))
    }

    /// Delete a song owned by the acting user
    ///
    /// Removal is immediate and irreversible; membership rows cascade.
    pub async fn delete(&self, acting: &str, name: &str, playlist_name: &str) -> Result<()> {
        let result =
            sqlx::query("DELETE FROM songs WHERE name = ? AND author_name = ? AND playlist_name = ?")
                .bind(name)
                .bind(acting)
                .bind(playlist_name)
                .execute(&self.db)
                .await?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!(
                "song '{}' in playlist '{}' for author '{}'",
                name, playlist_name, acting
            )));
        }

        debug!(song = %name, author = %acting, playlist = %playlist_name, "Deleted song");

        Ok(())
    }
}

fn validate_required(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::Validation(format!("{} must not be empty", field)));
    }
    Ok(())
}

fn validate_rating(rating: i64) -> Result<()> {
    if !(0..=MAX_RATING).contains(&rating) {
        return Err(Error::Validation(format!(
            "rating must be between 0 and {}",
            MAX_RATING
        )));
    }
    Ok(())
}
