//! Database models and composite key types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user's public identity, owned by the external identity directory.
///
/// Never written by the catalog; read-only projection of the directory's
/// user records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub username: String,
    pub profile_image_url: String,
}

/// Composite natural key of a playlist.
///
/// A playlist name is unique only within one author's namespace. All store
/// operations take this struct rather than bare strings so key fields
/// cannot be transposed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlaylistKey {
    pub name: String,
    pub author_name: String,
}

impl PlaylistKey {
    pub fn new(name: impl Into<String>, author_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            author_name: author_name.into(),
        }
    }
}

/// Composite natural key of a song.
///
/// The same song name may recur across authors or across one author's
/// playlists, but not twice for one author within one playlist.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SongKey {
    pub name: String,
    pub author_name: String,
    pub playlist_name: String,
}

impl SongKey {
    pub fn new(
        name: impl Into<String>,
        author_name: impl Into<String>,
        playlist_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            author_name: author_name.into(),
            playlist_name: playlist_name.into(),
        }
    }
}

/// Playlist row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Playlist {
    pub name: String,
    pub author_name: String,
    pub genre: String,
    pub picture_url: String,
    pub created_at: DateTime<Utc>,
}

impl Playlist {
    pub fn key(&self) -> PlaylistKey {
        PlaylistKey::new(&self.name, &self.author_name)
    }
}

/// Song row
///
/// Identity is the `(name, author_name, playlist_name)` triple; the owning
/// playlist is `(playlist_name, author_name)`. Membership in further
/// playlists lives in the `playlist_songs` join table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Song {
    pub name: String,
    pub author_name: String,
    pub playlist_name: String,
    pub picture_url: String,
    pub song_url: String,
    pub genre: String,
    pub album: String,
    pub artist: String,
    pub description: String,
    pub rating: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Song {
    pub fn key(&self) -> SongKey {
        SongKey::new(&self.name, &self.author_name, &self.playlist_name)
    }
}
