//! Test utilities for catalog integration tests

// Not every test binary uses every helper
#![allow(dead_code)]

use async_trait::async_trait;
use mxs_common::db::init_database;
use mxs_common::db::models::{Playlist, Profile, Song};
use mxs_common::{Error, Result};
use mxs_ct::services::identity::IdentityResolver;
use mxs_ct::services::playlists::{NewPlaylist, PlaylistService};
use mxs_ct::services::songs::{NewSong, SongService};
use sqlx::SqlitePool;
use tempfile::TempDir;

/// A picture URL that passes the image check
pub const PICTURE_URL: &str = "https://example.com/cover.png";

/// A URL that fails the image check
pub const NOT_A_PICTURE_URL: &str = "https://example.com/page.html";

/// Create temporary test database with the full schema applied
///
/// Returns (TempDir, SqlitePool) - TempDir must be kept alive for the
/// duration of the test
pub async fn create_test_db() -> (TempDir, SqlitePool) {
    let temp_dir = TempDir::new().expect("create temp dir");
    let db_path = temp_dir.path().join("test_mixshare.db");

    let pool = init_database(&db_path).await.expect("init test database");

    (temp_dir, pool)
}

/// In-memory identity directory for tests
///
/// `fail` simulates an unavailable directory service: every call returns
/// a transient error.
#[derive(Default)]
pub struct StubDirectory {
    pub profiles: Vec<Profile>,
    pub fail: bool,
}

impl StubDirectory {
    pub fn with_usernames(usernames: &[&str]) -> Self {
        Self {
            profiles: usernames
                .iter()
                .map(|username| Profile {
                    username: (*username).to_string(),
                    profile_image_url: format!("https://example.com/avatars/{}.png", username),
                })
                .collect(),
            fail: false,
        }
    }

    pub fn unavailable() -> Self {
        Self {
            profiles: Vec::new(),
            fail: true,
        }
    }

    fn check_available(&self) -> Result<()> {
        if self.fail {
            return Err(Error::Transient(
                "profile directory unavailable: stubbed outage".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl IdentityResolver for StubDirectory {
    async fn lookup_by_username(&self, username: &str) -> Result<Option<Profile>> {
        self.check_available()?;
        Ok(self
            .profiles
            .iter()
            .find(|profile| profile.username == username)
            .cloned())
    }

    async fn search_usernames(&self, query: &str) -> Result<Vec<Profile>> {
        self.check_available()?;
        let query = query.to_ascii_lowercase();
        Ok(self
            .profiles
            .iter()
            .filter(|profile| profile.username.to_ascii_lowercase().contains(&query))
            .cloned()
            .collect())
    }

    async fn list_profiles(&self) -> Result<Vec<Profile>> {
        self.check_available()?;
        Ok(self.profiles.clone())
    }
}

/// Create a playlist through the service layer
pub async fn seed_playlist(db: &SqlitePool, author: &str, name: &str) -> Playlist {
    PlaylistService::new(db.clone())
        .create(
            author,
            NewPlaylist {
                name: name.to_string(),
                genre: "mixed".to_string(),
                picture_url: PICTURE_URL.to_string(),
            },
        )
        .await
        .expect("seed playlist")
}

/// Create a song through the service layer
pub async fn seed_song(db: &SqlitePool, author: &str, playlist: &str, name: &str) -> Song {
    SongService::new(db.clone())
        .create(author, new_song(name, playlist))
        .await
        .expect("seed song")
}

/// A valid song create request for the given name and playlist
pub fn new_song(name: &str, playlist: &str) -> NewSong {
    NewSong {
        name: name.to_string(),
        playlist_name: playlist.to_string(),
        picture_url: PICTURE_URL.to_string(),
        song_url: format!("https://example.com/audio/{}.mp3", name.replace(' ', "-")),
        genre: "lo-fi".to_string(),
        album: "Test Album".to_string(),
        artist: "Test Artist".to_string(),
        description: "A test song".to_string(),
        rating: 5,
    }
}
