//! Database initialization
//!
//! Creates the catalog database on first run and brings an existing one up
//! to the expected schema. All `CREATE TABLE` statements are idempotent.

use crate::{Error, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// Initialize database connection and create tables if needed
///
/// The connect options apply per pooled connection: foreign keys stay on
/// for every connection (composite-key referential integrity relies on
/// them) and WAL allows concurrent readers with one writer.
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_path_str = db_path
        .to_str()
        .ok_or_else(|| Error::Config(format!("Invalid database path: {:?}", db_path)))?;

    let options = SqliteConnectOptions::from_str(db_path_str)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(options)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    create_settings_table(&pool).await?;
    create_playlists_table(&pool).await?;
    create_songs_table(&pool).await?;
    create_playlist_songs_table(&pool).await?;

    Ok(pool)
}

/// Create the settings table (shared secret, service settings)
async fn create_settings_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Create the playlists table
///
/// A playlist is identified by `(name, author_name)`: the name is unique
/// only within one author's namespace.
async fn create_playlists_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS playlists (
            name TEXT NOT NULL,
            author_name TEXT NOT NULL,
            genre TEXT NOT NULL DEFAULT '',
            picture_url TEXT NOT NULL,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            PRIMARY KEY (name, author_name)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Create the songs table
///
/// A song row is identified by `(name, author_name, playlist_name)` and its
/// owning playlist must exist; the foreign key fails the insert closed when
/// it does not.
async fn create_songs_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS songs (
            name TEXT NOT NULL,
            author_name TEXT NOT NULL,
            playlist_name TEXT NOT NULL,
            picture_url TEXT NOT NULL,
            song_url TEXT NOT NULL,
            genre TEXT NOT NULL DEFAULT '',
            album TEXT NOT NULL DEFAULT '',
            artist TEXT NOT NULL DEFAULT '',
            description TEXT NOT NULL DEFAULT '',
            rating INTEGER NOT NULL DEFAULT 0,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            PRIMARY KEY (name, author_name, playlist_name),
            FOREIGN KEY (playlist_name, author_name)
                REFERENCES playlists (name, author_name)
                ON UPDATE CASCADE,
            CHECK (rating >= 0 AND rating <= 10)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_songs_created_at ON songs (created_at DESC)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Create the playlist membership linking table
///
/// Many-to-many: one song row can be linked into playlists beyond its
/// owning playlist (adding another author's song to your own playlist
/// links here, it never copies or re-keys the song row).
async fn create_playlist_songs_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS playlist_songs (
            song_name TEXT NOT NULL,
            song_author TEXT NOT NULL,
            song_playlist TEXT NOT NULL,
            playlist_name TEXT NOT NULL,
            playlist_author TEXT NOT NULL,
            added_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
            PRIMARY KEY (song_name, song_author, song_playlist, playlist_name, playlist_author),
            FOREIGN KEY (song_name, song_author, song_playlist)
                REFERENCES songs (name, author_name, playlist_name)
                ON DELETE CASCADE ON UPDATE CASCADE,
            FOREIGN KEY (playlist_name, playlist_author)
                REFERENCES playlists (name, author_name)
                ON DELETE CASCADE ON UPDATE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
