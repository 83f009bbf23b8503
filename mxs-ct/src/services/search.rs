//! Unified search across songs, playlists, and profiles
//!
//! One text query fans out to three independent sources: the song and
//! playlist tables and the external profile directory. The three result
//! shapes are normalized into the tagged [`SearchItem`] union and
//! concatenated in a fixed order: songs, then playlists, then profiles.
//! There is no relevance ranking, deduplication, or pagination.
//!
//! A failure from any one source aborts the whole aggregation with an
//! error naming that source; callers can always tell "no matches" from
//! "a source was unavailable".

use mxs_common::db::models::{Playlist, Profile, Song};
use mxs_common::{Error, Result};
use serde::Serialize;
use sqlx::SqlitePool;
use std::collections::BTreeMap;

use crate::db;
use crate::services::identity::IdentityResolver;

/// Link descriptor attached to each search item
///
/// Profiles and playlists navigate to a page path. Songs open a detail
/// overlay instead, carried as a query-parameter bag merged over the
/// caller's route context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Href {
    Path(String),
    Overlay { query: BTreeMap<String, String> },
}

/// One normalized search result
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SearchItem {
    Song {
        name: String,
        author_name: String,
        playlist_name: String,
        genre: String,
        picture_url: String,
        href: Href,
    },
    Playlist {
        name: String,
        author_name: String,
        genre: String,
        picture_url: String,
        href: Href,
    },
    Profile {
        username: String,
        picture_url: String,
        href: Href,
    },
}

/// Run the three-way search fan-out and normalize the results
///
/// `context` is the caller's opaque route context; it is merged into each
/// song item's overlay href, with the song's own keys winning collisions.
/// An empty or whitespace-only query returns an empty sequence without
/// contacting any source.
pub async fn filtered_items(
    db: &SqlitePool,
    identity: &dyn IdentityResolver,
    query: &str,
    context: &BTreeMap<String, String>,
) -> Result<Vec<SearchItem>> {
    let query = query.trim();
    if query.is_empty() {
        return Ok(Vec::new());
    }

    let songs_lookup = async {
        db::songs::search_by_name(db, query)
            .await
            .map_err(|e| mark_source("song catalog", e))
    };
    let playlists_lookup = async {
        db::playlists::search_by_name(db, query)
            .await
            .map_err(|e| mark_source("playlist catalog", e))
    };
    let profiles_lookup = identity.search_usernames(query);

    let (songs, playlists, profiles) =
        tokio::try_join!(songs_lookup, playlists_lookup, profiles_lookup)?;

    let mut items = Vec::with_capacity(songs.len() + playlists.len() + profiles.len());
    items.extend(songs.into_iter().map(|song| song_item(song, context)));
    items.extend(playlists.into_iter().map(playlist_item));
    items.extend(profiles.into_iter().map(profile_item));

    Ok(items)
}

/// Fan-out failures abort the aggregation; the message names the source so
/// the caller can distinguish which collaborator was unavailable.
fn mark_source(source: &str, err: Error) -> Error {
    match err {
        Error::Transient(msg) => Error::Transient(format!("{}: {}", source, msg)),
        other => Error::Transient(format!("{} unavailable: {}", source, other)),
    }
}

fn song_item(song: Song, context: &BTreeMap<String, String>) -> SearchItem {
    let mut query = context.clone();
    query.insert("song".to_string(), song.name.clone());
    query.insert("playlist".to_string(), song.playlist_name.clone());
    query.insert("profileName".to_string(), song.author_name.clone());

    SearchItem::Song {
        name: song.name,
        author_name: song.author_name,
        playlist_name: song.playlist_name,
        genre: song.genre,
        picture_url: song.picture_url,
        href: Href::Overlay { query },
    }
}

fn playlist_item(playlist: Playlist) -> SearchItem {
    SearchItem::Playlist {
        href: Href::Path(format!("/{}/{}", playlist.author_name, playlist.name)),
        name: playlist.name,
        author_name: playlist.author_name,
        genre: playlist.genre,
        picture_url: playlist.picture_url,
    }
}

fn profile_item(profile: Profile) -> SearchItem {
    SearchItem::Profile {
        href: Href::Path(format!("/{}", profile.username)),
        username: profile.username,
        picture_url: profile.profile_image_url,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_song() -> Song {
        Song {
            name: "Lo-fi Beat".to_string(),
            author_name: "alice".to_string(),
            playlist_name: "Chill".to_string(),
            picture_url: "https://example.com/cover.png".to_string(),
            song_url: "https://example.com/lofi.mp3".to_string(),
            genre: "lo-fi".to_string(),
            album: "".to_string(),
            artist: "".to_string(),
            description: "".to_string(),
            rating: 5,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_song_href_merges_route_context() {
        let mut context = BTreeMap::new();
        context.insert("tab".to_string(), "library".to_string());
        // A colliding key loses to the song's own values
        context.insert("song".to_string(), "stale".to_string());

        let item = song_item(sample_song(), &context);

        let SearchItem::Song { href: Href::Overlay { query }, .. } = item else {
            panic!("expected song overlay href");
        };
        assert_eq!(query.get("tab").map(String::as_str), Some("library"));
        assert_eq!(query.get("song").map(String::as_str), Some("Lo-fi Beat"));
        assert_eq!(query.get("playlist").map(String::as_str), Some("Chill"));
        assert_eq!(query.get("profileName").map(String::as_str), Some("alice"));
    }

    #[test]
    fn test_playlist_and_profile_hrefs_are_paths() {
        let playlist = Playlist {
            name: "Chill".to_string(),
            author_name: "alice".to_string(),
            genre: "lo-fi".to_string(),
            picture_url: "https://example.com/p.png".to_string(),
            created_at: Utc::now(),
        };
        let SearchItem::Playlist { href, .. } = playlist_item(playlist) else {
            panic!("expected playlist item");
        };
        assert_eq!(href, Href::Path("/alice/Chill".to_string()));

        let profile = Profile {
            username: "alice".to_string(),
            profile_image_url: "https://example.com/a.png".to_string(),
        };
        let SearchItem::Profile { href, .. } = profile_item(profile) else {
            panic!("expected profile item");
        };
        assert_eq!(href, Href::Path("/alice".to_string()));
    }

    #[test]
    fn test_serialized_items_are_tagged() {
        let item = profile_item(Profile {
            username: "alice".to_string(),
            profile_image_url: "https://example.com/a.png".to_string(),
        });

        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["type"], "profile");
        assert_eq!(json["href"], "/alice");
    }
}
