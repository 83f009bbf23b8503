//! HTTP API handlers for mxs-ct

pub mod auth;
pub mod error;
pub mod health;
pub mod playlists;
pub mod profiles;
pub mod search;
pub mod songs;

pub use auth::{auth_middleware, ActingUser};
pub use error::ApiError;
pub use health::health_routes;
pub use playlists::{
    add_playlist_song, create_playlist, get_playlist, profile_playlists, remove_playlist_song,
};
pub use profiles::{get_profile, list_profiles};
pub use search::search;
pub use songs::{create_song, delete_song, get_song, playlist_songs, recent_songs, update_song};
