//! mxs-ct library - MixShare catalog service
//!
//! Playlist-sharing catalog: profiles own playlists, playlists contain
//! songs, and songs can be linked into further playlists. Exposes the
//! unified search fan-out and the owner-scoped song/playlist mutations
//! over JSON.

use axum::Router;
use sqlx::SqlitePool;
use std::sync::Arc;

pub mod api;
pub mod config;
pub mod db;
pub mod services;

use services::identity::IdentityResolver;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Catalog database connection pool
    pub db: SqlitePool,
    /// Client for the external identity directory
    pub identity: Arc<dyn IdentityResolver>,
    /// Shared secret for session token validation (0 disables)
    pub shared_secret: i64,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, identity: Arc<dyn IdentityResolver>, shared_secret: i64) -> Self {
        Self {
            db,
            identity,
            shared_secret,
        }
    }
}

/// Build application router
///
/// All read surfaces are public; mutating methods on the `/api` routes are
/// gated by the session middleware. The health endpoint stays outside the
/// gate.
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;
    use axum::routing::{get, patch, post};
    use tower_http::trace::TraceLayer;

    let api = Router::new()
        .route("/api/search", get(api::search))
        .route("/api/songs", get(api::recent_songs).post(api::create_song))
        .route(
            "/api/songs/:playlist/:name",
            patch(api::update_song).delete(api::delete_song),
        )
        .route("/api/playlists", post(api::create_playlist))
        .route(
            "/api/playlists/:name/songs",
            post(api::add_playlist_song).delete(api::remove_playlist_song),
        )
        .route("/api/profiles", get(api::list_profiles))
        .route("/api/profiles/:username", get(api::get_profile))
        .route(
            "/api/profiles/:username/playlists",
            get(api::profile_playlists),
        )
        .route(
            "/api/profiles/:username/playlists/:playlist",
            get(api::get_playlist),
        )
        .route(
            "/api/profiles/:username/playlists/:playlist/songs",
            get(api::playlist_songs),
        )
        .route(
            "/api/profiles/:username/playlists/:playlist/songs/:song",
            get(api::get_song),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::auth_middleware,
        ));

    Router::new()
        .merge(api)
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
