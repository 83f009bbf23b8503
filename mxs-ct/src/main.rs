//! mxs-ct (Catalog) - Playlist-sharing catalog service
//!
//! Serves the unified search endpoint and the song/playlist catalog with
//! owner-scoped mutations. Profiles come from the external identity
//! directory; this service never writes them.

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::info;

use mxs_common::api::auth::load_shared_secret;
use mxs_common::db::init_database;
use mxs_ct::config::CatalogConfig;
use mxs_ct::services::identity::HttpIdentityResolver;
use mxs_ct::{build_router, AppState};

#[derive(Parser, Debug)]
#[command(name = "mxs-ct", about = "MixShare catalog service")]
struct Args {
    /// Root folder holding the catalog database
    #[arg(long)]
    root_folder: Option<String>,

    /// TCP port to listen on
    #[arg(long, env = "MIXSHARE_PORT")]
    port: Option<u16>,

    /// Base URL of the identity directory service
    #[arg(long, env = "MIXSHARE_IDENTITY_URL")]
    identity_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!(
        "Starting MixShare Catalog (mxs-ct) v{}",
        env!("CARGO_PKG_VERSION")
    );

    let args = Args::parse();
    let config = CatalogConfig::resolve(args.root_folder.as_deref(), args.port, args.identity_url);

    let db_path = config.database_path();
    info!("Database path: {}", db_path.display());

    let pool = init_database(&db_path).await?;

    let shared_secret = load_shared_secret(&pool).await?;
    if shared_secret == 0 {
        info!("Session validation disabled (shared_secret = 0)");
    } else {
        info!("✓ Loaded session shared secret");
    }

    info!("Identity directory: {}", config.identity_url);
    let identity = Arc::new(HttpIdentityResolver::new(&config.identity_url)?);

    let state = AppState::new(pool, identity, shared_secret);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", config.port)).await?;
    info!("mxs-ct listening on http://127.0.0.1:{}", config.port);
    info!("Health check: http://127.0.0.1:{}/health", config.port);

    axum::serve(listener, app).await?;

    Ok(())
}
