//! Catalog service configuration
//!
//! Values resolve in the usual priority order: command-line argument,
//! environment variable (handled by clap), TOML config file, compiled
//! default.

use mxs_common::config::{config_file_value, resolve_root_folder};
use std::path::PathBuf;

/// Default TCP port of the catalog service
pub const DEFAULT_PORT: u16 = 5790;

/// Default base URL of the identity directory service
pub const DEFAULT_IDENTITY_URL: &str = "http://127.0.0.1:5795";

/// Resolved service configuration
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub root_folder: PathBuf,
    pub port: u16,
    pub identity_url: String,
}

impl CatalogConfig {
    /// Resolve configuration from CLI values and the environment
    pub fn resolve(
        root_folder_arg: Option<&str>,
        port_arg: Option<u16>,
        identity_url_arg: Option<String>,
    ) -> Self {
        let root_folder = resolve_root_folder(root_folder_arg, "MIXSHARE_ROOT_FOLDER");

        let port = port_arg
            .or_else(|| config_file_value("catalog_port").and_then(|v| v.parse().ok()))
            .unwrap_or(DEFAULT_PORT);

        let identity_url = identity_url_arg
            .or_else(|| config_file_value("identity_url"))
            .unwrap_or_else(|| DEFAULT_IDENTITY_URL.to_string());

        Self {
            root_folder,
            port,
            identity_url,
        }
    }

    /// Path of the catalog database inside the root folder
    pub fn database_path(&self) -> PathBuf {
        self.root_folder.join("mixshare.db")
    }
}
