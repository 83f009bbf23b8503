//! Identity directory client
//!
//! The user directory is an external service: it owns profile records
//! (username + avatar) and this catalog only reads them. The trait seam
//! keeps the search aggregator and the profile API testable without a
//! running directory.

use async_trait::async_trait;
use mxs_common::db::models::Profile;
use mxs_common::{Error, Result};
use std::time::Duration;

const USER_AGENT: &str = concat!("MixShare/", env!("CARGO_PKG_VERSION"));

/// Bounded timeout for directory calls; a slow directory is a transient
/// failure, not a hung search.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Read-only view of the external user directory
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Look up one profile by exact username
    async fn lookup_by_username(&self, username: &str) -> Result<Option<Profile>>;

    /// Free-text search of the directory; bounded, order unspecified
    async fn search_usernames(&self, query: &str) -> Result<Vec<Profile>>;

    /// Bounded listing of all directory profiles
    async fn list_profiles(&self) -> Result<Vec<Profile>>;
}

/// HTTP client for the identity directory service
pub struct HttpIdentityResolver {
    http_client: reqwest::Client,
    base_url: String,
}

impl HttpIdentityResolver {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn fetch_profiles(&self, url: String) -> Result<Vec<Profile>> {
        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(classify_reqwest_error)?;

        if !response.status().is_success() {
            return Err(Error::Transient(format!(
                "profile directory returned HTTP {}",
                response.status().as_u16()
            )));
        }

        let profiles: Vec<Profile> = response
            .json()
            .await
            .map_err(|e| Error::Transient(format!("profile directory sent invalid JSON: {}", e)))?;

        Ok(profiles)
    }
}

#[async_trait]
impl IdentityResolver for HttpIdentityResolver {
    async fn lookup_by_username(&self, username: &str) -> Result<Option<Profile>> {
        let url = format!(
            "{}/users?username={}&limit=1",
            self.base_url,
            urlencode(username)
        );
        let profiles = self.fetch_profiles(url).await?;

        Ok(profiles.into_iter().next())
    }

    async fn search_usernames(&self, query: &str) -> Result<Vec<Profile>> {
        let url = format!("{}/users?query={}", self.base_url, urlencode(query));
        self.fetch_profiles(url).await
    }

    async fn list_profiles(&self) -> Result<Vec<Profile>> {
        let url = format!("{}/users", self.base_url);
        self.fetch_profiles(url).await
    }
}

/// Timeouts and connection failures are transient; anything else from the
/// client side is internal.
fn classify_reqwest_error(err: reqwest::Error) -> Error {
    if err.is_timeout() || err.is_connect() {
        Error::Transient(format!("profile directory unavailable: {}", err))
    } else {
        Error::Internal(format!("profile directory request failed: {}", err))
    }
}

fn urlencode(raw: &str) -> String {
    // Query-string percent-encoding for the handful of reserved bytes a
    // username or search fragment can contain.
    let mut encoded = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char);
            }
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    encoded
}
