//! Session token validation
//!
//! The identity provider issues tokens of the form
//! `username:timestamp:hash` where
//! - `timestamp` is the issue time (i64 Unix epoch ms)
//! - `hash` is SHA-256 over `username|timestamp|shared_secret`
//!
//! The shared secret lives in the database settings table. Setting it to 0
//! disables hash and expiry checking; the token then only needs to be
//! well-formed.
//!
//! # Pure Functions
//!
//! This module contains only pure functions and database operations.
//! No HTTP framework dependencies - those live in the service crates.

use sha2::{Digest, Sha256};
use sqlx::SqlitePool;
use std::time::{SystemTime, UNIX_EPOCH};

/// Sessions expire 24 hours after issue
pub const SESSION_TTL_MS: i64 = 24 * 60 * 60 * 1000;

/// Tolerated clock drift into the future
const FUTURE_DRIFT_MS: i64 = 1000;

// ========================================
// Error Types
// ========================================

/// Session token validation error types
#[derive(Debug, Clone)]
pub enum SessionAuthError {
    /// Token does not have the username:timestamp:hash shape
    MalformedToken(String),

    /// Issue timestamp outside the acceptable window
    InvalidTimestamp {
        timestamp: i64,
        now: i64,
        reason: String,
    },

    /// Hash does not match calculated value
    InvalidHash,

    /// Database error loading shared secret
    DatabaseError(String),
}

impl std::fmt::Display for SessionAuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionAuthError::MalformedToken(reason) => {
                write!(f, "Malformed session token: {}", reason)
            }
            SessionAuthError::InvalidTimestamp { reason, .. } => {
                write!(f, "Invalid timestamp: {}", reason)
            }
            SessionAuthError::InvalidHash => write!(f, "Invalid hash"),
            SessionAuthError::DatabaseError(err) => write!(f, "Database error: {}", err),
        }
    }
}

impl std::error::Error for SessionAuthError {}

// ========================================
// Shared Secret Management
// ========================================

/// Load shared secret from database settings
///
/// - Key: `session_shared_secret`
/// - Value: i64
/// - Special value 0: Disables token checking
pub async fn load_shared_secret(db: &SqlitePool) -> Result<i64, SessionAuthError> {
    let result: Option<(String,)> =
        sqlx::query_as("SELECT value FROM settings WHERE key = 'session_shared_secret'")
            .fetch_optional(db)
            .await
            .map_err(|e| SessionAuthError::DatabaseError(e.to_string()))?;

    match result {
        Some((value,)) => value
            .parse::<i64>()
            .map_err(|e| SessionAuthError::DatabaseError(format!("Invalid i64: {}", e))),
        None => {
            // Not found - generate and store new secret
            initialize_shared_secret(db).await
        }
    }
}

/// Initialize shared secret if not present
///
/// Generates a cryptographically random non-zero i64.
pub async fn initialize_shared_secret(db: &SqlitePool) -> Result<i64, SessionAuthError> {
    use rand::Rng;

    let mut rng = rand::thread_rng();
    let secret: i64 = loop {
        let val = rng.gen::<i64>();
        if val != 0 {
            break val;
        }
    };

    sqlx::query("INSERT OR REPLACE INTO settings (key, value) VALUES ('session_shared_secret', ?)")
        .bind(secret.to_string())
        .execute(db)
        .await
        .map_err(|e| SessionAuthError::DatabaseError(e.to_string()))?;

    Ok(secret)
}

// ========================================
// Token Issue and Validation
// ========================================

/// Issue a session token for a username at the given timestamp
///
/// # Examples
///
/// ```
/// use mxs_common::api::auth::issue_token;
///
/// let token = issue_token("alice", 123456789, 1730000000000);
/// assert_eq!(token.split(':').count(), 3);
/// assert!(token.starts_with("alice:1730000000000:"));
/// ```
pub fn issue_token(username: &str, shared_secret: i64, timestamp_ms: i64) -> String {
    let hash = calculate_token_hash(username, timestamp_ms, shared_secret);
    format!("{}:{}:{}", username, timestamp_ms, hash)
}

/// Validate a session token and return the acting username
///
/// Checks, in order: token shape, issue-time window (≤24h past, ≤1s
/// future), then the hash. A shared secret of 0 skips the window and hash
/// checks entirely.
pub fn validate_token(token: &str, shared_secret: i64) -> Result<String, SessionAuthError> {
    // Split from the right so usernames may contain ':'
    let mut parts = token.rsplitn(3, ':');
    let hash = parts
        .next()
        .ok_or_else(|| SessionAuthError::MalformedToken("empty token".to_string()))?;
    let timestamp: i64 = parts
        .next()
        .ok_or_else(|| SessionAuthError::MalformedToken("missing timestamp".to_string()))?
        .parse()
        .map_err(|_| SessionAuthError::MalformedToken("timestamp is not an integer".to_string()))?;
    let username = parts
        .next()
        .ok_or_else(|| SessionAuthError::MalformedToken("missing username".to_string()))?;

    if username.is_empty() {
        return Err(SessionAuthError::MalformedToken(
            "empty username".to_string(),
        ));
    }

    // Secret 0 disables checking (development mode)
    if shared_secret == 0 {
        return Ok(username.to_string());
    }

    validate_issue_timestamp(timestamp)?;

    let calculated = calculate_token_hash(username, timestamp, shared_secret);
    if hash != calculated {
        return Err(SessionAuthError::InvalidHash);
    }

    Ok(username.to_string())
}

/// Validate a token issue timestamp against the session window
///
/// # Examples
///
/// ```
/// use mxs_common::api::auth::validate_issue_timestamp;
/// use std::time::{SystemTime, UNIX_EPOCH};
///
/// let now = SystemTime::now()
///     .duration_since(UNIX_EPOCH)
///     .unwrap()
///     .as_millis() as i64;
///
/// // A token issued a minute ago is valid
/// assert!(validate_issue_timestamp(now - 60_000).is_ok());
///
/// // A token issued two days ago is expired
/// assert!(validate_issue_timestamp(now - 2 * 86_400_000).is_err());
/// ```
pub fn validate_issue_timestamp(timestamp: i64) -> Result<(), SessionAuthError> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_millis() as i64;

    let age = now - timestamp;

    if age > SESSION_TTL_MS {
        return Err(SessionAuthError::InvalidTimestamp {
            timestamp,
            now,
            reason: format!("Session expired {}ms ago", age - SESSION_TTL_MS),
        });
    }

    if age < -FUTURE_DRIFT_MS {
        return Err(SessionAuthError::InvalidTimestamp {
            timestamp,
            now,
            reason: format!("Issued {}ms in the future", age.abs()),
        });
    }

    Ok(())
}

fn calculate_token_hash(username: &str, timestamp: i64, shared_secret: i64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("{}|{}|{}", username, timestamp, shared_secret).as_bytes());
    format!("{:x}", hasher.finalize())
}

// ========================================
// Tests
// ========================================

#[cfg(test)]
mod tests {
    use super::*;

    fn now_ms() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_millis() as i64
    }

    #[test]
    fn test_valid_token_roundtrip() {
        let secret = 123456789_i64;
        let token = issue_token("alice", secret, now_ms());

        let username = validate_token(&token, secret).unwrap();
        assert_eq!(username, "alice");
    }

    #[test]
    fn test_tampered_username_rejected() {
        let secret = 123456789_i64;
        let token = issue_token("alice", secret, now_ms());

        // Rewrite the username portion, keeping timestamp and hash
        let tampered = format!("bob{}", token.trim_start_matches("alice"));

        assert!(matches!(
            validate_token(&tampered, secret),
            Err(SessionAuthError::InvalidHash)
        ));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = issue_token("alice", 123456789, now_ms());

        assert!(matches!(
            validate_token(&token, 987654321),
            Err(SessionAuthError::InvalidHash)
        ));
    }

    #[test]
    fn test_expired_session_rejected() {
        let secret = 42_i64;
        let token = issue_token("alice", secret, now_ms() - SESSION_TTL_MS - 1000);

        assert!(matches!(
            validate_token(&token, secret),
            Err(SessionAuthError::InvalidTimestamp { .. })
        ));
    }

    #[test]
    fn test_future_token_rejected() {
        let secret = 42_i64;
        let token = issue_token("alice", secret, now_ms() + 60_000);

        assert!(matches!(
            validate_token(&token, secret),
            Err(SessionAuthError::InvalidTimestamp { .. })
        ));
    }

    #[test]
    fn test_malformed_tokens_rejected() {
        let secret = 42_i64;

        assert!(validate_token("", secret).is_err());
        assert!(validate_token("alice", secret).is_err());
        assert!(validate_token("alice:notanumber:abc", secret).is_err());
        assert!(validate_token(":123:abc", secret).is_err());
    }

    #[test]
    fn test_secret_zero_disables_checking() {
        // Expired token with a nonsense hash, accepted when auth is disabled
        let token = format!("alice:{}:nonsense", now_ms() - 10 * SESSION_TTL_MS);

        let username = validate_token(&token, 0).unwrap();
        assert_eq!(username, "alice");
    }

    #[test]
    fn test_username_with_colon_survives() {
        let secret = 7_i64;
        let token = issue_token("a:b", secret, now_ms());

        let username = validate_token(&token, secret).unwrap();
        assert_eq!(username, "a:b");
    }
}
