//! Common error types for MixShare

use thiserror::Error;

/// Common result type for MixShare operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the MixShare services
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested profile, playlist, or song not found for a keyed lookup
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Missing or invalid acting identity for a mutation
    #[error("Unauthorized: {0}")]
    Auth(String),

    /// Composite-key uniqueness violated, or a concurrent write race lost
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Collaborator timeout or unavailability
    #[error("Transient failure: {0}")]
    Transient(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Classify an sqlx error from a write path.
    ///
    /// Composite-key uniqueness is the sole concurrency guard for catalog
    /// writes, so a unique violation surfaces as [`Error::Conflict`]. A
    /// foreign key violation means the referenced playlist or song row is
    /// absent and surfaces as [`Error::NotFound`].
    pub fn from_write(err: sqlx::Error, what: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            match db_err.kind() {
                sqlx::error::ErrorKind::UniqueViolation => {
                    return Error::Conflict(format!("{} already exists", what));
                }
                sqlx::error::ErrorKind::ForeignKeyViolation => {
                    return Error::NotFound(format!("{} references a missing row", what));
                }
                _ => {}
            }
        }
        Error::Database(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_carries_kind_and_message() {
        let err = Error::Validation("Please make sure your URL is a picture URL.".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid input: Please make sure your URL is a picture URL."
        );

        let err = Error::NotFound("song 'x'".to_string());
        assert_eq!(err.to_string(), "Not found: song 'x'");
    }
}
