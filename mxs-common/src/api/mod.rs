//! Shared API support code

pub mod auth;

pub use auth::{issue_token, validate_token};
