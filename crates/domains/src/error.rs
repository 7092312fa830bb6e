//! # PlatformError
//!
//! Centralized error handling for the Hearth core. Every operation the
//! core exposes resolves to one of these kinds; the transport layer that
//! sits above this workspace maps kinds to responses.

use thiserror::Error;

/// The primary error type for all core operations.
///
/// Kinds are deliberately coarse: callers branch on the kind, never on
/// the message. Errors are comparable so tests can assert on them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    /// Referenced entity absent (e.g. Category, Chat, Like).
    #[error("{0} not found with id {1}")]
    NotFound(&'static str, String),

    /// Uniqueness violation (duplicate like, duplicate active chat).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Required field missing/empty or over its length limit.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The access policy denied the caller.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Operation not valid for the entity's current state
    /// (e.g. posting to an ended chat).
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Underlying persistence or file operation failed.
    #[error("storage error: {0}")]
    Storage(String),
}

impl PlatformError {
    /// Shorthand for the most common kind.
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound(entity, id.to_string())
    }

    pub fn storage(msg: impl ToString) -> Self {
        Self::Storage(msg.to_string())
    }
}

/// A specialized Result type for Hearth core logic.
pub type Result<T> = std::result::Result<T, PlatformError>;
