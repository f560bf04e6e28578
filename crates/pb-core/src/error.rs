//! # AppError
//!
//! The one error type every `pb-core` port returns. `pb-api` turns each
//! variant into a status code; nothing here knows about HTTP.

use thiserror::Error;

/// Failure of a repository or auth operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// No row with this id; carries the entity name and the id.
    #[error("{0} not found with ID {1}")]
    NotFound(String, String),

    /// Unreadable request body, or a `user_id`/`role_id` naming no row.
    #[error("validation error: {0}")]
    ValidationError(String),

    /// Unknown username or wrong password.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// SQLite or Argon2 broke. The detail is logged, never sent to clients.
    #[error("internal service error: {0}")]
    Internal(String),

    /// A UNIQUE column rejected the insert, e.g. a taken username.
    #[error("conflict: {0}")]
    Conflict(String),
}

impl AppError {
    pub fn not_found(entity: &str, id: impl ToString) -> Self {
        Self::NotFound(entity.to_string(), id.to_string())
    }
}

/// Shorthand used by every port signature.
pub type Result<T> = std::result::Result<T, AppError>;
