//! User storage trait and types.

use thiserror::Error;

use super::User;

/// Error type for user operations.
#[derive(Debug, Error)]
pub enum UserError {
    /// No such user.
    #[error("User not found: {0}")]
    NotFound(String),
    /// Username or email is already registered.
    #[error("{0}")]
    Conflict(String),
    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

/// Request to register a new user.
#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    /// Already hashed by the caller; the store never sees raw passwords.
    pub password_hash: String,
}

/// Trait for user storage backends.
pub trait UserStore: Send + Sync {
    /// Register a user. Fails with [`UserError::Conflict`] when the
    /// username or email is taken, creating no row.
    fn create(&self, request: CreateUserRequest) -> Result<User, UserError>;

    /// Get a user by ID.
    fn get(&self, id: &str) -> Result<Option<User>, UserError>;

    /// Look a user up by username (login).
    fn find_by_username(&self, username: &str) -> Result<Option<User>, UserError>;
}
