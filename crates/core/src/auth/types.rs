use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tagged outcomes of resolving a bearer credential.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("No token provided")]
    Missing,

    #[error("Token expired")]
    Expired,

    #[error("Invalid token")]
    Invalid,
}

/// Claims carried by an issued token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: String,
    pub username: String,
    /// Expiry as unix seconds.
    pub exp: i64,
}
