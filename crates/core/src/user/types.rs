//! User data types.

use chrono::{DateTime, Utc};

/// A registered rider account.
///
/// Immutable once created; owns tickets and payments through foreign keys
/// on those tables.
#[derive(Debug, Clone)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    /// Salted digest, never the raw password.
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}
