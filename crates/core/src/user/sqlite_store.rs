//! SQLite-backed user store implementation.

use chrono::{DateTime, Utc};
use rusqlite::params;

use crate::db::Db;

use super::{CreateUserRequest, User, UserError, UserStore};

const USER_COLUMNS: &str = "id, username, email, password_hash, created_at";

/// SQLite-backed user store.
pub struct SqliteUserStore {
    db: Db,
}

impl SqliteUserStore {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    fn row_to_user(row: &rusqlite::Row) -> rusqlite::Result<User> {
        let id: String = row.get(0)?;
        let username: String = row.get(1)?;
        let email: String = row.get(2)?;
        let password_hash: String = row.get(3)?;
        let created_at_str: String = row.get(4)?;

        let created_at = DateTime::parse_from_rfc3339(&created_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());

        Ok(User {
            id,
            username,
            email,
            password_hash,
            created_at,
        })
    }
}

impl UserStore for SqliteUserStore {
    fn create(&self, request: CreateUserRequest) -> Result<User, UserError> {
        let conn = self.db.lock();

        // Both existence checks and the insert run under the same lock, so
        // two concurrent registrations cannot both pass the checks.
        let username_taken: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM users WHERE username = ?)",
                params![request.username],
                |row| row.get(0),
            )
            .map_err(|e| UserError::Database(e.to_string()))?;
        if username_taken {
            return Err(UserError::Conflict("Username already exists".to_string()));
        }

        let email_taken: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM users WHERE email = ?)",
                params![request.email],
                |row| row.get(0),
            )
            .map_err(|e| UserError::Database(e.to_string()))?;
        if email_taken {
            return Err(UserError::Conflict("Email already exists".to_string()));
        }

        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now();

        conn.execute(
            "INSERT INTO users (id, username, email, password_hash, created_at) VALUES (?, ?, ?, ?, ?)",
            params![
                id,
                request.username,
                request.email,
                request.password_hash,
                now.to_rfc3339(),
            ],
        )
        .map_err(|e| UserError::Database(e.to_string()))?;

        Ok(User {
            id,
            username: request.username,
            email: request.email,
            password_hash: request.password_hash,
            created_at: now,
        })
    }

    fn get(&self, id: &str) -> Result<Option<User>, UserError> {
        let conn = self.db.lock();

        let result = conn.query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"),
            params![id],
            Self::row_to_user,
        );

        match result {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(UserError::Database(e.to_string())),
        }
    }

    fn find_by_username(&self, username: &str) -> Result<Option<User>, UserError> {
        let conn = self.db.lock();

        let result = conn.query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?"),
            params![username],
            Self::row_to_user,
        );

        match result {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(UserError::Database(e.to_string())),
        }
    }
}
