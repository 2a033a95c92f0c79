//! Shared SQLite handle.
//!
//! Every store borrows the same connection. Payment settlement updates
//! payment and ticket rows in one transaction, and ticket validation is a
//! check-then-act sequence; both require that no other writer interleaves,
//! which the single connection mutex guarantees.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::Connection;

/// Cheaply cloneable handle to the application database.
#[derive(Clone)]
pub struct Db {
    conn: Arc<Mutex<Connection>>,
}

impl Db {
    /// Open the database file, creating it and the schema if needed.
    pub fn open(path: &Path) -> Result<Self, rusqlite::Error> {
        let conn = Connection::open(path)?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// In-memory database (useful for testing).
    pub fn in_memory() -> Result<Self, rusqlite::Error> {
        let conn = Connection::open_in_memory()?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap()
    }

    fn initialize_schema(conn: &Connection) -> Result<(), rusqlite::Error> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                username TEXT NOT NULL UNIQUE,
                email TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS tickets (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL REFERENCES users(id),
                ticket_type TEXT NOT NULL,
                route TEXT NOT NULL,
                price INTEGER NOT NULL,
                status TEXT NOT NULL,
                qr_code TEXT,
                created_at TEXT NOT NULL,
                valid_until TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_tickets_user_id ON tickets(user_id);

            CREATE TABLE IF NOT EXISTS payments (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL REFERENCES users(id),
                ticket_id TEXT NOT NULL REFERENCES tickets(id),
                amount INTEGER NOT NULL,
                status TEXT NOT NULL,
                method TEXT NOT NULL,
                transaction_id TEXT NOT NULL UNIQUE,
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_payments_user_id ON payments(user_id);
            "#,
        )
    }
}
