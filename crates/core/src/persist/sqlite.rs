//! SQLite-backed state store implementation.

use std::path::Path;
use std::sync::Mutex;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use super::store::{PersistError, StateStore};

/// SQLite-backed keyed-blob store.
pub struct SqliteStateStore {
    conn: Mutex<Connection>,
}

impl SqliteStateStore {
    /// Open (or create) the database file and its schema.
    pub fn new(path: &Path) -> Result<Self, PersistError> {
        let conn = Connection::open(path).map_err(|e| PersistError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory store (useful for testing).
    pub fn in_memory() -> Result<Self, PersistError> {
        let conn =
            Connection::open_in_memory().map_err(|e| PersistError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), PersistError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS app_state (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .map_err(|e| PersistError::Database(e.to_string()))?;
        Ok(())
    }
}

impl StateStore for SqliteStateStore {
    fn save(&self, key: &str, value: &str) -> Result<(), PersistError> {
        let conn = self.conn.lock().expect("state store lock poisoned");
        conn.execute(
            r#"
            INSERT INTO app_state (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = ?3
            "#,
            params![key, value, Utc::now().to_rfc3339()],
        )
        .map_err(|e| PersistError::Database(e.to_string()))?;
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<String>, PersistError> {
        let conn = self.conn.lock().expect("state store lock poisoned");
        conn.query_row(
            "SELECT value FROM app_state WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| PersistError::Database(e.to_string()))
    }
}
