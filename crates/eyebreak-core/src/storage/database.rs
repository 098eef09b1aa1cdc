//! SQLite-backed key-value store.
//!
//! The only persisted domain value is the completed-exercise counter,
//! stored under [`COMPLETED_KEY`].

use std::path::Path;
use std::time::Duration;

use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};

use super::data_dir;
use crate::error::{DatabaseError, Result};
use crate::hooks::CounterStore;

pub const COMPLETED_KEY: &str = "completed_exercises";

/// How long a writer waits for another process holding the database.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `<data dir>/eyebreak.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        Self::open_at(&data_dir()?.join("eyebreak.db"))
    }

    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, rusqlite::Error> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn completed_count(&self) -> Result<u64> {
        parse_count(self.kv_get(COMPLETED_KEY)?)
    }
}

fn parse_count(raw: Option<String>) -> Result<u64> {
    match raw {
        None => Ok(0),
        Some(raw) => match raw.trim().parse::<u64>() {
            Ok(n) => Ok(n),
            Err(_) => Err(DatabaseError::CorruptValue {
                key: COMPLETED_KEY.into(),
                value: raw,
            }
            .into()),
        },
    }
}

impl CounterStore for Database {
    fn get(&self) -> Result<u64> {
        self.completed_count()
    }

    /// Read-modify-write under an immediate transaction, so concurrent
    /// processes sharing the file never lose an increment.
    fn increment(&mut self) -> Result<u64> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let current = tx
            .query_row(
                "SELECT value FROM kv WHERE key = ?1",
                params![COMPLETED_KEY],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        let next = parse_count(current)?.saturating_add(1);
        tx.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![COMPLETED_KEY, next.to_string()],
        )?;
        tx.commit()?;
        Ok(next)
    }

    fn clear(&mut self) -> Result<()> {
        self.kv_set(COMPLETED_KEY, "0")?;
        Ok(())
    }
}
