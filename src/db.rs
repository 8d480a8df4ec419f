mod schema;

use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension};

use crate::preferences::KeyValueStore;
use schema::INITIAL_SCHEMA;

/// Database wrapper providing connection management and schema initialization.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens an in-memory SQLite database.
    ///
    /// Automatically initializes the schema on connection open.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.initialize_schema()?;
        Ok(db)
    }

    /// Opens a file-based SQLite database at the given path.
    ///
    /// Creates the database file if it does not exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database at {}", path.display()))?;
        let db = Self { conn };
        db.initialize_schema()?;
        Ok(db)
    }

    fn initialize_schema(&self) -> Result<()> {
        self.conn
            .execute_batch(INITIAL_SCHEMA)
            .context("Failed to initialize database schema")?;
        Ok(())
    }

    /// Returns a reference to the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

/// [`KeyValueStore`] over the `preferences` table.
///
/// # Examples
///
/// ```
/// use sift::Database;
/// use sift::db::SqlitePreferenceStore;
/// use sift::preferences::KeyValueStore;
///
/// # fn main() -> anyhow::Result<()> {
/// let db = Database::in_memory()?;
/// let store = SqlitePreferenceStore::new(&db);
///
/// store.set("column_pref_last", "comment")?;
/// assert_eq!(store.get("column_pref_last")?.as_deref(), Some("comment"));
/// # Ok(())
/// # }
/// ```
pub struct SqlitePreferenceStore<'a> {
    db: &'a Database,
}

impl<'a> SqlitePreferenceStore<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }
}

impl KeyValueStore for SqlitePreferenceStore<'_> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.db
            .connection()
            .query_row(
                "SELECT value FROM preferences WHERE key = ?1",
                [key],
                |row| row.get(0),
            )
            .optional()
            .with_context(|| format!("Failed to read preference '{key}'"))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.db
            .connection()
            .execute(
                "INSERT INTO preferences (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                (key, value),
            )
            .with_context(|| format!("Failed to save preference '{key}'"))?;
        Ok(())
    }
}
