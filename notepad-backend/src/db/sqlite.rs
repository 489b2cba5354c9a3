//! SQLite connection handling and schema creation.

use rusqlite::{Connection, Result as SqliteResult};
use std::path::Path;
use std::sync::Mutex;

pub struct Database {
    pub(crate) conn: Mutex<Connection>,
}

impl Database {
    /// Open (or create) the database file and ensure the schema exists.
    pub fn new(database_url: &str) -> SqliteResult<Self> {
        // Best effort; a missing directory surfaces through open below
        if let Some(parent) = Path::new(database_url).parent() {
            if !parent.as_os_str().is_empty() {
                let _ = std::fs::create_dir_all(parent);
            }
        }

        let conn = Connection::open(database_url)?;
        let db = Database {
            conn: Mutex::new(conn),
        };
        db.create_tables()?;
        Ok(db)
    }

    fn create_tables(&self) -> SqliteResult<()> {
        let conn = self.conn.lock().unwrap();

        conn.execute(
            "CREATE TABLE IF NOT EXISTS notes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                content TEXT NOT NULL,
                created_at TEXT NOT NULL,
                modified_at TEXT NOT NULL,
                is_favorite INTEGER NOT NULL DEFAULT 0,
                color TEXT NOT NULL DEFAULT '#121212',
                tags TEXT NOT NULL DEFAULT '[]',
                note_type TEXT NOT NULL DEFAULT 'text',
                images TEXT NOT NULL DEFAULT '[]'
            )",
            [],
        )?;

        Ok(())
    }
}
