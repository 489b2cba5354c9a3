//! Note table operations

use chrono::{DateTime, Utc};
use rusqlite::Result as SqliteResult;

use crate::models::{Note, NoteType};
use super::super::Database;

impl Database {
    /// Create a note. For memory notes the attachment references are
    /// written afterwards via `set_note_images`, once the row id exists.
    pub fn create_note(
        &self,
        title: &str,
        content: &str,
        is_favorite: bool,
        color: &str,
        tags: &[String],
        note_type: NoteType,
        images: &[String],
    ) -> SqliteResult<Note> {
        let conn = self.conn.lock().unwrap();
        let now = Utc::now();
        let now_str = now.to_rfc3339();
        let tags_json = serde_json::to_string(tags).unwrap_or_else(|_| "[]".to_string());
        let images_json = serde_json::to_string(images).unwrap_or_else(|_| "[]".to_string());

        conn.execute(
            "INSERT INTO notes (title, content, created_at, modified_at, is_favorite, color, tags, note_type, images)
             VALUES (?1, ?2, ?3, ?3, ?4, ?5, ?6, ?7, ?8)",
            rusqlite::params![
                title,
                content,
                &now_str,
                is_favorite,
                color,
                &tags_json,
                note_type.as_str(),
                &images_json,
            ],
        )?;

        let id = conn.last_insert_rowid();

        Ok(Note {
            id,
            title: title.to_string(),
            content: content.to_string(),
            created_at: now,
            modified_at: now,
            is_favorite,
            color: color.to_string(),
            tags: tags.to_vec(),
            note_type,
            images: images.to_vec(),
        })
    }

    /// Get a single note by id
    pub fn get_note(&self, id: i64) -> SqliteResult<Option<Note>> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn.prepare(
            "SELECT id, title, content, created_at, modified_at, is_favorite, color, tags, note_type, images
             FROM notes WHERE id = ?1",
        )?;

        let note = stmt.query_row([id], |row| Self::row_to_note(row)).ok();

        Ok(note)
    }

    /// All notes, most recently modified first (the order the client renders)
    pub fn list_notes(&self) -> SqliteResult<Vec<Note>> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn.prepare(
            "SELECT id, title, content, created_at, modified_at, is_favorite, color, tags, note_type, images
             FROM notes ORDER BY modified_at DESC",
        )?;

        let notes = stmt
            .query_map([], |row| Self::row_to_note(row))?
            .filter_map(|r| r.ok())
            .collect();

        Ok(notes)
    }

    /// Case-insensitive title lookup. When several notes share the title,
    /// the most recently modified one wins.
    pub fn find_note_by_title(&self, title: &str) -> SqliteResult<Option<Note>> {
        let conn = self.conn.lock().unwrap();

        let mut stmt = conn.prepare(
            "SELECT id, title, content, created_at, modified_at, is_favorite, color, tags, note_type, images
             FROM notes WHERE LOWER(title) = LOWER(?1)
             ORDER BY modified_at DESC LIMIT 1",
        )?;

        let note = stmt.query_row([title], |row| Self::row_to_note(row)).ok();

        Ok(note)
    }

    /// Full update of a note; bumps `modified_at`. Returns None when the
    /// id is unknown.
    pub fn update_note(
        &self,
        id: i64,
        title: &str,
        content: &str,
        is_favorite: bool,
        color: &str,
        tags: &[String],
        note_type: NoteType,
        images: &[String],
    ) -> SqliteResult<Option<Note>> {
        let conn = self.conn.lock().unwrap();
        let now_str = Utc::now().to_rfc3339();
        let tags_json = serde_json::to_string(tags).unwrap_or_else(|_| "[]".to_string());
        let images_json = serde_json::to_string(images).unwrap_or_else(|_| "[]".to_string());

        let rows_affected = conn.execute(
            "UPDATE notes SET title = ?1, content = ?2, is_favorite = ?3, color = ?4,
             tags = ?5, note_type = ?6, images = ?7, modified_at = ?8
             WHERE id = ?9",
            rusqlite::params![
                title,
                content,
                is_favorite,
                color,
                &tags_json,
                note_type.as_str(),
                &images_json,
                &now_str,
                id,
            ],
        )?;

        if rows_affected == 0 {
            return Ok(None);
        }

        drop(conn);
        self.get_note(id)
    }

    /// Flip the favorite flag; bumps `modified_at`. Returns None when the
    /// id is unknown.
    pub fn toggle_favorite(&self, id: i64) -> SqliteResult<Option<Note>> {
        let conn = self.conn.lock().unwrap();
        let now_str = Utc::now().to_rfc3339();

        let rows_affected = conn.execute(
            "UPDATE notes SET is_favorite = NOT is_favorite, modified_at = ?1 WHERE id = ?2",
            rusqlite::params![&now_str, id],
        )?;

        if rows_affected == 0 {
            return Ok(None);
        }

        drop(conn);
        self.get_note(id)
    }

    /// Overwrite the stored image references for a note. Does not bump
    /// `modified_at` (used right after insert, before the record is returned).
    pub fn set_note_images(&self, id: i64, images: &[String]) -> SqliteResult<Option<Note>> {
        let conn = self.conn.lock().unwrap();
        let images_json = serde_json::to_string(images).unwrap_or_else(|_| "[]".to_string());

        let rows_affected = conn.execute(
            "UPDATE notes SET images = ?1 WHERE id = ?2",
            rusqlite::params![&images_json, id],
        )?;

        if rows_affected == 0 {
            return Ok(None);
        }

        drop(conn);
        self.get_note(id)
    }

    /// Delete a note, returning the removed record. None when the id is unknown.
    pub fn delete_note(&self, id: i64) -> SqliteResult<Option<Note>> {
        let note = match self.get_note(id)? {
            Some(note) => note,
            None => return Ok(None),
        };

        let conn = self.conn.lock().unwrap();
        conn.execute("DELETE FROM notes WHERE id = ?1", [id])?;

        Ok(Some(note))
    }

    /// Number of notes in the table
    pub fn count_notes(&self) -> SqliteResult<i64> {
        let conn = self.conn.lock().unwrap();
        conn.query_row("SELECT COUNT(*) FROM notes", [], |row| row.get(0))
    }

    fn row_to_note(row: &rusqlite::Row) -> rusqlite::Result<Note> {
        let created_at_str: String = row.get(3)?;
        let modified_at_str: String = row.get(4)?;
        let tags_json: String = row.get(7)?;
        let note_type_str: String = row.get(8)?;
        let images_json: String = row.get(9)?;

        Ok(Note {
            id: row.get(0)?,
            title: row.get(1)?,
            content: row.get(2)?,
            created_at: DateTime::parse_from_rfc3339(&created_at_str)
                .unwrap()
                .with_timezone(&Utc),
            modified_at: DateTime::parse_from_rfc3339(&modified_at_str)
                .unwrap()
                .with_timezone(&Utc),
            is_favorite: row.get(5)?,
            color: row.get(6)?,
            tags: serde_json::from_str(&tags_json).unwrap_or_default(),
            note_type: NoteType::from_str(&note_type_str).unwrap_or(NoteType::Text),
            images: serde_json::from_str(&images_json).unwrap_or_default(),
        })
    }
}
