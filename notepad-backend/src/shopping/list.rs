//! In-memory shopping list bound to its backing note.
//!
//! The list is resolved by note title, not by id, so it survives the note
//! being deleted and recreated. Saving writes the canonical text form back
//! through the regular note operations.

use crate::db::Database;
use crate::models::{Note, NoteType, DEFAULT_COLOR};

use super::codec::{self, ShoppingItem};

pub const SHOPPING_LIST_TITLE: &str = "Shopping List";
pub const SHOPPING_LIST_TAG: &str = "shopping";

#[derive(Debug, Clone, Default)]
pub struct ShoppingList {
    pub items: Vec<ShoppingItem>,
}

impl ShoppingList {
    pub fn new(items: Vec<ShoppingItem>) -> Self {
        Self { items }
    }

    /// Load the list from the shopping note. No note means an empty list.
    pub fn load(db: &Database) -> rusqlite::Result<Self> {
        let items = match db.find_note_by_title(SHOPPING_LIST_TITLE)? {
            Some(note) => codec::parse_items(&note.content),
            None => Vec::new(),
        };
        Ok(Self { items })
    }

    /// Append an open item. Blank text is rejected.
    pub fn add(&mut self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        self.items.push(ShoppingItem {
            text: text.to_string(),
            is_completed: false,
        });
        true
    }

    /// Flip completion at `index`. Out of range is a no-op.
    pub fn toggle(&mut self, index: usize) -> bool {
        match self.items.get_mut(index) {
            Some(item) => {
                item.is_completed = !item.is_completed;
                true
            }
            None => false,
        }
    }

    /// Remove the item at `index`. Out of range is a no-op.
    pub fn remove(&mut self, index: usize) -> bool {
        if index >= self.items.len() {
            return false;
        }
        self.items.remove(index);
        true
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Write the list back to its note, creating the note if it does not
    /// exist yet. An existing note keeps its title casing, favorite flag,
    /// color, tags and attachments; only the content changes.
    pub fn save(&self, db: &Database) -> rusqlite::Result<Note> {
        let content = codec::generate_content(&self.items);

        match db.find_note_by_title(SHOPPING_LIST_TITLE)? {
            Some(existing) => db
                .update_note(
                    existing.id,
                    &existing.title,
                    &content,
                    existing.is_favorite,
                    &existing.color,
                    &existing.tags,
                    existing.note_type,
                    &existing.images,
                )?
                .ok_or(rusqlite::Error::QueryReturnedNoRows),
            None => db.create_note(
                SHOPPING_LIST_TITLE,
                &content,
                false,
                DEFAULT_COLOR,
                &[SHOPPING_LIST_TAG.to_string()],
                NoteType::Text,
                &[],
            ),
        }
    }
}
