use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Color stored for notes that don't pick one.
pub const DEFAULT_COLOR: &str = "#121212";

/// Kind of note
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteType {
    /// Plain text note (including shopping lists, which are an encoding
    /// convention over the content, not a type of their own)
    Text,
    /// Photo-memory note; its `images` references own files on disk
    Memory,
}

impl NoteType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoteType::Text => "text",
            NoteType::Memory => "memory",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(NoteType::Text),
            "memory" => Some(NoteType::Memory),
            _ => None,
        }
    }
}

impl Default for NoteType {
    fn default() -> Self {
        NoteType::Text
    }
}

/// Note - a single record in the notes table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    pub is_favorite: bool,
    pub color: String,
    pub tags: Vec<String>,
    pub note_type: NoteType,
    /// `/uploads/{id}/{file}` references; meaningful only for memory notes
    pub images: Vec<String>,
}

/// Request to create a note
#[derive(Debug, Clone, Deserialize)]
pub struct CreateNoteRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub note_type: NoteType,
    /// Inline `data:` payloads and/or stored references
    #[serde(default)]
    pub images: Vec<String>,
}

/// Request to update a note. Optional fields carry forward from the
/// stored row when absent.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateNoteRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub is_favorite: Option<bool>,
    pub color: Option<String>,
    pub tags: Option<Vec<String>>,
    pub note_type: Option<NoteType>,
    pub images: Option<Vec<String>>,
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}
