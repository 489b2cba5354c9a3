pub mod note;

pub use note::{CreateNoteRequest, Note, NoteType, UpdateNoteRequest, DEFAULT_COLOR};
