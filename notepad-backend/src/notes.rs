//! Note persistence orchestration: the create, update and delete paths
//! that touch both the database row and the attachment store.
//!
//! Field carry-forward on update and the purge-on-delete rule are decided
//! here; the HTTP handlers stay thin over these functions.

use std::path::Path;

use crate::attachments::{self, PurgeReport};
use crate::db::Database;
use crate::models::{CreateNoteRequest, Note, NoteType, UpdateNoteRequest};

/// Create a note. Inline images on memory notes are stored after the row
/// exists, so the attachment directory is keyed by the real note id; for
/// other note types incoming images are ignored.
pub fn create_with_attachments(
    db: &Database,
    uploads_root: &Path,
    request: CreateNoteRequest,
) -> rusqlite::Result<Note> {
    let note = db.create_note(
        &request.title,
        &request.content,
        request.is_favorite,
        &request.color,
        &request.tags,
        request.note_type,
        &[],
    )?;

    if note.note_type == NoteType::Memory && !request.images.is_empty() {
        let references = attachments::reconcile(uploads_root, note.id, &request.images);
        if let Some(updated) = db.set_note_images(note.id, &references)? {
            return Ok(updated);
        }
    }

    Ok(note)
}

/// Apply an update request to a stored note. Fields absent from the
/// request keep their stored values; a present images list is reconciled
/// when the note ends up a memory note and clears the stored references
/// otherwise; an absent images list keeps them. Returns None when the id
/// is unknown.
pub fn apply_update(
    db: &Database,
    uploads_root: &Path,
    id: i64,
    request: UpdateNoteRequest,
) -> rusqlite::Result<Option<Note>> {
    let existing = match db.get_note(id)? {
        Some(note) => note,
        None => return Ok(None),
    };

    let is_favorite = request.is_favorite.unwrap_or(existing.is_favorite);
    let color = request.color.unwrap_or(existing.color);
    let tags = request.tags.unwrap_or(existing.tags);
    let note_type = request.note_type.unwrap_or(existing.note_type);

    let images = match request.images {
        Some(incoming) if note_type == NoteType::Memory => {
            attachments::reconcile(uploads_root, id, &incoming)
        }
        Some(_) => Vec::new(),
        None => existing.images,
    };

    db.update_note(
        id,
        &request.title,
        &request.content,
        is_favorite,
        &color,
        &tags,
        note_type,
        &images,
    )
}

/// Delete a note, purging its attachment directory when it owned one.
/// The purge report is None for text notes and for memory notes without
/// stored references; None overall when the id is unknown.
pub fn delete_with_attachments(
    db: &Database,
    uploads_root: &Path,
    id: i64,
) -> rusqlite::Result<Option<(Note, Option<PurgeReport>)>> {
    let note = match db.delete_note(id)? {
        Some(note) => note,
        None => return Ok(None),
    };

    let report = if note.note_type == NoteType::Memory && !note.images.is_empty() {
        Some(attachments::purge(uploads_root, note.id))
    } else {
        None
    };

    Ok(Some((note, report)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    // "hello" in base64
    const PAYLOAD: &str = "data:image/png;base64,aGVsbG8=";

    fn test_db(dir: &tempfile::TempDir) -> Database {
        let path = dir.path().join("test.db");
        Database::new(path.to_str().unwrap()).unwrap()
    }

    fn create_request(note_type: NoteType, images: Vec<String>) -> CreateNoteRequest {
        CreateNoteRequest {
            title: "Trip".to_string(),
            content: "photos".to_string(),
            is_favorite: false,
            color: "#121212".to_string(),
            tags: Vec::new(),
            note_type,
            images,
        }
    }

    fn bare_update(title: &str, content: &str) -> UpdateNoteRequest {
        UpdateNoteRequest {
            title: title.to_string(),
            content: content.to_string(),
            is_favorite: None,
            color: None,
            tags: None,
            note_type: None,
            images: None,
        }
    }

    #[test]
    fn test_create_stores_inline_images_for_memory_note() {
        let dir = tempdir().unwrap();
        let db = test_db(&dir);
        let uploads = dir.path().join("uploads");

        let request = create_request(NoteType::Memory, vec![PAYLOAD.to_string()]);
        let note = create_with_attachments(&db, &uploads, request).unwrap();

        assert_eq!(note.images.len(), 1);
        assert!(note.images[0].starts_with(&format!("/uploads/{}/", note.id)));

        let filename = note.images[0].rsplit('/').next().unwrap();
        let stored = uploads.join(note.id.to_string()).join(filename);
        assert_eq!(std::fs::read(&stored).unwrap(), b"hello");
    }

    #[test]
    fn test_create_ignores_images_for_text_note() {
        let dir = tempdir().unwrap();
        let db = test_db(&dir);
        let uploads = dir.path().join("uploads");

        let request = create_request(NoteType::Text, vec![PAYLOAD.to_string()]);
        let note = create_with_attachments(&db, &uploads, request).unwrap();

        assert!(note.images.is_empty());
        assert!(!uploads.join(note.id.to_string()).exists());
    }

    #[test]
    fn test_update_carries_forward_absent_fields() {
        let dir = tempdir().unwrap();
        let db = test_db(&dir);
        let uploads = dir.path().join("uploads");

        let note = db
            .create_note(
                "Keep",
                "old",
                true,
                "#845EF7",
                &["work".to_string()],
                NoteType::Text,
                &[],
            )
            .unwrap();

        let updated = apply_update(&db, &uploads, note.id, bare_update("Keep", "new"))
            .unwrap()
            .unwrap();

        assert_eq!(updated.content, "new");
        assert!(updated.is_favorite);
        assert_eq!(updated.color, "#845EF7");
        assert_eq!(updated.tags, vec!["work"]);
        assert_eq!(updated.note_type, NoteType::Text);
    }

    #[test]
    fn test_update_mixes_present_and_absent_fields() {
        let dir = tempdir().unwrap();
        let db = test_db(&dir);
        let uploads = dir.path().join("uploads");

        let note = db
            .create_note(
                "Keep",
                "old",
                true,
                "#845EF7",
                &["work".to_string()],
                NoteType::Text,
                &[],
            )
            .unwrap();

        let mut request = bare_update("Keep", "new");
        request.is_favorite = Some(false);
        request.tags = Some(vec!["archive".to_string()]);

        let updated = apply_update(&db, &uploads, note.id, request)
            .unwrap()
            .unwrap();

        assert!(!updated.is_favorite);
        assert_eq!(updated.tags, vec!["archive"]);
        // untouched fields still carry forward
        assert_eq!(updated.color, "#845EF7");
    }

    #[test]
    fn test_update_keeps_images_when_absent() {
        let dir = tempdir().unwrap();
        let db = test_db(&dir);
        let uploads = dir.path().join("uploads");

        let request = create_request(NoteType::Memory, vec![PAYLOAD.to_string()]);
        let note = create_with_attachments(&db, &uploads, request).unwrap();
        let stored = note.images.clone();

        let updated = apply_update(&db, &uploads, note.id, bare_update("Trip", "edited"))
            .unwrap()
            .unwrap();

        assert_eq!(updated.images, stored);
    }

    #[test]
    fn test_update_empty_images_clears_memory_note() {
        let dir = tempdir().unwrap();
        let db = test_db(&dir);
        let uploads = dir.path().join("uploads");

        let request = create_request(NoteType::Memory, vec![PAYLOAD.to_string()]);
        let note = create_with_attachments(&db, &uploads, request).unwrap();
        assert_eq!(note.images.len(), 1);

        let mut request = bare_update("Trip", "edited");
        request.images = Some(Vec::new());

        let updated = apply_update(&db, &uploads, note.id, request)
            .unwrap()
            .unwrap();

        assert!(updated.images.is_empty());
    }

    #[test]
    fn test_update_drops_images_when_note_becomes_text() {
        let dir = tempdir().unwrap();
        let db = test_db(&dir);
        let uploads = dir.path().join("uploads");

        let request = create_request(NoteType::Memory, vec![PAYLOAD.to_string()]);
        let note = create_with_attachments(&db, &uploads, request).unwrap();
        let reference = note.images[0].clone();

        let mut request = bare_update("Trip", "now plain");
        request.note_type = Some(NoteType::Text);
        request.images = Some(vec![reference.clone()]);

        let updated = apply_update(&db, &uploads, note.id, request)
            .unwrap()
            .unwrap();

        assert_eq!(updated.note_type, NoteType::Text);
        assert!(updated.images.is_empty());

        // Dropped references are not pruned from disk
        let filename = reference.rsplit('/').next().unwrap();
        assert!(uploads.join(note.id.to_string()).join(filename).exists());
    }

    #[test]
    fn test_update_reconciles_images_for_memory_note() {
        let dir = tempdir().unwrap();
        let db = test_db(&dir);
        let uploads = dir.path().join("uploads");

        let note = db
            .create_note("Trip", "photos", false, "#121212", &[], NoteType::Memory, &[])
            .unwrap();

        let kept = format!("/uploads/{}/1700000000000.png", note.id);
        let mut request = bare_update("Trip", "photos");
        request.images = Some(vec![kept.clone(), PAYLOAD.to_string()]);

        let updated = apply_update(&db, &uploads, note.id, request)
            .unwrap()
            .unwrap();

        assert_eq!(updated.images.len(), 2);
        assert_eq!(updated.images[0], kept);
        assert!(updated.images[1].starts_with(&format!("/uploads/{}/", note.id)));

        let filename = updated.images[1].rsplit('/').next().unwrap();
        assert!(uploads.join(note.id.to_string()).join(filename).exists());
    }

    #[test]
    fn test_update_unknown_id_returns_none() {
        let dir = tempdir().unwrap();
        let db = test_db(&dir);
        let uploads = dir.path().join("uploads");

        let result = apply_update(&db, &uploads, 999, bare_update("T", "c")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_delete_memory_note_purges_attachment_directory() {
        let dir = tempdir().unwrap();
        let db = test_db(&dir);
        let uploads = dir.path().join("uploads");

        let request = create_request(
            NoteType::Memory,
            vec![PAYLOAD.to_string(), PAYLOAD.to_string()],
        );
        let note = create_with_attachments(&db, &uploads, request).unwrap();
        assert_eq!(note.images.len(), 2);
        assert!(uploads.join(note.id.to_string()).exists());

        let (deleted, report) = delete_with_attachments(&db, &uploads, note.id)
            .unwrap()
            .unwrap();
        let report = report.unwrap();

        assert_eq!(deleted.id, note.id);
        assert!(report.is_clean());
        assert_eq!(report.files_removed, 2);
        assert!(!uploads.join(note.id.to_string()).exists());
        assert!(db.get_note(note.id).unwrap().is_none());
    }

    #[test]
    fn test_delete_text_note_skips_purge() {
        let dir = tempdir().unwrap();
        let db = test_db(&dir);
        let uploads = dir.path().join("uploads");

        let note = db
            .create_note("Plain", "text", false, "#121212", &[], NoteType::Text, &[])
            .unwrap();

        // An unrelated directory under the note's id must survive
        let stray = uploads.join(note.id.to_string());
        std::fs::create_dir_all(&stray).unwrap();
        std::fs::write(stray.join("keep.png"), b"x").unwrap();

        let (_, report) = delete_with_attachments(&db, &uploads, note.id)
            .unwrap()
            .unwrap();

        assert!(report.is_none());
        assert!(stray.join("keep.png").exists());
    }

    #[test]
    fn test_delete_memory_note_without_images_skips_purge() {
        let dir = tempdir().unwrap();
        let db = test_db(&dir);
        let uploads = dir.path().join("uploads");

        let note = db
            .create_note("Trip", "photos", false, "#121212", &[], NoteType::Memory, &[])
            .unwrap();

        let (_, report) = delete_with_attachments(&db, &uploads, note.id)
            .unwrap()
            .unwrap();

        assert!(report.is_none());
    }

    #[test]
    fn test_delete_unknown_id_returns_none() {
        let dir = tempdir().unwrap();
        let db = test_db(&dir);
        let uploads = dir.path().join("uploads");

        assert!(delete_with_attachments(&db, &uploads, 999).unwrap().is_none());
    }
}
