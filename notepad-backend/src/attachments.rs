//! Attachment storage for memory notes.
//!
//! Inline `data:` payloads arriving on note create/update are decoded and
//! written under `uploads/{note_id}/`, and the note stores only the
//! `/uploads/...` reference. Deleting a note purges its directory.

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use thiserror::Error;

pub const REFERENCE_PREFIX: &str = "/uploads";

#[derive(Debug, Error)]
pub enum AttachmentError {
    #[error("Invalid image payload: {0}")]
    InvalidPayload(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AttachmentError>;

/// True for entries that still carry inline base64 data rather than a
/// stored `/uploads/...` reference.
pub fn is_inline_payload(entry: &str) -> bool {
    entry.starts_with("data:") && entry.contains(";base64,")
}

/// Directory holding all attachments owned by one note
pub fn owner_dir(uploads_root: &Path, note_id: i64) -> PathBuf {
    uploads_root.join(note_id.to_string())
}

/// Decode one inline payload and write it to disk, returning the stored
/// reference (`/uploads/{note_id}/{filename}`).
pub fn ingest(uploads_root: &Path, note_id: i64, payload: &str) -> Result<String> {
    let rest = payload
        .strip_prefix("data:")
        .ok_or_else(|| AttachmentError::InvalidPayload("missing data: prefix".to_string()))?;

    let (media_type, encoded) = rest
        .split_once(";base64,")
        .ok_or_else(|| AttachmentError::InvalidPayload("missing base64 marker".to_string()))?;

    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|e| AttachmentError::InvalidPayload(format!("base64 decode failed: {}", e)))?;

    let extension = extension_for_media_type(media_type);

    let dir = owner_dir(uploads_root, note_id);
    std::fs::create_dir_all(&dir)?;

    // Millisecond stamp, with a counter suffix when two payloads land in
    // the same tick
    let stamp = chrono::Utc::now().timestamp_millis();
    let mut filename = format!("{}.{}", stamp, extension);
    let mut counter = 0;
    while dir.join(&filename).exists() {
        counter += 1;
        filename = format!("{}-{}.{}", stamp, counter, extension);
    }

    std::fs::write(dir.join(&filename), &bytes)?;

    Ok(format!("{}/{}/{}", REFERENCE_PREFIX, note_id, filename))
}

/// File extension derived from the payload's media type. Structured
/// suffixes are dropped (`image/svg+xml` stores as `.svg`); anything
/// unrecognizable falls back to `.bin`.
fn extension_for_media_type(media_type: &str) -> String {
    let subtype = media_type.split('/').nth(1).unwrap_or("");
    let base = subtype.split('+').next().unwrap_or("");

    let ext: String = base
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase();

    if ext.is_empty() {
        "bin".to_string()
    } else {
        ext
    }
}

/// Turn an incoming image list into stored references: already-stored
/// entries pass through untouched, inline payloads are ingested, and
/// entries that fail to decode are dropped with a warning. Order is
/// preserved.
pub fn reconcile(uploads_root: &Path, note_id: i64, incoming: &[String]) -> Vec<String> {
    let mut references = Vec::with_capacity(incoming.len());

    for entry in incoming {
        if !is_inline_payload(entry) {
            references.push(entry.clone());
            continue;
        }

        match ingest(uploads_root, note_id, entry) {
            Ok(reference) => references.push(reference),
            Err(e) => log::warn!("Skipping image for note {}: {}", note_id, e),
        }
    }

    references
}

/// Outcome of purging one note's attachment directory
#[derive(Debug, Default)]
pub struct PurgeReport {
    pub files_removed: usize,
    pub failures: Vec<String>,
}

impl PurgeReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Remove every attachment owned by a note, then the directory itself.
/// Failures are collected per path rather than aborting the sweep; a
/// missing directory counts as already clean.
pub fn purge(uploads_root: &Path, note_id: i64) -> PurgeReport {
    let dir = owner_dir(uploads_root, note_id);
    let mut report = PurgeReport::default();

    if !dir.exists() {
        return report;
    }

    let entries = match std::fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!("Could not read attachments for note {}: {}", note_id, e);
            report.failures.push(dir.display().to_string());
            return report;
        }
    };

    for entry in entries.filter_map(|e| e.ok()) {
        let path = entry.path();
        match std::fs::remove_file(&path) {
            Ok(()) => report.files_removed += 1,
            Err(e) => {
                log::warn!("Could not remove attachment {:?}: {}", path, e);
                report.failures.push(path.display().to_string());
            }
        }
    }

    if report.failures.is_empty() {
        if let Err(e) = std::fs::remove_dir(&dir) {
            log::warn!("Could not remove attachment dir for note {}: {}", note_id, e);
            report.failures.push(dir.display().to_string());
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    // "hello" in base64
    const PAYLOAD: &str = "data:image/png;base64,aGVsbG8=";

    #[test]
    fn test_is_inline_payload() {
        assert!(is_inline_payload(PAYLOAD));
        assert!(!is_inline_payload("/uploads/3/1700000000000.png"));
        assert!(!is_inline_payload("data:image/png,rawdata"));
    }

    #[test]
    fn test_ingest_rejects_malformed_payloads() {
        let dir = tempdir().unwrap();

        let err = ingest(dir.path(), 1, "notarealdatauri").unwrap_err();
        assert!(matches!(err, AttachmentError::InvalidPayload(_)));

        let err = ingest(dir.path(), 1, "http://example.com/a.png").unwrap_err();
        assert!(matches!(err, AttachmentError::InvalidPayload(_)));

        let err = ingest(dir.path(), 1, "data:image/png,rawdata").unwrap_err();
        assert!(matches!(err, AttachmentError::InvalidPayload(_)));

        let err = ingest(dir.path(), 1, "data:image/png;base64,!!!not-base64!!!").unwrap_err();
        assert!(matches!(err, AttachmentError::InvalidPayload(_)));
    }

    #[test]
    fn test_ingest_writes_file_and_returns_reference() {
        let dir = tempdir().unwrap();

        let reference = ingest(dir.path(), 7, PAYLOAD).unwrap();
        assert!(reference.starts_with("/uploads/7/"));
        assert!(reference.ends_with(".png"));

        let filename = reference.rsplit('/').next().unwrap();
        let stored = dir.path().join("7").join(filename);
        assert_eq!(std::fs::read(&stored).unwrap(), b"hello");
    }

    #[test]
    fn test_ingest_twice_yields_distinct_files() {
        let dir = tempdir().unwrap();

        let first = ingest(dir.path(), 2, PAYLOAD).unwrap();
        let second = ingest(dir.path(), 2, PAYLOAD).unwrap();
        assert_ne!(first, second);

        let count = std::fs::read_dir(dir.path().join("2")).unwrap().count();
        assert_eq!(count, 2);
    }

    #[test]
    fn test_extension_handling() {
        let dir = tempdir().unwrap();

        let svg = ingest(dir.path(), 3, "data:image/svg+xml;base64,aGVsbG8=").unwrap();
        assert!(svg.ends_with(".svg"));

        let unknown = ingest(dir.path(), 3, "data:;base64,aGVsbG8=").unwrap();
        assert!(unknown.ends_with(".bin"));
    }

    #[test]
    fn test_reconcile_mixes_stored_and_inline() {
        let dir = tempdir().unwrap();

        let incoming = vec![
            "/uploads/5/1700000000000.png".to_string(),
            PAYLOAD.to_string(),
            "data:image/png;base64,???bad???".to_string(),
        ];

        let references = reconcile(dir.path(), 5, &incoming);
        assert_eq!(references.len(), 2);
        assert_eq!(references[0], "/uploads/5/1700000000000.png");
        assert!(references[1].starts_with("/uploads/5/"));
        assert!(references[1].ends_with(".png"));
    }

    #[test]
    fn test_purge_removes_files_and_directory() {
        let dir = tempdir().unwrap();

        ingest(dir.path(), 9, PAYLOAD).unwrap();
        ingest(dir.path(), 9, "data:image/svg+xml;base64,aGVsbG8=").unwrap();
        assert!(dir.path().join("9").exists());

        let report = purge(dir.path(), 9);
        assert!(report.is_clean());
        assert_eq!(report.files_removed, 2);
        assert!(!dir.path().join("9").exists());
    }

    #[test]
    fn test_purge_missing_directory_is_clean() {
        let dir = tempdir().unwrap();

        let report = purge(dir.path(), 404);
        assert!(report.is_clean());
        assert_eq!(report.files_removed, 0);
    }
}
