//! Note CRUD endpoints.
//!
//! Memory notes may arrive with inline `data:` image payloads; those are
//! written to the uploads directory and the stored record keeps only the
//! `/uploads/...` references.

use actix_web::{web, HttpResponse, Responder};

use crate::models::{CreateNoteRequest, UpdateNoteRequest};
use crate::{config, notes, AppState};

/// List all notes, most recently modified first
pub async fn list_notes(state: web::Data<AppState>) -> impl Responder {
    match state.db.list_notes() {
        Ok(notes) => HttpResponse::Ok().json(notes),
        Err(e) => {
            log::error!("Failed to fetch notes: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to fetch notes"
            }))
        }
    }
}

/// Get a single note by id
pub async fn get_note(state: web::Data<AppState>, path: web::Path<i64>) -> impl Responder {
    let id = path.into_inner();

    match state.db.get_note(id) {
        Ok(Some(note)) => HttpResponse::Ok().json(note),
        Ok(None) => HttpResponse::NotFound().json(serde_json::json!({
            "error": "Note not found"
        })),
        Err(e) => {
            log::error!("Failed to fetch note {}: {}", id, e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to fetch note"
            }))
        }
    }
}

/// Create a note. Inline images on memory notes are stored after the row
/// exists, so the attachment directory is keyed by the real note id.
pub async fn create_note(
    state: web::Data<AppState>,
    body: web::Json<CreateNoteRequest>,
) -> impl Responder {
    let request = body.into_inner();

    if request.title.is_empty() || request.content.is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Title and content are required"
        }));
    }

    match notes::create_with_attachments(&state.db, &config::uploads_dir(), request) {
        Ok(note) => HttpResponse::Created().json(note),
        Err(e) => {
            log::error!("Failed to create note: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to create note"
            }))
        }
    }
}

/// Replace a note. Fields missing from the body keep their stored values;
/// an images list on a non-memory note clears the stored references.
pub async fn update_note(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<UpdateNoteRequest>,
) -> impl Responder {
    let id = path.into_inner();
    let request = body.into_inner();

    if request.title.is_empty() || request.content.is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Title and content are required"
        }));
    }

    match notes::apply_update(&state.db, &config::uploads_dir(), id, request) {
        Ok(Some(note)) => HttpResponse::Ok().json(note),
        Ok(None) => HttpResponse::NotFound().json(serde_json::json!({
            "error": "Note not found"
        })),
        Err(e) => {
            log::error!("Failed to update note {}: {}", id, e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to update note"
            }))
        }
    }
}

/// Flip the favorite flag
pub async fn toggle_favorite(state: web::Data<AppState>, path: web::Path<i64>) -> impl Responder {
    let id = path.into_inner();

    match state.db.toggle_favorite(id) {
        Ok(Some(note)) => HttpResponse::Ok().json(note),
        Ok(None) => HttpResponse::NotFound().json(serde_json::json!({
            "error": "Note not found"
        })),
        Err(e) => {
            log::error!("Failed to toggle favorite for note {}: {}", id, e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to toggle favorite"
            }))
        }
    }
}

/// Delete a note and purge its attachment directory
pub async fn delete_note(state: web::Data<AppState>, path: web::Path<i64>) -> impl Responder {
    let id = path.into_inner();

    let (note, report) = match notes::delete_with_attachments(&state.db, &config::uploads_dir(), id)
    {
        Ok(Some(result)) => result,
        Ok(None) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "error": "Note not found"
            }));
        }
        Err(e) => {
            log::error!("Failed to delete note {}: {}", id, e);
            return HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to delete note"
            }));
        }
    };

    let mut cleaned: Option<bool> = None;
    if let Some(report) = report {
        if report.is_clean() {
            log::info!(
                "Removed {} attachment file(s) for note {}",
                report.files_removed,
                note.id
            );
        } else {
            log::warn!(
                "Attachment cleanup for note {} left {} path(s) behind",
                note.id,
                report.failures.len()
            );
        }
        cleaned = Some(report.is_clean());
    }

    let mut response = serde_json::json!({
        "message": "Note deleted successfully",
        "note": note
    });
    if let Some(cleaned) = cleaned {
        response["attachments_cleaned"] = serde_json::json!(cleaned);
    }

    HttpResponse::Ok().json(response)
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/notes")
            .route("", web::get().to(list_notes))
            .route("", web::post().to(create_note))
            .route("/{id}", web::get().to(get_note))
            .route("/{id}", web::put().to(update_note))
            .route("/{id}/favorite", web::patch().to(toggle_favorite))
            .route("/{id}", web::delete().to(delete_note)),
    );
}
