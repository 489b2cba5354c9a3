use actix_web::{web, HttpResponse};

use crate::config::uploads_dir;

/// Allowed image extensions for attachment serving
const ALLOWED_EXTENSIONS: &[&str] = &["png", "svg", "jpg", "jpeg", "gif", "webp"];

/// Get MIME type for an image extension
fn mime_for_ext(ext: &str) -> &'static str {
    match ext {
        "png" => "image/png",
        "svg" => "image/svg+xml",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Check if a filename has an allowed image extension
fn is_allowed_image(filename: &str) -> bool {
    let ext = filename.rsplit('.').next().unwrap_or("").to_lowercase();
    ALLOWED_EXTENSIONS.contains(&ext.as_str())
}

/// Serve one stored attachment
async fn serve_attachment(path: web::Path<(i64, String)>) -> HttpResponse {
    let (note_id, filename) = path.into_inner();

    // Reject non-image files
    if !is_allowed_image(&filename) {
        return HttpResponse::Forbidden().json(serde_json::json!({
            "error": "Only image files (png, svg, jpg, jpeg, gif, webp) are served from /uploads/"
        }));
    }

    // Reject path traversal attempts and hidden files
    if filename.contains("..")
        || filename.contains('/')
        || filename.contains('\\')
        || filename.starts_with('.')
    {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "Invalid filename"
        }));
    }

    let root = uploads_dir();
    let file_path = root.join(note_id.to_string()).join(&filename);

    // Canonicalize and verify within the uploads root
    let canonical_root = match root.canonicalize() {
        Ok(p) => p,
        Err(_) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "error": "Uploads directory not found"
            }));
        }
    };

    let canonical_file = match file_path.canonicalize() {
        Ok(p) => p,
        Err(_) => {
            return HttpResponse::NotFound().json(serde_json::json!({
                "error": "File not found"
            }));
        }
    };

    if !canonical_file.starts_with(&canonical_root) {
        return HttpResponse::Forbidden().json(serde_json::json!({
            "error": "Access denied"
        }));
    }

    // Read and serve the file
    match tokio::fs::read(&canonical_file).await {
        Ok(contents) => {
            let ext = filename.rsplit('.').next().unwrap_or("").to_lowercase();
            HttpResponse::Ok()
                .content_type(mime_for_ext(&ext))
                .append_header(("Cache-Control", "public, max-age=300"))
                .body(contents)
        }
        Err(_) => HttpResponse::NotFound().json(serde_json::json!({
            "error": "File not found"
        })),
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/uploads").route("/{note_id}/{filename}", web::get().to(serve_attachment)),
    );
}
