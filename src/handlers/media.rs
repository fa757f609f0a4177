// src/handlers/media.rs
// DOCUMENTATION: Serving of stored photo objects
// PURPOSE: Resolve public photo URLs back to their bytes

use crate::errors::PinsError;
use crate::services::PhotoStorage;
use actix_web::{web, HttpResponse, Responder};

/// GET /media/{key}
/// Stream a stored photo. Keys are validated against path traversal by
/// the storage layer; unknown keys read as 404.
pub async fn serve_photo(
    storage: web::Data<PhotoStorage>,
    path: web::Path<String>,
) -> Result<impl Responder, PinsError> {
    let key = path.into_inner();
    let data = storage.read(&key).await?;

    let mime = mime_guess::from_path(&key).first_or_octet_stream();

    Ok(HttpResponse::Ok()
        .content_type(mime.as_ref())
        .body(data))
}

/// Configuration for media routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/media/{key:.*}", web::get().to(serve_photo));
}
