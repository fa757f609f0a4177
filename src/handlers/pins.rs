// src/handlers/pins.rs
// DOCUMENTATION: HTTP handlers for pin operations
// PURPOSE: Parse requests, call services, return responses

use crate::auth::AuthUser;
use crate::config::Config;
use crate::errors::PinsError;
use crate::models::{CreatePinRequest, UploadedFile};
use crate::services::{PhotoStorage, PinService};
use actix_multipart::{Field, Multipart};
use actix_web::{web, HttpResponse, Responder};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use futures_util::StreamExt;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// Text fields are tiny; anything bigger is a client error
const MAX_TEXT_FIELD_BYTES: usize = 64 * 1024;

/// GET /pins
/// All pins of the signed-in user, newest first
pub async fn list_pins(
    user: AuthUser,
    pool: web::Data<PgPool>,
) -> Result<impl Responder, PinsError> {
    let pins = PinService::list_pins(pool.get_ref(), user.0.id).await?;
    Ok(HttpResponse::Ok().json(pins))
}

/// POST /pins
/// Create a pin from a multipart body: lat, lng, title, description,
/// visit_date text fields plus any number of `photos` file parts
pub async fn create_pin(
    user: AuthUser,
    pool: web::Data<PgPool>,
    storage: web::Data<PhotoStorage>,
    config: web::Data<Config>,
    mut payload: Multipart,
) -> Result<impl Responder, PinsError> {
    let (req, files) = parse_create_pin(&mut payload, config.max_photo_bytes).await?;

    // Validate request
    if let Err(e) = req.validate() {
        return Err(PinsError::ValidationError(e.to_string()));
    }

    let pin =
        PinService::create_pin(pool.get_ref(), storage.get_ref(), user.0.id, req, files).await?;
    Ok(HttpResponse::Created().json(pin))
}

/// GET /pins/{id}
/// Retrieve one pin of the signed-in user
pub async fn get_pin(
    user: AuthUser,
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
) -> Result<impl Responder, PinsError> {
    let pin = PinService::get_pin(pool.get_ref(), user.0.id, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(pin))
}

/// GET /pins/export/geojson
/// The signed-in user's pins as a GeoJSON FeatureCollection
pub async fn export_geojson(
    user: AuthUser,
    pool: web::Data<PgPool>,
) -> Result<impl Responder, PinsError> {
    let collection = PinService::export_geojson(pool.get_ref(), user.0.id).await?;
    Ok(HttpResponse::Ok().json(collection))
}

/// Pull the pin fields and photo files out of the multipart body
/// DOCUMENTATION: Photo parts keep the order in which they arrive; that
/// order becomes the pin's photo order
async fn parse_create_pin(
    payload: &mut Multipart,
    max_photo_bytes: usize,
) -> Result<(CreatePinRequest, Vec<UploadedFile>), PinsError> {
    let mut lat: Option<f64> = None;
    let mut lng: Option<f64> = None;
    let mut title: Option<String> = None;
    let mut description = String::new();
    let mut visit_date: Option<DateTime<Utc>> = None;
    let mut files: Vec<UploadedFile> = Vec::new();

    while let Some(item) = payload.next().await {
        let mut field = item
            .map_err(|e| PinsError::InvalidInput(format!("Malformed multipart body: {}", e)))?;
        let name = field.name().to_string();

        if name == "photos" {
            let filename = field
                .content_disposition()
                .get_filename()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "photo".to_string());
            let content_type = field
                .content_type()
                .map(|m| m.to_string())
                .unwrap_or_else(|| "application/octet-stream".to_string());

            let data = read_field_bytes(&mut field, max_photo_bytes).await?;
            files.push(UploadedFile {
                filename,
                content_type,
                data,
            });
        } else {
            let text = read_field_text(&mut field).await?;
            match name.as_str() {
                "lat" => {
                    lat = Some(text.trim().parse().map_err(|_| {
                        PinsError::InvalidInput("lat must be a number".to_string())
                    })?)
                }
                "lng" => {
                    lng = Some(text.trim().parse().map_err(|_| {
                        PinsError::InvalidInput("lng must be a number".to_string())
                    })?)
                }
                "title" => title = Some(text),
                "description" => description = text,
                "visit_date" => visit_date = Some(parse_visit_date(text.trim())?),
                other => log::debug!("Ignoring unknown multipart field: {}", other),
            }
        }
    }

    let req = CreatePinRequest {
        lat: lat.ok_or_else(|| PinsError::InvalidInput("lat is required".to_string()))?,
        lng: lng.ok_or_else(|| PinsError::InvalidInput("lng is required".to_string()))?,
        title: title.ok_or_else(|| PinsError::InvalidInput("title is required".to_string()))?,
        description,
        visit_date: visit_date
            .ok_or_else(|| PinsError::InvalidInput("visit_date is required".to_string()))?,
    };

    Ok((req, files))
}

/// Read a file part into memory, enforcing the configured size cap
async fn read_field_bytes(field: &mut Field, max_bytes: usize) -> Result<Vec<u8>, PinsError> {
    let mut data = Vec::new();

    while let Some(chunk) = field.next().await {
        let chunk = chunk
            .map_err(|e| PinsError::InvalidInput(format!("Failed to read upload: {}", e)))?;

        if data.len() + chunk.len() > max_bytes {
            return Err(PinsError::PayloadTooLarge);
        }
        data.extend_from_slice(&chunk);
    }

    Ok(data)
}

/// Read a text part as UTF-8
async fn read_field_text(field: &mut Field) -> Result<String, PinsError> {
    let data = read_field_bytes(field, MAX_TEXT_FIELD_BYTES).await?;
    String::from_utf8(data)
        .map_err(|_| PinsError::InvalidInput("Field is not valid UTF-8".to_string()))
}

/// Accept RFC 3339 timestamps or a plain calendar date
fn parse_visit_date(s: &str) -> Result<DateTime<Utc>, PinsError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(dt) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&dt));
        }
    }

    Err(PinsError::InvalidInput(format!(
        "visit_date must be RFC 3339 or YYYY-MM-DD, got '{}'",
        s
    )))
}

/// Configuration for pin routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/pins")
            .route("", web::get().to(list_pins))
            .route("", web::post().to(create_pin))
            .route("/export/geojson", web::get().to(export_geojson))
            .route("/{id}", web::get().to(get_pin)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_parse_visit_date_rfc3339() {
        let dt = parse_visit_date("2024-07-14T12:30:00Z").unwrap();
        assert_eq!(dt.year(), 2024);
        assert_eq!(dt.month(), 7);
        assert_eq!(dt.day(), 14);
    }

    #[test]
    fn test_parse_visit_date_plain_date() {
        let dt = parse_visit_date("2023-01-02").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (2023, 1, 2));
    }

    #[test]
    fn test_parse_visit_date_garbage_rejected() {
        assert!(parse_visit_date("next tuesday").is_err());
        assert!(parse_visit_date("").is_err());
    }
}
