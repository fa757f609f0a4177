// src/services/pin_service.rs
// DOCUMENTATION: Business logic for pins
// PURPOSE: Intermediary between handlers and repository, owns the
// upload-then-write sequence for pin creation

use crate::db::{PhotoRepository, PinRepository};
use crate::errors::PinsError;
use crate::models::{CreatePinRequest, PhotoResponse, PinResponse, StoredPhoto, UploadedFile};
use crate::services::PhotoStorage;
use geo_types::Point;
use geojson::{Feature, FeatureCollection, Geometry, Value as GeoJsonValue};
use serde_json::json;
use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

pub struct PinService;

impl PinService {
    /// All pins for a user, newest first, each with its photos
    pub async fn list_pins(pool: &PgPool, user_id: Uuid) -> Result<Vec<PinResponse>, PinsError> {
        let pins = PinRepository::list_by_user(pool, user_id).await?;
        let photos = PhotoRepository::get_photos_by_user(pool, user_id).await?;

        // One photos query for the whole list, grouped per pin here
        let mut by_pin: HashMap<Uuid, Vec<PhotoResponse>> = HashMap::new();
        for photo in photos {
            by_pin
                .entry(photo.pin_id)
                .or_default()
                .push(photo.to_response());
        }

        Ok(pins
            .iter()
            .map(|pin| pin.to_response(by_pin.remove(&pin.id).unwrap_or_default()))
            .collect())
    }

    /// A single pin with its photos
    /// DOCUMENTATION: Pins are private; another user's pin id reads as
    /// not found rather than forbidden
    pub async fn get_pin(
        pool: &PgPool,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<PinResponse, PinsError> {
        let pin = PinRepository::get_by_id(pool, id).await?;

        if pin.user_id != user_id {
            log::warn!("User {} requested foreign pin {}", user_id, id);
            return Err(PinsError::NotFound(id.to_string()));
        }

        let photos = PhotoRepository::get_photos_by_pin(pool, &pin.id).await?;
        Ok(pin.to_response(photos.iter().map(|p| p.to_response()).collect()))
    }

    /// Create a pin with its photos
    /// DOCUMENTATION: Photos are uploaded one at a time, in the order
    /// supplied, before the pin row is written. If the upload sequence or
    /// the database write fails, every object stored so far is deleted
    /// again so storage holds no orphans for pins that never existed.
    pub async fn create_pin(
        pool: &PgPool,
        storage: &PhotoStorage,
        user_id: Uuid,
        req: CreatePinRequest,
        files: Vec<UploadedFile>,
    ) -> Result<PinResponse, PinsError> {
        let mut stored: Vec<StoredPhoto> = Vec::with_capacity(files.len());

        for file in &files {
            let key = PhotoStorage::object_key(user_id, &file.filename);

            match storage.store(&key, &file.data).await {
                Ok(url) => stored.push(StoredPhoto {
                    photo_url: url,
                    storage_key: key,
                    size_bytes: file.data.len() as i64,
                    content_type: file.content_type.clone(),
                    original_filename: file.filename.clone(),
                }),
                Err(e) => {
                    log::error!("Photo upload failed for user {}: {}", user_id, e);
                    Self::cleanup_uploads(storage, &stored).await;
                    return Err(e);
                }
            }
        }

        match PinRepository::create_pin(pool, user_id, &req, &stored).await {
            Ok((pin, photos)) => {
                Ok(pin.to_response(photos.iter().map(|p| p.to_response()).collect()))
            }
            Err(e) => {
                log::error!(
                    "Pin write failed after {} uploads for user {}, cleaning up",
                    stored.len(),
                    user_id
                );
                Self::cleanup_uploads(storage, &stored).await;
                Err(e)
            }
        }
    }

    /// Best-effort removal of objects uploaded for a failed creation
    async fn cleanup_uploads(storage: &PhotoStorage, stored: &[StoredPhoto]) {
        for photo in stored {
            if let Err(e) = storage.remove(&photo.storage_key).await {
                log::warn!(
                    "Failed to remove orphaned photo object {}: {}",
                    photo.storage_key,
                    e
                );
            }
        }
    }

    /// A user's pins as a GeoJSON FeatureCollection for map frontends
    pub async fn export_geojson(
        pool: &PgPool,
        user_id: Uuid,
    ) -> Result<FeatureCollection, PinsError> {
        let pins = Self::list_pins(pool, user_id).await?;
        Ok(Self::pins_to_geojson(&pins))
    }

    /// Build the FeatureCollection for a pin list
    /// DOCUMENTATION: Point coordinates are [longitude, latitude] per the
    /// GeoJSON spec; pin metadata and photo URLs ride in the properties
    pub fn pins_to_geojson(pins: &[PinResponse]) -> FeatureCollection {
        let features = pins
            .iter()
            .map(|pin| {
                let point = Point::new(pin.longitude, pin.latitude);

                let mut properties = serde_json::Map::new();
                properties.insert("title".to_string(), json!(pin.title));
                properties.insert("description".to_string(), json!(pin.description));
                properties.insert("visit_date".to_string(), json!(pin.visit_date.to_rfc3339()));
                properties.insert("created_at".to_string(), json!(pin.created_at.to_rfc3339()));
                properties.insert(
                    "photo_urls".to_string(),
                    json!(pin
                        .photos
                        .iter()
                        .map(|p| p.url.clone())
                        .collect::<Vec<_>>()),
                );

                Feature {
                    bbox: None,
                    geometry: Some(Geometry::new(GeoJsonValue::from(&point))),
                    id: Some(geojson::feature::Id::String(pin.id.to_string())),
                    properties: Some(properties),
                    foreign_members: None,
                }
            })
            .collect();

        FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn pin_response(lat: f64, lng: f64, title: &str, photo_urls: &[&str]) -> PinResponse {
        PinResponse {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            latitude: lat,
            longitude: lng,
            title: title.to_string(),
            description: "".to_string(),
            visit_date: Utc::now(),
            created_at: Utc::now(),
            photos: photo_urls
                .iter()
                .map(|url| PhotoResponse {
                    id: Uuid::new_v4(),
                    url: url.to_string(),
                    uploaded_at: Utc::now(),
                    size_bytes: 1,
                    content_type: "image/jpeg".to_string(),
                    original_filename: "p.jpg".to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_geojson_coordinates_are_lng_lat() {
        let pins = vec![pin_response(41.6488, -0.8891, "Zaragoza", &[])];
        let collection = PinService::pins_to_geojson(&pins);

        assert_eq!(collection.features.len(), 1);
        let geometry = collection.features[0].geometry.as_ref().unwrap();
        match &geometry.value {
            GeoJsonValue::Point(coords) => {
                assert_eq!(coords[0], -0.8891);
                assert_eq!(coords[1], 41.6488);
            }
            other => panic!("Expected Point, got {:?}", other),
        }
    }

    #[test]
    fn test_geojson_properties_carry_photo_urls() {
        let pins = vec![pin_response(
            0.0,
            0.0,
            "With photos",
            &["http://localhost:8003/media/u/1_a.jpg"],
        )];
        let collection = PinService::pins_to_geojson(&pins);

        let properties = collection.features[0].properties.as_ref().unwrap();
        assert_eq!(properties["title"], json!("With photos"));
        assert_eq!(
            properties["photo_urls"],
            json!(["http://localhost:8003/media/u/1_a.jpg"])
        );
    }

    #[test]
    fn test_geojson_empty_list() {
        let collection = PinService::pins_to_geojson(&[]);
        assert!(collection.features.is_empty());
    }
}
