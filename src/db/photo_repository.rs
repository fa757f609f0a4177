// src/db/photo_repository.rs
// DOCUMENTATION: Photo database operations
// PURPOSE: Handle photo rows belonging to pins

use crate::errors::PinsError;
use crate::models::{Photo, StoredPhoto};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

pub struct PhotoRepository;

impl PhotoRepository {
    /// Insert a photo row inside the pin-creation transaction
    /// DOCUMENTATION: Called once per uploaded file, in upload order
    pub async fn insert_photo(
        tx: &mut Transaction<'_, Postgres>,
        pin_id: Uuid,
        display_order: i32,
        photo: &StoredPhoto,
    ) -> Result<Photo, PinsError> {
        let row = sqlx::query_as::<_, Photo>(
            r#"
            INSERT INTO pin_photos (
                pin_id, photo_url, storage_key, size_bytes,
                content_type, original_filename, display_order, uploaded_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, NOW())
            RETURNING *
            "#,
        )
        .bind(pin_id)
        .bind(&photo.photo_url)
        .bind(&photo.storage_key)
        .bind(photo.size_bytes)
        .bind(&photo.content_type)
        .bind(&photo.original_filename)
        .bind(display_order)
        .fetch_one(&mut **tx)
        .await
        .map_err(|e| {
            log::error!("Failed to create photo for pin {}: {}", pin_id, e);
            PinsError::DatabaseError(format!("Create photo failed: {}", e))
        })?;

        Ok(row)
    }

    /// Get photos for a pin
    /// DOCUMENTATION: Fetch all photos for a specific pin, in upload order
    pub async fn get_photos_by_pin(
        pool: &PgPool,
        pin_id: &Uuid,
    ) -> Result<Vec<Photo>, PinsError> {
        let photos = sqlx::query_as::<_, Photo>(
            r#"
            SELECT * FROM pin_photos
            WHERE pin_id = $1
            ORDER BY display_order ASC
            "#,
        )
        .bind(pin_id)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to fetch photos for pin {}: {}", pin_id, e);
            PinsError::DatabaseError(format!("Fetch photos failed: {}", e))
        })?;

        Ok(photos)
    }

    /// Get all photos belonging to a user's pins
    /// DOCUMENTATION: One query for the whole pin list, grouped per pin by
    /// the caller. Avoids a photos query per pin on GET /pins.
    pub async fn get_photos_by_user(
        pool: &PgPool,
        user_id: Uuid,
    ) -> Result<Vec<Photo>, PinsError> {
        let photos = sqlx::query_as::<_, Photo>(
            r#"
            SELECT ph.* FROM pin_photos ph
            JOIN pins p ON p.id = ph.pin_id
            WHERE p.user_id = $1
            ORDER BY ph.pin_id, ph.display_order ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to fetch photos for user {}: {}", user_id, e);
            PinsError::DatabaseError(format!("Fetch photos failed: {}", e))
        })?;

        Ok(photos)
    }
}
