// src/db/repository.rs
// DOCUMENTATION: Database access layer - all pin SQL queries
// PURPOSE: Abstract database operations from business logic

use crate::db::PhotoRepository;
use crate::errors::PinsError;
use crate::models::{CreatePinRequest, Photo, Pin, StoredPhoto};
use sqlx::PgPool;
use uuid::Uuid;

/// PinRepository: All database operations for pins
/// DOCUMENTATION: Uses query_as for type-safe SQL queries
pub struct PinRepository;

impl PinRepository {
    /// Create a new pin together with its photo rows
    /// DOCUMENTATION: The pin and every photo record are written in one
    /// transaction, mirroring the single-document write of the client API.
    /// Either the whole pin becomes visible or nothing does.
    pub async fn create_pin(
        pool: &PgPool,
        user_id: Uuid,
        req: &CreatePinRequest,
        photos: &[StoredPhoto],
    ) -> Result<(Pin, Vec<Photo>), PinsError> {
        let mut tx = pool.begin().await.map_err(|e| {
            log::error!("Failed to begin pin transaction: {}", e);
            PinsError::DatabaseError(e.to_string())
        })?;

        let pin = sqlx::query_as::<_, Pin>(
            r#"
            INSERT INTO pins (
                user_id, latitude, longitude, title, description,
                visit_date, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, NOW())
            RETURNING *
            "#,
        )
        .bind(user_id) // $1
        .bind(req.lat) // $2
        .bind(req.lng) // $3
        .bind(&req.title) // $4
        .bind(&req.description) // $5
        .bind(req.visit_date) // $6
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            log::error!("Failed to create pin: {}", e);
            PinsError::DatabaseError(e.to_string())
        })?;

        // display_order follows the order the files arrived in
        let mut inserted = Vec::with_capacity(photos.len());
        for (order, photo) in photos.iter().enumerate() {
            let row =
                PhotoRepository::insert_photo(&mut tx, pin.id, order as i32, photo).await?;
            inserted.push(row);
        }

        tx.commit().await.map_err(|e| {
            log::error!("Failed to commit pin transaction: {}", e);
            PinsError::DatabaseError(e.to_string())
        })?;

        log::info!(
            "Created pin {} for user {} with {} photos",
            pin.id,
            user_id,
            inserted.len()
        );
        Ok((pin, inserted))
    }

    /// Retrieve all pins owned by a user
    /// DOCUMENTATION: Used for GET /pins - newest first, exactly the order
    /// the timeline and map views expect
    pub async fn list_by_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<Pin>, PinsError> {
        let pins = sqlx::query_as::<_, Pin>(
            r#"
            SELECT * FROM pins
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to list pins for user {}: {}", user_id, e);
            PinsError::DatabaseError(e.to_string())
        })?;

        Ok(pins)
    }

    /// Retrieve pin by ID
    /// DOCUMENTATION: Used for GET /pins/{id} endpoint
    pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<Pin, PinsError> {
        let pin = sqlx::query_as::<_, Pin>("SELECT * FROM pins WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|e| {
                log::error!("Database error fetching pin: {}", e);
                PinsError::DatabaseError(e.to_string())
            })?
            .ok_or_else(|| {
                log::warn!("Pin not found: {}", id);
                PinsError::NotFound(id.to_string())
            })?;

        Ok(pin)
    }
}
