// src/models/pin.rs
// DOCUMENTATION: Core data structures for travel pins
// PURPOSE: Defines all serialization/deserialization models for API and database

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use super::PhotoResponse;

/// Represents a complete pin record from the database
/// DOCUMENTATION: This struct maps directly to the pins table in PostgreSQL
/// Used for internal operations and database queries
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Pin {
    /// Unique identifier (UUID v4)
    pub id: Uuid,

    /// Owning user - pins are always queried filtered by owner
    pub user_id: Uuid,

    /// Geographic coordinates - latitude
    pub latitude: f64,

    /// Geographic coordinates - longitude
    pub longitude: f64,

    /// Short title shown on the map and timeline
    pub title: String,

    /// Free-form story attached to the pin
    pub description: String,

    /// When the user visited this location
    pub visit_date: DateTime<Utc>,

    /// When the record was created
    pub created_at: DateTime<Utc>,
}

/// Request DTO for creating a new pin
/// DOCUMENTATION: Parsed from the multipart body of POST /pins
/// Photo files travel alongside these fields and are handled separately
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreatePinRequest {
    /// Latitude of the map click
    #[validate(range(min = -90.0, max = 90.0))]
    pub lat: f64,

    /// Longitude of the map click
    #[validate(range(min = -180.0, max = 180.0))]
    pub lng: f64,

    /// Pin title (required)
    #[validate(length(min = 1, max = 255))]
    pub title: String,

    /// Pin story (may be empty)
    #[validate(length(max = 4000))]
    pub description: String,

    /// When the visit happened
    pub visit_date: DateTime<Utc>,
}

/// Response DTO for API responses
/// DOCUMENTATION: A pin with its ordered photo list, as returned by
/// GET /pins, GET /pins/{id} and POST /pins
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PinResponse {
    pub id: Uuid,
    pub user_id: Uuid,

    /// Geographic coordinates
    pub latitude: f64,
    pub longitude: f64,

    pub title: String,
    pub description: String,

    /// Timestamps
    pub visit_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,

    /// Photos in the order they were uploaded
    pub photos: Vec<PhotoResponse>,
}

impl Pin {
    /// Convert Pin to PinResponse for API
    /// DOCUMENTATION: Maps database model to API response DTO
    /// The photo list is fetched separately and attached here
    pub fn to_response(&self, photos: Vec<PhotoResponse>) -> PinResponse {
        PinResponse {
            id: self.id,
            user_id: self.user_id,
            latitude: self.latitude,
            longitude: self.longitude,
            title: self.title.clone(),
            description: self.description.clone(),
            visit_date: self.visit_date,
            created_at: self.created_at,
            photos,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(lat: f64, lng: f64, title: &str) -> CreatePinRequest {
        CreatePinRequest {
            lat,
            lng,
            title: title.to_string(),
            description: String::new(),
            visit_date: Utc::now(),
        }
    }

    #[test]
    fn test_valid_request_passes_validation() {
        assert!(request(41.6488, -0.8891, "Zaragoza old town").validate().is_ok());
    }

    #[test]
    fn test_out_of_range_coordinates_rejected() {
        assert!(request(91.0, 0.0, "North of the pole").validate().is_err());
        assert!(request(0.0, -200.0, "Nowhere").validate().is_err());
    }

    #[test]
    fn test_empty_title_rejected() {
        assert!(request(0.0, 0.0, "").validate().is_err());
    }
}
