// src/models/photo.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Photo attached to a pin
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Photo {
    pub id: Uuid,
    pub pin_id: Uuid,
    pub photo_url: String,
    pub storage_key: String,
    pub size_bytes: i64,
    pub content_type: String,
    pub original_filename: String,
    pub display_order: i32,
    pub uploaded_at: DateTime<Utc>,
}

/// A file pulled out of the multipart body, not yet uploaded
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// A photo that has been written to object storage but not yet
/// attached to a pin row. Produced by the upload step of pin creation.
#[derive(Debug, Clone)]
pub struct StoredPhoto {
    pub photo_url: String,
    pub storage_key: String,
    pub size_bytes: i64,
    pub content_type: String,
    pub original_filename: String,
}

/// Photo DTO for API responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoResponse {
    pub id: Uuid,
    pub url: String,
    pub uploaded_at: DateTime<Utc>,
    pub size_bytes: i64,
    pub content_type: String,
    pub original_filename: String,
}

impl Photo {
    /// Convert database photo into API response DTO
    pub fn to_response(&self) -> PhotoResponse {
        PhotoResponse {
            id: self.id,
            url: self.photo_url.clone(),
            uploaded_at: self.uploaded_at,
            size_bytes: self.size_bytes,
            content_type: self.content_type.clone(),
            original_filename: self.original_filename.clone(),
        }
    }
}
