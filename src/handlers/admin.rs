// src/handlers/admin.rs
// DOCUMENTATION: Admin handlers for service statistics
// PURPOSE: Expose operational counters via REST endpoints

use crate::config::Config;
use crate::errors::PinsError;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use serde::Serialize;
use sqlx::PgPool;

/// Response for the stats endpoint
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    /// Total registered users
    pub total_users: i64,
    /// Total pins across all users
    pub total_pins: i64,
    /// Total stored photos
    pub total_photos: i64,
    /// Pins created in the last 24 hours
    pub recent_pins: i64,
}

/// GET /admin/stats
/// Get database statistics
///
/// DOCUMENTATION: Returns current user/pin/photo counts
/// Requires admin authentication via X-Admin-Token header
pub async fn stats(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    req: HttpRequest,
) -> Result<impl Responder, PinsError> {
    // Authenticate admin request
    verify_admin_token(&req, &config)?;

    let total_users: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(pool.get_ref())
        .await
        .map_err(|e| PinsError::DatabaseError(e.to_string()))?;

    let total_pins: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM pins")
        .fetch_one(pool.get_ref())
        .await
        .map_err(|e| PinsError::DatabaseError(e.to_string()))?;

    let total_photos: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM pin_photos")
        .fetch_one(pool.get_ref())
        .await
        .map_err(|e| PinsError::DatabaseError(e.to_string()))?;

    let recent_pins: (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM pins WHERE created_at > NOW() - INTERVAL '24 hours'",
    )
    .fetch_one(pool.get_ref())
    .await
    .map_err(|e| PinsError::DatabaseError(e.to_string()))?;

    let response = StatsResponse {
        total_users: total_users.0,
        total_pins: total_pins.0,
        total_photos: total_photos.0,
        recent_pins: recent_pins.0,
    };

    Ok(HttpResponse::Ok().json(response))
}

/// Helper function to verify admin authentication
/// DOCUMENTATION: Checks X-Admin-Token header against configured admin token
fn verify_admin_token(req: &HttpRequest, config: &Config) -> Result<(), PinsError> {
    let token = req
        .headers()
        .get("X-Admin-Token")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            log::warn!("Admin request without token");
            PinsError::Unauthorized
        })?;

    if token != config.admin_token {
        log::warn!("Admin request with invalid token");
        return Err(PinsError::Forbidden);
    }

    Ok(())
}

/// Configuration for admin routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/admin").route("/stats", web::get().to(stats)));
}
