// src/db/user_repository.rs
// DOCUMENTATION: User and session database operations
// PURPOSE: Account storage plus bearer-token session lookup

use crate::errors::PinsError;
use crate::models::User;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

pub struct UserRepository;

impl UserRepository {
    /// Create a new user account
    /// DOCUMENTATION: Emails are stored lowercased and carry a unique index;
    /// a duplicate signup maps to AlreadyExists rather than a 500
    pub async fn create_user(
        pool: &PgPool,
        email: &str,
        password_hash: &str,
        display_name: Option<&str>,
    ) -> Result<User, PinsError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash, display_name, created_at)
            VALUES ($1, $2, $3, NOW())
            RETURNING *
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .bind(display_name)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                // 23505 = unique_violation
                if db_err.code().as_deref() == Some("23505") {
                    log::warn!("Signup with existing email: {}", email);
                    return PinsError::AlreadyExists(email.to_string());
                }
            }
            log::error!("Failed to create user: {}", e);
            PinsError::DatabaseError(e.to_string())
        })?;

        log::info!("Created user {} ({})", user.id, user.email);
        Ok(user)
    }

    /// Look up a user by email
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, PinsError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to fetch user by email: {}", e);
                PinsError::DatabaseError(e.to_string())
            })?;

        Ok(user)
    }

    /// Store a new session
    /// DOCUMENTATION: Only the SHA-256 digest of the token is persisted
    pub async fn create_session(
        pool: &PgPool,
        user_id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), PinsError> {
        sqlx::query(
            r#"
            INSERT INTO sessions (user_id, token_hash, expires_at, created_at)
            VALUES ($1, $2, $3, NOW())
            "#,
        )
        .bind(user_id)
        .bind(token_hash)
        .bind(expires_at)
        .execute(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to create session for user {}: {}", user_id, e);
            PinsError::DatabaseError(e.to_string())
        })?;

        Ok(())
    }

    /// Resolve a session token digest to its user
    /// DOCUMENTATION: Expired sessions never resolve; rows are left for the
    /// database to clean up out of band
    pub async fn get_user_by_token_hash(
        pool: &PgPool,
        token_hash: &str,
    ) -> Result<Option<User>, PinsError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT u.* FROM sessions s
            JOIN users u ON u.id = s.user_id
            WHERE s.token_hash = $1 AND s.expires_at > NOW()
            "#,
        )
        .bind(token_hash)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to resolve session token: {}", e);
            PinsError::DatabaseError(e.to_string())
        })?;

        Ok(user)
    }

    /// Revoke a session by token digest
    pub async fn delete_session(pool: &PgPool, token_hash: &str) -> Result<(), PinsError> {
        sqlx::query("DELETE FROM sessions WHERE token_hash = $1")
            .bind(token_hash)
            .execute(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to delete session: {}", e);
                PinsError::DatabaseError(e.to_string())
            })?;

        Ok(())
    }
}
