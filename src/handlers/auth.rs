// src/handlers/auth.rs
// DOCUMENTATION: HTTP handlers for signup, login and session management
// PURPOSE: Issue and revoke bearer-token sessions

use crate::auth::{bearer_token, generate_token, hash_password, hash_token, verify_password, AuthUser};
use crate::config::Config;
use crate::db::UserRepository;
use crate::errors::PinsError;
use crate::models::{AuthResponse, LoginRequest, SignupRequest};
use crate::services::LoginLimiter;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use chrono::{Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// POST /auth/signup
/// Create an account and sign the caller in
pub async fn signup(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    req: web::Json<SignupRequest>,
) -> Result<impl Responder, PinsError> {
    // Validate request
    if let Err(e) = req.validate() {
        return Err(PinsError::ValidationError(e.to_string()));
    }

    let email = req.email.trim().to_lowercase();

    let password_hash = hash_password(&req.password).map_err(|e| {
        log::error!("Password hashing failed: {}", e);
        PinsError::InternalError
    })?;

    let user = UserRepository::create_user(
        pool.get_ref(),
        &email,
        &password_hash,
        req.display_name.as_deref(),
    )
    .await?;

    let token = issue_session(pool.get_ref(), &config, user.id).await?;

    Ok(HttpResponse::Created().json(AuthResponse {
        token,
        user: user.to_response(),
    }))
}

/// POST /auth/login
/// Verify credentials and issue a fresh session token
pub async fn login(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    limiter: web::Data<LoginLimiter>,
    req: web::Json<LoginRequest>,
) -> Result<impl Responder, PinsError> {
    limiter.check(&req.email)?;

    let email = req.email.trim().to_lowercase();
    let user = UserRepository::find_by_email(pool.get_ref(), &email).await?;

    // Uniform 401: never reveal whether the account or the password failed
    let user = match user {
        Some(user) if verify_password(&req.password, &user.password_hash) => user,
        _ => {
            log::warn!("Failed login attempt for {}", email);
            return Err(PinsError::Unauthorized);
        }
    };

    let token = issue_session(pool.get_ref(), &config, user.id).await?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        token,
        user: user.to_response(),
    }))
}

/// GET /auth/me
/// The signed-in user behind the presented token
pub async fn me(user: AuthUser) -> Result<impl Responder, PinsError> {
    Ok(HttpResponse::Ok().json(user.0.to_response()))
}

/// POST /auth/logout
/// Revoke the presented session token
pub async fn logout(
    _user: AuthUser,
    pool: web::Data<PgPool>,
    req: HttpRequest,
) -> Result<impl Responder, PinsError> {
    let token = bearer_token(&req)?;
    UserRepository::delete_session(pool.get_ref(), &hash_token(&token)).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Mint a session token and persist its digest
async fn issue_session(
    pool: &PgPool,
    config: &Config,
    user_id: Uuid,
) -> Result<String, PinsError> {
    let token = generate_token();
    let token_hash = hash_token(&token);
    let expires_at = Utc::now() + Duration::days(config.session_ttl_days);

    UserRepository::create_session(pool, user_id, &token_hash, expires_at).await?;

    Ok(token)
}

/// Configuration for auth routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/signup", web::post().to(signup))
            .route("/login", web::post().to(login))
            .route("/me", web::get().to(me))
            .route("/logout", web::post().to(logout)),
    );
}
