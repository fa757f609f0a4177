// src/auth/extractor.rs
// DOCUMENTATION: AuthUser request extractor
// PURPOSE: Resolve the Authorization header to a signed-in user

use crate::auth::crypto::hash_token;
use crate::db::UserRepository;
use crate::errors::PinsError;
use crate::models::User;
use actix_web::http::header;
use actix_web::{dev::Payload, web, FromRequest, HttpRequest};
use sqlx::PgPool;
use std::future::Future;
use std::pin::Pin;

/// The signed-in user behind the current request
/// DOCUMENTATION: Handlers that take AuthUser are authenticated endpoints;
/// extraction fails with 401 before the handler body runs, so no pin query
/// or upload is ever attempted for an anonymous caller
pub struct AuthUser(pub User);

/// Pull the bearer token out of the Authorization header
pub fn bearer_token(req: &HttpRequest) -> Result<String, PinsError> {
    let header = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(PinsError::Unauthorized)?;

    let value = header.to_str().map_err(|_| PinsError::Unauthorized)?;

    let token = value.strip_prefix("Bearer ").ok_or(PinsError::Unauthorized)?;
    if token.is_empty() {
        return Err(PinsError::Unauthorized);
    }

    Ok(token.to_string())
}

impl FromRequest for AuthUser {
    type Error = PinsError;
    type Future = Pin<Box<dyn Future<Output = Result<AuthUser, PinsError>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            let pool = req
                .app_data::<web::Data<PgPool>>()
                .ok_or_else(|| {
                    log::error!("Database pool missing from app data");
                    PinsError::InternalError
                })?
                .clone();

            let token = bearer_token(&req)?;
            let token_hash = hash_token(&token);

            let user = UserRepository::get_user_by_token_hash(pool.get_ref(), &token_hash)
                .await?
                .ok_or(PinsError::Unauthorized)?;

            Ok(AuthUser(user))
        })
    }
}
