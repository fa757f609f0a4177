// src/main.rs
// DOCUMENTATION: Application entry point
// PURPOSE: Initialize config, database, storage, and start HTTP server

mod auth;
mod config;
mod db;
mod errors;
mod handlers;
mod models;
mod services;

use actix_web::{middleware::Logger, web, App, HttpServer};
use config::Config;
use dotenv::dotenv;
use services::{LoginLimiter, PhotoStorage};
use std::io;

#[actix_web::main]
async fn main() -> io::Result<()> {
    // 1. Load environment variables
    dotenv().ok();

    // 2. Load configuration
    let config = Config::from_env();
    if let Err(e) = config.validate() {
        eprintln!("Configuration error: {}", e);
        // We continue but log error, or we could panic
    }

    // 3. Initialize logging
    if std::env::var("RUST_LOG").is_err() {
        // Use configured log level or default
        let log_level = if !config.log_level.is_empty() {
            &config.log_level
        } else {
            "info,actix_web=info,sqlx=warn"
        };
        std::env::set_var("RUST_LOG", log_level);
    }
    env_logger::init();

    log::info!("Starting picjourni-pins microservice...");
    log::info!("Environment: {}", config.environment);
    log::info!(
        "Server Address: {}:{}",
        config.server_address,
        config.server_port
    );

    // 4. Initialize database connection pool
    let pool = match config::init_db_pool(&config).await {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to connect to database: {}", e);
            std::process::exit(1);
        }
    };

    // 5. Initialize photo object storage
    let storage = match PhotoStorage::new(
        config.storage_root.clone(),
        config.storage_public_url.clone(),
    )
    .await
    {
        Ok(storage) => storage,
        Err(e) => {
            log::error!("Failed to initialize photo storage: {}", e);
            std::process::exit(1);
        }
    };
    log::info!(
        "Photo storage ready at {} (served from {})",
        config.storage_root,
        config.storage_public_url
    );

    // 6. Initialize login rate limiter
    let limiter = web::Data::new(LoginLimiter::new(config.login_attempts_per_minute));
    log::info!(
        "Login limiter: {} attempts per minute per account",
        config.login_attempts_per_minute
    );

    // 7. Start HTTP server
    let server_addr = format!("{}:{}", config.server_address, config.server_port);
    let config_clone = config.clone();

    HttpServer::new(move || {
        App::new()
            // Application state (database pool, config, storage, limiter)
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(config_clone.clone()))
            .app_data(web::Data::new(storage.clone()))
            .app_data(limiter.clone())
            // Middleware
            .wrap(Logger::default())
            .wrap(actix_web::middleware::Compress::default())
            // Routes
            .configure(handlers::health_config)
            .configure(handlers::auth_config)
            .configure(handlers::pins_config)
            .configure(handlers::media_config)
            .configure(handlers::admin_config)
    })
    .bind(&server_addr)?
    .run()
    .await
}
