// src/main.rs
// DOCUMENTATION: Application entry point
// PURPOSE: Initialize config, database, dataset and shared services, then start HTTP server

mod config;
mod db;
mod errors;
mod handlers;
mod models;
mod services;

use actix_web::{
    middleware::{Compress, DefaultHeaders, Logger},
    web, App, HttpServer,
};
use config::Config;
use dotenv::dotenv;
use services::{
    start_rate_limit_cleanup, start_refresh_task, AuthRateLimiter, DatasetCache, EmailService,
    TokenService,
};
use std::io;
use std::sync::Arc;

#[actix_web::main]
async fn main() -> io::Result<()> {
    // 1. Load environment variables
    dotenv().ok();

    // 2. Load configuration
    let config = Config::from_env();

    // 3. Initialize logging
    if std::env::var("RUST_LOG").is_err() {
        let log_level = if !config.log_level.is_empty() {
            &config.log_level
        } else {
            "info,actix_web=info,sqlx=warn"
        };
        std::env::set_var("RUST_LOG", log_level);
    }
    env_logger::init();

    if let Err(e) = config.validate() {
        log::error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    log::info!("Starting travel-lists backend...");
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

    // 5. Destinations dataset, warmed up front and refreshed in the background
    let dataset = Arc::new(DatasetCache::new(
        &config.dataset_path,
        config.dataset_ttl_secs,
    ));
    match dataset.get().await {
        Ok(data) if data.is_empty() => log::warn!("Dataset {} has no rows", dataset.path().display()),
        Ok(data) => log::info!("Dataset loaded with {} destinations", data.len()),
        Err(e) => log::warn!("Dataset not loaded at startup: {}", e),
    }
    start_refresh_task(dataset.clone(), config.dataset_ttl_secs);
    log::info!(
        "Dataset cache ready for {} (TTL: {}s)",
        dataset.path().display(),
        config.dataset_ttl_secs
    );

    // 6. Shared services
    let tokens = web::Data::new(TokenService::from_config(&config));
    let email_service = match EmailService::from_config(&config) {
        Ok(service) => Arc::new(service),
        Err(e) => {
            log::error!("Failed to initialize email service: {}", e);
            std::process::exit(1);
        }
    };

    let limiter = Arc::new(AuthRateLimiter::per_minute(
        config.auth_rate_limit_per_minute,
    ));
    start_rate_limit_cleanup(limiter.clone(), 60);

    // 7. Start HTTP server
    let server_addr = format!("{}:{}", config.server_address, config.server_port);
    let config_clone = config.clone();

    HttpServer::new(move || {
        let cors = DefaultHeaders::new()
            .add(("Access-Control-Allow-Origin", config_clone.frontend_url.as_str()))
            .add(("Access-Control-Allow-Methods", "GET, POST, PUT, DELETE, OPTIONS"))
            .add((
                "Access-Control-Allow-Headers",
                "Content-Type, Authorization, x-auth-token",
            ))
            .add(("Access-Control-Allow-Credentials", "true"));

        App::new()
            // Application state
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(config_clone.clone()))
            .app_data(web::Data::from(dataset.clone()))
            .app_data(tokens.clone())
            .app_data(web::Data::from(email_service.clone()))
            .app_data(web::Data::from(limiter.clone()))
            // Middleware
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(Compress::default())
            // Extractor errors use the JSON error body
            .configure(handlers::extractor_config)
            // Routes; root first so its OPTIONS catch-all wins
            .configure(handlers::health_config)
            .configure(handlers::auth_config)
            .configure(handlers::protected_config)
            .configure(handlers::lists_config)
            .configure(handlers::destinations_config)
            .configure(handlers::search_config)
            .configure(handlers::countries_config)
    })
    .bind(&server_addr)?
    .run()
    .await
}
