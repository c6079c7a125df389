// src/handlers/health.rs
// DOCUMENTATION: Root routes
// PURPOSE: Landing page, health probe, verification link target and CORS preflight

use crate::config::Config;
use crate::handlers::auth::verify_email;
use actix_web::{guard, http::header::ContentType, web, HttpResponse, Responder};
use serde_json::json;

/// Landing page linking to the public API base
pub async fn index(config: web::Data<Config>) -> impl Responder {
    let api_base = format!("{}/api", config.app_base_url.trim_end_matches('/'));
    HttpResponse::Ok().content_type(ContentType::html()).body(format!(
        "<h1>Backend is running!</h1><p>API base: <a href=\"{0}\">{0}</a></p>",
        api_base
    ))
}

pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "service": "travel-lists",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Answers any OPTIONS request; CORS headers are added by middleware
pub async fn preflight() -> impl Responder {
    HttpResponse::NoContent().finish()
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/{tail:.*}")
            .guard(guard::Options())
            .to(preflight),
    )
    .route("/", web::get().to(index))
    .route("/health", web::get().to(health_check))
    .route("/verify/{token}", web::get().to(verify_email));
}
