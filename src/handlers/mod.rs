// src/handlers/mod.rs
// DOCUMENTATION: Handlers module organization
// PURPOSE: Re-export handler components

pub mod auth;
pub mod countries;
pub mod destinations;
pub mod extractors;
pub mod health;
pub mod lists;
pub mod protected;
pub mod search;

pub use auth::config as auth_config;
pub use countries::config as countries_config;
pub use destinations::config as destinations_config;
pub use extractors::AuthUser;
pub use health::config as health_config;
pub use lists::config as lists_config;
pub use protected::config as protected_config;
pub use search::config as search_config;

use crate::errors::TravelError;
use actix_web::web;

/// Extractor failures (bad JSON, query or path) answer with the JSON error body
pub fn extractor_config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, req| {
        log::warn!("Rejected JSON body for {}: {}", req.path(), err);
        TravelError::InvalidInput(format!("Invalid request body: {}", err)).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, req| {
        log::warn!("Rejected query string for {}: {}", req.path(), err);
        TravelError::InvalidInput(format!("Invalid query parameters: {}", err)).into()
    }))
    .app_data(web::PathConfig::default().error_handler(|err, req| {
        log::warn!("Unmatched path parameters for {}: {}", req.path(), err);
        TravelError::NotFound("Resource not found".to_string()).into()
    }));
}
