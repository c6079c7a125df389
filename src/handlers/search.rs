// src/handlers/search.rs
// DOCUMENTATION: Prefix search over the destinations dataset

use crate::errors::TravelError;
use crate::services::{DatasetCache, DestinationService};
use actix_web::{web, HttpResponse, Responder};

/// GET /api/search?<field>=<prefix>...
pub async fn search_destinations(
    cache: web::Data<DatasetCache>,
    query: web::Query<Vec<(String, String)>>,
) -> Result<impl Responder, TravelError> {
    let dataset = cache.get().await?;
    let results = DestinationService::search(&dataset, &query)?;
    Ok(HttpResponse::Ok().json(results))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/search", web::get().to(search_destinations));
}
