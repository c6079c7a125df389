// src/handlers/destinations.rs
// DOCUMENTATION: HTTP handlers for dataset destinations
// PURPOSE: Lookup, coordinates, field filter and destination reviews

use crate::errors::TravelError;
use crate::handlers::AuthUser;
use crate::models::CreateReviewRequest;
use crate::services::{DatasetCache, DestinationService, ReviewService};
use actix_web::{web, HttpResponse, Responder};
use sqlx::PgPool;
use validator::Validate;

/// GET /api/destinations?<field>=<value>...
pub async fn filter_destinations(
    cache: web::Data<DatasetCache>,
    query: web::Query<Vec<(String, String)>>,
) -> Result<impl Responder, TravelError> {
    let dataset = cache.get().await?;
    let results = DestinationService::filter(&dataset, &query)?;
    Ok(HttpResponse::Ok().json(results))
}

/// GET /api/destinations/{id}
pub async fn get_destination(
    cache: web::Data<DatasetCache>,
    path: web::Path<String>,
) -> Result<impl Responder, TravelError> {
    let dataset = cache.get().await?;
    let destination = DestinationService::get_by_id(&dataset, &path)?;
    Ok(HttpResponse::Ok().json(destination))
}

/// GET /api/destinations/{id}/coordinates
pub async fn get_coordinates(
    cache: web::Data<DatasetCache>,
    path: web::Path<String>,
) -> Result<impl Responder, TravelError> {
    let dataset = cache.get().await?;
    let coordinates = DestinationService::coordinates(&dataset, &path)?;
    Ok(HttpResponse::Ok().json(coordinates))
}

/// GET /api/destinations/{id}/reviews
pub async fn get_reviews(
    pool: web::Data<PgPool>,
    cache: web::Data<DatasetCache>,
    path: web::Path<String>,
) -> Result<impl Responder, TravelError> {
    let dataset = cache.get().await?;
    let reviews = ReviewService::destination_reviews(pool.get_ref(), &dataset, &path).await?;
    Ok(HttpResponse::Ok().json(reviews))
}

/// POST /api/destinations/{id}/reviews
pub async fn add_review(
    pool: web::Data<PgPool>,
    cache: web::Data<DatasetCache>,
    user: AuthUser,
    path: web::Path<String>,
    req: web::Json<CreateReviewRequest>,
) -> Result<impl Responder, TravelError> {
    req.validate()?;

    let dataset = cache.get().await?;
    let response = ReviewService::add_destination_review(
        pool.get_ref(),
        &dataset,
        &path,
        user.id,
        user.nickname.as_deref(),
        req.into_inner(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Configuration for destination routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/destinations")
            .route("", web::get().to(filter_destinations))
            .route("/{id}", web::get().to(get_destination))
            .route("/{id}/coordinates", web::get().to(get_coordinates))
            .route("/{id}/reviews", web::get().to(get_reviews))
            .route("/{id}/reviews", web::post().to(add_review)),
    );
}
