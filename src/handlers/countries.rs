// src/handlers/countries.rs

use crate::errors::TravelError;
use crate::services::{DatasetCache, DestinationService};
use actix_web::{web, HttpResponse, Responder};

/// GET /api/countries
/// Distinct countries in dataset order
pub async fn get_countries(cache: web::Data<DatasetCache>) -> Result<impl Responder, TravelError> {
    let dataset = cache.get().await?;
    let countries = DestinationService::countries(&dataset)?;
    Ok(HttpResponse::Ok().json(countries))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/countries", web::get().to(get_countries));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::testing::sample_cache;
    use actix_web::{http::StatusCode, test, App};

    #[actix_web::test]
    async fn test_lists_distinct_countries() {
        let (_file, cache) = sample_cache();
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(cache))
                .configure(config),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/countries").to_request();
        let countries: Vec<String> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(countries, vec!["Italy", "France", "Austria", "Greece"]);
    }

    #[actix_web::test]
    async fn test_missing_dataset_is_server_error() {
        let cache = DatasetCache::new("/nonexistent/destinations.csv", 300);
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(cache))
                .configure(config),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/countries").to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
