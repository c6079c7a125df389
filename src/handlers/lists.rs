// src/handlers/lists.rs
// DOCUMENTATION: HTTP handlers for curated lists
// PURPOSE: Parse requests, call services, return responses

use crate::errors::TravelError;
use crate::handlers::AuthUser;
use crate::models::{
    CreateListRequest, CreateReviewRequest, MessageResponse, PaginationQuery, UpdateListRequest,
};
use crate::services::{ListService, Pagination, ReviewService};
use actix_web::{web, HttpResponse, Responder};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// POST /api/lists
pub async fn create_list(
    pool: web::Data<PgPool>,
    user: AuthUser,
    req: web::Json<CreateListRequest>,
) -> Result<impl Responder, TravelError> {
    req.validate()?;

    let list = ListService::create_list(pool.get_ref(), user.id, req.into_inner()).await?;
    Ok(HttpResponse::Created().json(list))
}

/// GET /api/lists
/// Public lists, newest first
pub async fn get_lists(
    pool: web::Data<PgPool>,
    query: web::Query<PaginationQuery>,
) -> Result<impl Responder, TravelError> {
    let pagination = Pagination::from_query(&query, 10);
    let page = ListService::public_lists(pool.get_ref(), pagination).await?;
    Ok(HttpResponse::Ok().json(page))
}

/// GET /api/lists/home
pub async fn get_home_lists(
    pool: web::Data<PgPool>,
    user: AuthUser,
    query: web::Query<PaginationQuery>,
) -> Result<impl Responder, TravelError> {
    let pagination = Pagination::from_query(&query, 10);
    let home = ListService::home_lists(pool.get_ref(), user.id, pagination).await?;
    Ok(HttpResponse::Ok().json(home))
}

/// GET /api/lists/public
pub async fn get_public_lists(
    pool: web::Data<PgPool>,
    _user: AuthUser,
    query: web::Query<PaginationQuery>,
) -> Result<impl Responder, TravelError> {
    let pagination = Pagination::from_query(&query, 20);
    let page = ListService::public_lists(pool.get_ref(), pagination).await?;
    Ok(HttpResponse::Ok().json(page))
}

/// GET /api/lists/mine
pub async fn get_my_lists(
    pool: web::Data<PgPool>,
    user: AuthUser,
) -> Result<impl Responder, TravelError> {
    let lists = ListService::my_lists(pool.get_ref(), user.id).await?;
    Ok(HttpResponse::Ok().json(lists))
}

/// GET /api/lists/{id}
pub async fn get_list(
    pool: web::Data<PgPool>,
    user: Option<AuthUser>,
    path: web::Path<Uuid>,
) -> Result<impl Responder, TravelError> {
    let viewer = user.map(|u| u.id);
    let list = ListService::get_list(pool.get_ref(), path.into_inner(), viewer).await?;
    Ok(HttpResponse::Ok().json(list))
}

/// PUT /api/lists/{id}
pub async fn update_list(
    pool: web::Data<PgPool>,
    user: AuthUser,
    path: web::Path<Uuid>,
    req: web::Json<UpdateListRequest>,
) -> Result<impl Responder, TravelError> {
    req.validate()?;

    let list =
        ListService::update_list(pool.get_ref(), path.into_inner(), user.id, req.into_inner())
            .await?;
    Ok(HttpResponse::Ok().json(list))
}

/// DELETE /api/lists/{id}
pub async fn delete_list(
    pool: web::Data<PgPool>,
    user: AuthUser,
    path: web::Path<Uuid>,
) -> Result<impl Responder, TravelError> {
    ListService::delete_list(pool.get_ref(), path.into_inner(), user.id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("List deleted successfully")))
}

/// POST /api/lists/{id}/reviews
pub async fn add_review(
    pool: web::Data<PgPool>,
    user: AuthUser,
    path: web::Path<Uuid>,
    req: web::Json<CreateReviewRequest>,
) -> Result<impl Responder, TravelError> {
    req.validate()?;

    let list =
        ReviewService::add_list_review(pool.get_ref(), path.into_inner(), user.id, req.into_inner())
            .await?;
    Ok(HttpResponse::Ok().json(list))
}

/// Configuration for list routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/lists")
            .route("", web::post().to(create_list))
            .route("", web::get().to(get_lists))
            .route("/home", web::get().to(get_home_lists))
            .route("/public", web::get().to(get_public_lists))
            .route("/mine", web::get().to(get_my_lists))
            .route("/{id}", web::get().to(get_list))
            .route("/{id}", web::put().to(update_list))
            .route("/{id}", web::delete().to(delete_list))
            .route("/{id}/reviews", web::post().to(add_review)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{ListRepository, UserRepository};
    use crate::handlers::extractor_config;
    use crate::handlers::extractors::AUTH_TOKEN_HEADER;
    use crate::handlers::testing::lazy_pool;
    use crate::services::TokenService;
    use actix_web::{http::StatusCode, test, App};
    use serde_json::{json, Value};

    const SECRET: &str = "test-secret";

    macro_rules! lists_app {
        () => {
            lists_app!(lazy_pool())
        };
        ($pool:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($pool))
                    .app_data(web::Data::new(TokenService::new(SECRET, 60)))
                    .configure(extractor_config)
                    .configure(config),
            )
            .await
        };
    }

    fn token_for(user_id: Uuid) -> String {
        TokenService::new(SECRET, 60).issue(user_id, None).unwrap()
    }

    #[actix_web::test]
    async fn test_create_requires_token() {
        let app = lists_app!();
        let req = test::TestRequest::post()
            .uri("/api/lists")
            .set_json(json!({"name": "Alps"}))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["message"], "Access denied. No token provided.");
    }

    #[actix_web::test]
    async fn test_mine_rejects_invalid_token() {
        let app = lists_app!();
        let req = test::TestRequest::get()
            .uri("/api/lists/mine")
            .insert_header((AUTH_TOKEN_HEADER, "not-a-token"))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_review_rating_out_of_range() {
        let app = lists_app!();
        let token = TokenService::new(SECRET, 60)
            .issue(Uuid::new_v4(), Some("nomad"))
            .unwrap();
        let req = test::TestRequest::post()
            .uri(&format!("/api/lists/{}/reviews", Uuid::new_v4()))
            .insert_header((AUTH_TOKEN_HEADER, token))
            .set_json(json!({"rating": 9}))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["message"], "Rating must be between 1 and 5");
    }

    #[actix_web::test]
    async fn test_review_rating_as_numeric_string() {
        let app = lists_app!();
        let req = test::TestRequest::post()
            .uri(&format!("/api/lists/{}/reviews", Uuid::new_v4()))
            .insert_header((AUTH_TOKEN_HEADER, token_for(Uuid::new_v4())))
            .set_json(json!({"rating": "9"}))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["message"], "Rating must be between 1 and 5");
    }

    #[actix_web::test]
    async fn test_review_rating_not_a_number() {
        let app = lists_app!();
        let req = test::TestRequest::post()
            .uri(&format!("/api/lists/{}/reviews", Uuid::new_v4()))
            .insert_header((AUTH_TOKEN_HEADER, token_for(Uuid::new_v4())))
            .set_json(json!({"rating": "five"}))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "INVALID_INPUT");
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("Rating must be between 1 and 5"));
    }

    #[actix_web::test]
    async fn test_bad_page_query_gets_json_error() {
        let app = lists_app!();
        let req = test::TestRequest::get()
            .uri("/api/lists?page=abc")
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "INVALID_INPUT");
    }

    #[actix_web::test]
    async fn test_malformed_list_id_is_not_found() {
        let app = lists_app!();
        let req = test::TestRequest::get()
            .uri("/api/lists/not-a-uuid")
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    async fn seed_list(pool: &PgPool) -> (Uuid, Uuid) {
        let owner = UserRepository::create_user(pool, "owner@example.com", "hash", Some("Owner"), "tok-owner")
            .await
            .unwrap();
        let req: CreateListRequest = serde_json::from_value(json!({"name": "Fjords"})).unwrap();
        let list = ListRepository::create_list(pool, owner.id, &req).await.unwrap();
        (owner.id, list.id)
    }

    #[sqlx::test]
    #[ignore = "requires DATABASE_URL"]
    async fn test_only_owner_may_update_or_delete(pool: PgPool) {
        let (owner, list_id) = seed_list(&pool).await;
        let stranger = UserRepository::create_user(&pool, "other@example.com", "hash", None, "tok-other")
            .await
            .unwrap();
        let app = lists_app!(pool.clone());
        let uri = format!("/api/lists/{}", list_id);

        let req = test::TestRequest::put()
            .uri(&uri)
            .insert_header((AUTH_TOKEN_HEADER, token_for(stranger.id)))
            .set_json(json!({"name": "Hijacked"}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::delete()
            .uri(&uri)
            .insert_header((AUTH_TOKEN_HEADER, token_for(stranger.id)))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::put()
            .uri(&uri)
            .insert_header((AUTH_TOKEN_HEADER, token_for(owner)))
            .set_json(json!({"name": "Norwegian Fjords"}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["name"], "Norwegian Fjords");

        let req = test::TestRequest::delete()
            .uri(&uri)
            .insert_header((AUTH_TOKEN_HEADER, token_for(owner)))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::get().uri(&uri).to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }

    #[sqlx::test]
    #[ignore = "requires DATABASE_URL"]
    async fn test_review_updates_list_average(pool: PgPool) {
        let (owner, list_id) = seed_list(&pool).await;
        let app = lists_app!(pool.clone());
        let uri = format!("/api/lists/{}/reviews", list_id);

        for rating in [json!(5), json!("2")] {
            let req = test::TestRequest::post()
                .uri(&uri)
                .insert_header((AUTH_TOKEN_HEADER, token_for(owner)))
                .set_json(json!({ "rating": rating }))
                .to_request();
            assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
        }

        let req = test::TestRequest::get()
            .uri(&format!("/api/lists/{}", list_id))
            .insert_header((AUTH_TOKEN_HEADER, token_for(owner)))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["averageRating"], 3.5);
        assert_eq!(body["reviews"].as_array().unwrap().len(), 2);
    }
}
