// src/handlers/auth.rs
// DOCUMENTATION: HTTP handlers for account operations
// PURPOSE: Signup, login, verification links and resend, with per-client throttling

use crate::config::Config;
use crate::errors::TravelError;
use crate::models::{
    LoginRequest, LoginResponse, MessageResponse, ResendVerificationRequest, SignupRequest,
};
use crate::services::{AuthRateLimiter, AuthService, EmailService, TokenService};
use actix_web::{http::header, web, HttpRequest, HttpResponse, Responder};
use chrono::Duration;
use sqlx::PgPool;
use validator::Validate;

/// Throttle key: the socket peer, or the forwarded client IP when the proxy is trusted
fn client_key(req: &HttpRequest, trust_proxy: bool) -> String {
    if trust_proxy {
        if let Some(ip) = req.connection_info().realip_remote_addr() {
            return ip.to_string();
        }
    }
    req.peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// POST /api/auth/signup
pub async fn signup(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    limiter: web::Data<AuthRateLimiter>,
    email_service: web::Data<EmailService>,
    body: web::Json<SignupRequest>,
) -> Result<impl Responder, TravelError> {
    limiter.check(&client_key(&req, config.trust_proxy))?;
    body.validate()?;

    AuthService::signup(pool.get_ref(), &email_service.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new(
        "Signup successful! Please check your email for verification.",
    )))
}

/// POST /api/auth/login
pub async fn login(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    limiter: web::Data<AuthRateLimiter>,
    tokens: web::Data<TokenService>,
    body: web::Json<LoginRequest>,
) -> Result<impl Responder, TravelError> {
    limiter.check(&client_key(&req, config.trust_proxy))?;
    body.validate()?;

    let token = AuthService::login(pool.get_ref(), tokens.get_ref(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(LoginResponse { token }))
}

/// POST /api/auth/resend-verification
pub async fn resend_verification(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    limiter: web::Data<AuthRateLimiter>,
    email_service: web::Data<EmailService>,
    body: web::Json<ResendVerificationRequest>,
) -> Result<impl Responder, TravelError> {
    limiter.check(&client_key(&req, config.trust_proxy))?;
    body.validate()?;

    AuthService::resend_verification(pool.get_ref(), &email_service.into_inner(), &body.email)
        .await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Verification email resent.")))
}

/// GET /api/auth/email-verification/{token} and GET /verify/{token}
///
/// DOCUMENTATION: Always redirects to the frontend with `status=success|error`
pub async fn verify_email(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    path: web::Path<String>,
) -> HttpResponse {
    let token = path.into_inner();
    let ttl = Duration::hours(config.verification_token_ttl_hours);

    let status = match AuthService::verify_email(pool.get_ref(), &token, ttl).await {
        Ok(user) => {
            log::info!("User {} verified their email", user.id);
            "success"
        }
        Err(e) => {
            log::warn!("Email verification failed: {}", e);
            "error"
        }
    };

    HttpResponse::Found()
        .insert_header((header::LOCATION, verification_redirect(&config, status)))
        .finish()
}

fn verification_redirect(config: &Config, status: &str) -> String {
    format!(
        "{}/verify?status={}",
        config.frontend_url.trim_end_matches('/'),
        status
    )
}

/// Configuration for auth routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/auth")
            .route("/signup", web::post().to(signup))
            .route("/login", web::post().to(login))
            .route("/resend-verification", web::post().to(resend_verification))
            .route("/email-verification/{token}", web::get().to(verify_email)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::UserRepository;
    use crate::handlers::extractor_config;
    use crate::handlers::testing::lazy_pool;
    use actix_web::{http::StatusCode, test, App};
    use serde_json::{json, Value};
    use std::net::SocketAddr;

    macro_rules! auth_app {
        ($limiter:expr) => {
            auth_app!($limiter, Config::for_tests(), lazy_pool())
        };
        ($limiter:expr, $config:expr, $pool:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($pool))
                    .app_data(web::Data::new($config))
                    .app_data(web::Data::new($limiter))
                    .app_data(web::Data::new(TokenService::new("test-secret", 60)))
                    .app_data(web::Data::new(
                        EmailService::from_config(&Config::for_tests()).unwrap(),
                    ))
                    .configure(extractor_config)
                    .configure(config),
            )
            .await
        };
    }

    fn peer() -> SocketAddr {
        "203.0.113.7:40000".parse().unwrap()
    }

    fn login_from(forwarded_for: &str) -> test::TestRequest {
        test::TestRequest::post()
            .uri("/api/auth/login")
            .peer_addr(peer())
            .insert_header(("X-Forwarded-For", forwarded_for))
            .set_json(json!({"email": "bad", "password": ""}))
    }

    #[actix_web::test]
    async fn test_signup_rejects_invalid_email() {
        let app = auth_app!(AuthRateLimiter::per_minute(10));
        let req = test::TestRequest::post()
            .uri("/api/auth/signup")
            .set_json(json!({"email": "not-an-email", "password": "secret"}))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_login_requires_password() {
        let app = auth_app!(AuthRateLimiter::per_minute(10));
        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({"email": "traveler@example.com", "password": ""}))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_malformed_body_gets_json_error() {
        let app = auth_app!(AuthRateLimiter::per_minute(10));
        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .insert_header(("content-type", "application/json"))
            .set_payload("{\"email\": ")
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"]["code"], "INVALID_INPUT");
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .starts_with("Invalid request body"));
    }

    #[actix_web::test]
    async fn test_auth_endpoints_are_throttled() {
        let app = auth_app!(AuthRateLimiter::per_minute(1));
        let body = json!({"email": "bad", "password": "x"});

        let first = test::TestRequest::post()
            .uri("/api/auth/signup")
            .peer_addr(peer())
            .set_json(&body)
            .to_request();
        assert_eq!(
            test::call_service(&app, first).await.status(),
            StatusCode::BAD_REQUEST
        );

        let second = test::TestRequest::post()
            .uri("/api/auth/login")
            .peer_addr(peer())
            .set_json(&body)
            .to_request();
        assert_eq!(
            test::call_service(&app, second).await.status(),
            StatusCode::TOO_MANY_REQUESTS
        );
    }

    #[actix_web::test]
    async fn test_spoofed_forwarded_for_does_not_reset_throttle() {
        let app = auth_app!(AuthRateLimiter::per_minute(1));

        let first = test::call_service(&app, login_from("198.51.100.1").to_request()).await;
        assert_eq!(first.status(), StatusCode::BAD_REQUEST);

        let second = test::call_service(&app, login_from("198.51.100.2").to_request()).await;
        assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[actix_web::test]
    async fn test_forwarded_for_is_the_key_behind_trusted_proxy() {
        let mut trusted = Config::for_tests();
        trusted.trust_proxy = true;
        let app = auth_app!(AuthRateLimiter::per_minute(1), trusted, lazy_pool());

        let first = test::call_service(&app, login_from("198.51.100.1").to_request()).await;
        assert_eq!(first.status(), StatusCode::BAD_REQUEST);

        let other_client = test::call_service(&app, login_from("198.51.100.2").to_request()).await;
        assert_eq!(other_client.status(), StatusCode::BAD_REQUEST);

        let repeat = test::call_service(&app, login_from("198.51.100.1").to_request()).await;
        assert_eq!(repeat.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[actix_web::test]
    async fn test_verification_redirect_target() {
        let mut config = Config::for_tests();
        config.frontend_url = "https://travel.example.com/".to_string();
        assert_eq!(
            verification_redirect(&config, "success"),
            "https://travel.example.com/verify?status=success"
        );
    }

    fn location(resp: &actix_web::dev::ServiceResponse) -> String {
        resp.headers()
            .get(header::LOCATION)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string()
    }

    #[actix_web::test]
    async fn test_unknown_token_redirects_to_error() {
        let app = auth_app!(AuthRateLimiter::per_minute(10));
        let req = test::TestRequest::get()
            .uri("/api/auth/email-verification/does-not-exist")
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(location(&resp), "http://localhost:3000/verify?status=error");
    }

    #[sqlx::test]
    #[ignore = "requires DATABASE_URL"]
    async fn test_verification_link_marks_user_verified(pool: PgPool) {
        let user = UserRepository::create_user(&pool, "fresh@example.com", "hash", None, "tok-fresh")
            .await
            .unwrap();
        let app = auth_app!(AuthRateLimiter::per_minute(10), Config::for_tests(), pool.clone());

        let req = test::TestRequest::get()
            .uri("/api/auth/email-verification/tok-fresh")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(location(&resp), "http://localhost:3000/verify?status=success");

        let stored = UserRepository::find_by_id(&pool, user.id).await.unwrap().unwrap();
        assert!(stored.is_verified);
    }

    #[sqlx::test]
    #[ignore = "requires DATABASE_URL"]
    async fn test_expired_verification_link_redirects_to_error(pool: PgPool) {
        let user = UserRepository::create_user(&pool, "stale@example.com", "hash", None, "tok-stale")
            .await
            .unwrap();
        sqlx::query(
            "UPDATE users SET verification_sent_at = NOW() - INTERVAL '48 hours' WHERE id = $1",
        )
        .bind(user.id)
        .execute(&pool)
        .await
        .unwrap();
        let app = auth_app!(AuthRateLimiter::per_minute(10), Config::for_tests(), pool.clone());

        let req = test::TestRequest::get()
            .uri("/api/auth/email-verification/tok-stale")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(location(&resp), "http://localhost:3000/verify?status=error");

        let stored = UserRepository::find_by_id(&pool, user.id).await.unwrap().unwrap();
        assert!(!stored.is_verified);
    }

    #[sqlx::test]
    #[ignore = "requires DATABASE_URL"]
    async fn test_signup_verify_login_flow(pool: PgPool) {
        let app = auth_app!(AuthRateLimiter::per_minute(10), Config::for_tests(), pool.clone());
        let credentials = json!({"email": "Flow@Example.com", "password": "s3cret!"});

        let req = test::TestRequest::post()
            .uri("/api/auth/signup")
            .set_json(&credentials)
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(&credentials)
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

        let user = UserRepository::find_by_email(&pool, "flow@example.com")
            .await
            .unwrap()
            .unwrap();
        let token = user.verification_token.unwrap();
        let req = test::TestRequest::get()
            .uri(&format!("/api/auth/email-verification/{}", token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(location(&resp), "http://localhost:3000/verify?status=success");

        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(&credentials)
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert!(body["token"].is_string());
    }
}
