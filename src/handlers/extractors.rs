// src/handlers/extractors.rs
// DOCUMENTATION: Request authentication
// PURPOSE: Resolve the caller from `x-auth-token` or `Authorization: Bearer`

use crate::errors::TravelError;
use crate::services::TokenService;
use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use std::future::{ready, Ready};
use uuid::Uuid;

pub const AUTH_TOKEN_HEADER: &str = "x-auth-token";

/// Authenticated caller
/// Use `Option<AuthUser>` on routes where authentication is optional
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub nickname: Option<String>,
}

fn bearer_token(req: &HttpRequest) -> Option<&str> {
    if let Some(token) = req
        .headers()
        .get(AUTH_TOKEN_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|t| !t.is_empty())
    {
        return Some(token);
    }

    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

fn authenticate(req: &HttpRequest) -> Result<AuthUser, TravelError> {
    let token = bearer_token(req).ok_or_else(|| {
        log::debug!("Request to {} without token", req.path());
        TravelError::Unauthorized("Access denied. No token provided.".to_string())
    })?;

    let tokens = req.app_data::<web::Data<TokenService>>().ok_or_else(|| {
        log::error!("TokenService is not registered as app data");
        TravelError::InternalError("Authentication is not configured".to_string())
    })?;

    let claims = tokens.verify(token)?;
    Ok(AuthUser {
        id: claims.id,
        nickname: claims.nickname,
    })
}

impl FromRequest for AuthUser {
    type Error = TravelError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    fn tokens() -> web::Data<TokenService> {
        web::Data::new(TokenService::new("test-secret", 60))
    }

    #[actix_web::test]
    async fn test_reads_custom_header() {
        let user_id = Uuid::new_v4();
        let token = tokens().issue(user_id, Some("nomad")).unwrap();
        let req = TestRequest::default()
            .app_data(tokens())
            .insert_header((AUTH_TOKEN_HEADER, token))
            .to_http_request();

        let user = AuthUser::extract(&req).await.unwrap();
        assert_eq!(user.id, user_id);
        assert_eq!(user.nickname.as_deref(), Some("nomad"));
    }

    #[actix_web::test]
    async fn test_reads_bearer_header() {
        let user_id = Uuid::new_v4();
        let token = tokens().issue(user_id, None).unwrap();
        let req = TestRequest::default()
            .app_data(tokens())
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
            .to_http_request();

        assert_eq!(AuthUser::extract(&req).await.unwrap().id, user_id);
    }

    #[actix_web::test]
    async fn test_missing_token_is_unauthorized() {
        let req = TestRequest::default().app_data(tokens()).to_http_request();

        match AuthUser::extract(&req).await {
            Err(TravelError::Unauthorized(msg)) => {
                assert_eq!(msg, "Access denied. No token provided.")
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[actix_web::test]
    async fn test_optional_extractor_yields_none() {
        let req = TestRequest::default()
            .app_data(tokens())
            .insert_header((AUTH_TOKEN_HEADER, "garbage"))
            .to_http_request();

        let user = Option::<AuthUser>::extract(&req).await.unwrap();
        assert!(user.is_none());
    }
}
