// src/handlers/protected.rs
// DOCUMENTATION: Token check endpoint used by the frontend

use crate::db::UserRepository;
use crate::errors::TravelError;
use crate::handlers::AuthUser;
use crate::models::UserResponse;
use actix_web::{web, HttpResponse, Responder};
use serde::Serialize;
use sqlx::PgPool;

#[derive(Debug, Serialize)]
pub struct ProtectedResponse {
    pub message: String,
    pub user: UserResponse,
}

/// GET /api/protected
pub async fn protected(
    pool: web::Data<PgPool>,
    user: AuthUser,
) -> Result<impl Responder, TravelError> {
    let user = UserRepository::find_by_id(pool.get_ref(), user.id)
        .await?
        .ok_or_else(|| {
            log::warn!("Token for unknown user {}", user.id);
            TravelError::Unauthorized("User not found".to_string())
        })?;

    Ok(HttpResponse::Ok().json(ProtectedResponse {
        message: "This is a protected route".to_string(),
        user: user.to_response(),
    }))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/protected", web::get().to(protected));
}
