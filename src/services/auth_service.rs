// src/services/auth_service.rs
// DOCUMENTATION: Account lifecycle - signup, verification, login
// PURPOSE: Single verification-token protocol shared by every entry point

use crate::db::UserRepository;
use crate::errors::TravelError;
use crate::models::{LoginRequest, SignupRequest, User};
use crate::services::email_service::EmailService;
use crate::services::password::{hash_password, verify_password};
use crate::services::sanitize::{clean_optional_text, normalize_email};
use crate::services::token::TokenService;
use chrono::{Duration, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

pub const INVALID_CREDENTIALS: &str = "Invalid email or password";

pub struct AuthService;

impl AuthService {
    /// Register a new unverified account and send its verification link
    pub async fn signup(
        pool: &PgPool,
        email_service: &Arc<EmailService>,
        req: SignupRequest,
    ) -> Result<(), TravelError> {
        let email = normalize_email(&req.email);

        if let Some(existing) = UserRepository::find_by_email(pool, &email).await? {
            let message = if existing.is_verified {
                "User already exists"
            } else {
                "User exists but is not verified. Please check your email for verification."
            };
            return Err(TravelError::InvalidInput(message.to_string()));
        }

        let password_hash = hash_off_runtime(req.password).await?;
        let nickname = clean_optional_text(req.name.as_deref(), 50);
        let token = new_verification_token();

        let user = UserRepository::create_user(
            pool,
            &email,
            &password_hash,
            nickname.as_deref(),
            &token,
        )
        .await?;

        email_service.dispatch_verification_email(user.email, token);
        Ok(())
    }

    /// Check credentials and issue an access token
    pub async fn login(
        pool: &PgPool,
        tokens: &TokenService,
        req: LoginRequest,
    ) -> Result<String, TravelError> {
        let email = normalize_email(&req.email);
        let user = UserRepository::find_by_email(pool, &email)
            .await?
            .ok_or_else(|| TravelError::InvalidInput(INVALID_CREDENTIALS.to_string()))?;

        if !user.is_verified {
            return Err(TravelError::InvalidInput(
                "Account not verified. Please check your email for the verification link."
                    .to_string(),
            ));
        }

        if !verify_off_runtime(req.password, user.password_hash.clone()).await? {
            log::warn!("Failed login for user {}", user.id);
            return Err(TravelError::InvalidInput(INVALID_CREDENTIALS.to_string()));
        }

        log::info!("User {} logged in", user.id);
        tokens.issue(user.id, user.nickname.as_deref())
    }

    /// Confirm an email address from a verification link
    pub async fn verify_email(
        pool: &PgPool,
        token: &str,
        token_ttl: Duration,
    ) -> Result<User, TravelError> {
        let user = UserRepository::find_by_verification_token(pool, token)
            .await?
            .ok_or_else(|| {
                log::warn!("Unknown verification token");
                TravelError::NotFound("Invalid or expired token".to_string())
            })?;

        if is_token_expired(&user, token_ttl) {
            log::warn!("Expired verification token for user {}", user.id);
            return Err(TravelError::ValidationError(
                "Verification link expired".to_string(),
            ));
        }

        UserRepository::mark_verified(pool, user.id).await?;
        Ok(user)
    }

    /// Rotate the token of an unverified account and resend the link
    pub async fn resend_verification(
        pool: &PgPool,
        email_service: &Arc<EmailService>,
        email: &str,
    ) -> Result<(), TravelError> {
        let email = normalize_email(email);
        let user = UserRepository::find_by_email(pool, &email)
            .await?
            .ok_or_else(|| TravelError::InvalidInput("User not found".to_string()))?;

        if user.is_verified {
            return Err(TravelError::InvalidInput(
                "User is already verified".to_string(),
            ));
        }

        let token = new_verification_token();
        UserRepository::set_verification_token(pool, user.id, &token).await?;
        email_service.dispatch_verification_email(user.email, token);
        Ok(())
    }
}

/// Argon2 is CPU-heavy; keep it off the async workers
async fn hash_off_runtime(password: String) -> Result<String, TravelError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| {
            log::error!("Password hashing task failed: {}", e);
            TravelError::InternalError("Password hashing failed".to_string())
        })?
}

async fn verify_off_runtime(password: String, hash: String) -> Result<bool, TravelError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| {
            log::error!("Password verification task failed: {}", e);
            TravelError::InternalError("Password verification failed".to_string())
        })?
}

fn new_verification_token() -> String {
    Uuid::new_v4().to_string()
}

/// A token without an issue time never expires
fn is_token_expired(user: &User, ttl: Duration) -> bool {
    user.verification_sent_at
        .map(|sent_at| sent_at + ttl < Utc::now())
        .unwrap_or(false)
}
