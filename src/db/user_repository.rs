// src/db/user_repository.rs
// DOCUMENTATION: User database operations
// PURPOSE: Accounts, credentials and verification tokens

use crate::errors::TravelError;
use crate::models::User;
use sqlx::PgPool;
use uuid::Uuid;

const USER_COLUMNS: &str = r#"
    id, email, password_hash, nickname, is_verified,
    verification_token, verification_sent_at, created_at, updated_at
"#;

pub struct UserRepository;

impl UserRepository {
    /// Insert a new, unverified user with a pending verification token
    pub async fn create_user(
        pool: &PgPool,
        email: &str,
        password_hash: &str,
        nickname: Option<&str>,
        verification_token: &str,
    ) -> Result<User, TravelError> {
        let sql = format!(
            r#"
            INSERT INTO users (email, password_hash, nickname, verification_token, verification_sent_at)
            VALUES ($1, $2, $3, $4, NOW())
            RETURNING {}
            "#,
            USER_COLUMNS
        );

        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .bind(password_hash)
            .bind(nickname)
            .bind(verification_token)
            .fetch_one(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to create user {}: {}", email, e);
                TravelError::DatabaseError(e.to_string())
            })?;

        log::info!("Created user {}", user.id);
        Ok(user)
    }

    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, TravelError> {
        let sql = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);

        sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to look up user by email: {}", e);
                TravelError::DatabaseError(e.to_string())
            })
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>, TravelError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);

        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to look up user {}: {}", id, e);
                TravelError::DatabaseError(e.to_string())
            })
    }

    pub async fn find_by_verification_token(
        pool: &PgPool,
        token: &str,
    ) -> Result<Option<User>, TravelError> {
        let sql = format!(
            "SELECT {} FROM users WHERE verification_token = $1",
            USER_COLUMNS
        );

        sqlx::query_as::<_, User>(&sql)
            .bind(token)
            .fetch_optional(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to look up verification token: {}", e);
                TravelError::DatabaseError(e.to_string())
            })
    }

    /// Mark the user verified and clear the pending token
    pub async fn mark_verified(pool: &PgPool, id: Uuid) -> Result<(), TravelError> {
        let rows = sqlx::query(
            r#"
            UPDATE users
            SET is_verified = true,
                verification_token = NULL,
                verification_sent_at = NULL,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to verify user {}: {}", id, e);
            TravelError::DatabaseError(e.to_string())
        })?
        .rows_affected();

        if rows == 0 {
            return Err(TravelError::NotFound("User not found".to_string()));
        }

        log::info!("Verified user {}", id);
        Ok(())
    }

    /// Replace the pending verification token
    pub async fn set_verification_token(
        pool: &PgPool,
        id: Uuid,
        token: &str,
    ) -> Result<(), TravelError> {
        sqlx::query(
            r#"
            UPDATE users
            SET verification_token = $1,
                verification_sent_at = NOW(),
                updated_at = NOW()
            WHERE id = $2
            "#,
        )
        .bind(token)
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to rotate verification token for {}: {}", id, e);
            TravelError::DatabaseError(e.to_string())
        })?;

        Ok(())
    }
}
