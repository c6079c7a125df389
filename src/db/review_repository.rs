// src/db/review_repository.rs
// DOCUMENTATION: Review database operations
// PURPOSE: Store list/destination reviews and keep their average ratings current

use crate::errors::TravelError;
use crate::models::{DestinationRating, NewReview, Review};
use sqlx::PgPool;
use uuid::Uuid;

/// Author of a review being written
#[derive(Debug, Clone)]
pub struct ReviewAuthor {
    pub user_id: Uuid,
    pub nickname: String,
}

fn db_error(context: &str, e: sqlx::Error) -> TravelError {
    log::error!("{}: {}", context, e);
    TravelError::DatabaseError(format!("{}: {}", context, e))
}

pub struct ReviewRepository;

impl ReviewRepository {
    /// Insert a list review and recompute the list's average rating
    /// DOCUMENTATION: Insert and recompute run in one transaction holding the list row lock,
    /// so concurrent reviews of the same list see each other's rows
    /// Returns the new average
    pub async fn add_list_review(
        pool: &PgPool,
        list_id: Uuid,
        author: &ReviewAuthor,
        review: &NewReview,
    ) -> Result<f64, TravelError> {
        let mut tx = pool
            .begin()
            .await
            .map_err(|e| db_error("Begin transaction failed", e))?;

        sqlx::query("SELECT id FROM lists WHERE id = $1 FOR UPDATE")
            .bind(list_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| db_error("Lock list failed", e))?
            .ok_or_else(|| TravelError::NotFound("List not found".to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO list_reviews (list_id, user_id, nickname, rating, comment)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(list_id)
        .bind(author.user_id)
        .bind(&author.nickname)
        .bind(review.rating)
        .bind(&review.comment)
        .execute(&mut *tx)
        .await
        .map_err(|e| db_error("Create list review failed", e))?;

        let (average,): (f64,) = sqlx::query_as(
            r#"
            UPDATE lists
            SET average_rating = (
                SELECT COALESCE(AVG(rating), 0)::float8 FROM list_reviews WHERE list_id = $1
            )
            WHERE id = $1
            RETURNING average_rating
            "#,
        )
        .bind(list_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| db_error("Update list average failed", e))?;

        tx.commit()
            .await
            .map_err(|e| db_error("Commit list review failed", e))?;

        log::info!("Added review to list {} (average {:.2})", list_id, average);
        Ok(average)
    }

    /// Get reviews for a list, newest first
    pub async fn get_list_reviews(pool: &PgPool, list_id: Uuid) -> Result<Vec<Review>, TravelError> {
        sqlx::query_as::<_, Review>(
            r#"
            SELECT id, list_id::text AS subject_id, user_id, nickname, rating, comment, created_at
            FROM list_reviews
            WHERE list_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(list_id)
        .fetch_all(pool)
        .await
        .map_err(|e| db_error(&format!("Fetch reviews for list {} failed", list_id), e))
    }

    /// Insert a destination review and refresh the destination aggregate
    /// Writers for one destination are serialized with a transaction-scoped advisory lock
    pub async fn add_destination_review(
        pool: &PgPool,
        destination_id: &str,
        author: &ReviewAuthor,
        review: &NewReview,
    ) -> Result<DestinationRating, TravelError> {
        let mut tx = pool
            .begin()
            .await
            .map_err(|e| db_error("Begin transaction failed", e))?;

        sqlx::query("SELECT pg_advisory_xact_lock(hashtext('destination:' || $1))")
            .bind(destination_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("Lock destination failed", e))?;

        sqlx::query(
            r#"
            INSERT INTO destination_reviews (destination_id, user_id, nickname, rating, comment)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(destination_id)
        .bind(author.user_id)
        .bind(&author.nickname)
        .bind(review.rating)
        .bind(&review.comment)
        .execute(&mut *tx)
        .await
        .map_err(|e| db_error("Create destination review failed", e))?;

        let rating = sqlx::query_as::<_, DestinationRating>(
            r#"
            INSERT INTO destination_ratings (destination_id, average_rating, review_count, updated_at)
            SELECT $1, COALESCE(AVG(rating), 0)::float8, COUNT(*)::int4, NOW()
            FROM destination_reviews
            WHERE destination_id = $1
            ON CONFLICT (destination_id) DO UPDATE
            SET average_rating = EXCLUDED.average_rating,
                review_count = EXCLUDED.review_count,
                updated_at = EXCLUDED.updated_at
            RETURNING average_rating, review_count
            "#,
        )
        .bind(destination_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| db_error("Update destination rating failed", e))?;

        tx.commit()
            .await
            .map_err(|e| db_error("Commit destination review failed", e))?;

        log::info!(
            "Added review to destination {} (average {:.2} over {})",
            destination_id,
            rating.average_rating,
            rating.review_count
        );
        Ok(rating)
    }

    /// Get reviews for a dataset destination, newest first
    pub async fn get_destination_reviews(
        pool: &PgPool,
        destination_id: &str,
    ) -> Result<Vec<Review>, TravelError> {
        sqlx::query_as::<_, Review>(
            r#"
            SELECT id, destination_id AS subject_id, user_id, nickname, rating, comment, created_at
            FROM destination_reviews
            WHERE destination_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(destination_id)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            db_error(
                &format!("Fetch reviews for destination {} failed", destination_id),
                e,
            )
        })
    }
}
