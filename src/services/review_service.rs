// src/services/review_service.rs
// DOCUMENTATION: Reviews for lists and dataset destinations
// PURPOSE: Rating bounds, author resolution and aggregate refresh

use crate::db::{ReviewAuthor, ReviewRepository, UserRepository};
use crate::errors::TravelError;
use crate::models::{
    CreateReviewRequest, DestinationReviewsResponse, ListDetailResponse, NewReview,
    ReviewResponse, ANONYMOUS, MAX_RATING, MIN_RATING,
};
use crate::services::dataset::Dataset;
use crate::services::destination_service::DestinationService;
use crate::services::list_service::ListService;
use crate::services::sanitize::clean_optional_text;
use sqlx::PgPool;
use uuid::Uuid;

/// Ratings are whole stars from 1 to 5
pub fn validate_rating(rating: f64) -> Result<i16, TravelError> {
    if !(f64::from(MIN_RATING)..=f64::from(MAX_RATING)).contains(&rating) {
        return Err(TravelError::InvalidInput(
            "Rating must be between 1 and 5".to_string(),
        ));
    }
    if rating.fract() != 0.0 {
        return Err(TravelError::InvalidInput(
            "Rating must be a whole number".to_string(),
        ));
    }
    Ok(rating as i16)
}

/// Token nickname first, then the stored one, then Anonymous
fn pick_nickname(token_nickname: Option<&str>, stored: Option<&str>) -> String {
    [token_nickname, stored]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|n| !n.is_empty())
        .unwrap_or(ANONYMOUS)
        .to_string()
}

fn clean_review(req: CreateReviewRequest) -> Result<NewReview, TravelError> {
    Ok(NewReview {
        rating: validate_rating(req.rating)?,
        comment: clean_optional_text(req.comment.as_deref(), 2000),
    })
}

pub struct ReviewService;

impl ReviewService {
    /// Review a list visible to `user_id`; returns the list with all its reviews
    pub async fn add_list_review(
        pool: &PgPool,
        list_id: Uuid,
        user_id: Uuid,
        req: CreateReviewRequest,
    ) -> Result<ListDetailResponse, TravelError> {
        let review = clean_review(req)?;
        ListService::visible_list(pool, list_id, Some(user_id)).await?;

        let user = UserRepository::find_by_id(pool, user_id)
            .await?
            .ok_or_else(|| TravelError::NotFound("User not found".to_string()))?;

        let author = ReviewAuthor {
            user_id,
            nickname: user.display_name(),
        };
        ReviewRepository::add_list_review(pool, list_id, &author, &review).await?;

        ListService::get_list(pool, list_id, Some(user_id)).await
    }

    /// Review a dataset destination; returns the refreshed aggregate
    pub async fn add_destination_review(
        pool: &PgPool,
        dataset: &Dataset,
        destination_id: &str,
        user_id: Uuid,
        token_nickname: Option<&str>,
        req: CreateReviewRequest,
    ) -> Result<DestinationReviewsResponse, TravelError> {
        if !DestinationService::is_valid_id(destination_id) {
            return Err(TravelError::InvalidInput(
                "Invalid destination ID format".to_string(),
            ));
        }
        let review = clean_review(req)?;

        let destination = DestinationService::get_by_id(dataset, destination_id)?.clone();

        let stored = UserRepository::find_by_id(pool, user_id).await?;
        let author = ReviewAuthor {
            user_id,
            nickname: pick_nickname(
                token_nickname,
                stored.as_ref().and_then(|u| u.nickname.as_deref()),
            ),
        };

        let rating = ReviewRepository::add_destination_review(
            pool,
            destination.id(),
            &author,
            &review,
        )
        .await?;
        let reviews = Self::destination_reviews(pool, dataset, destination_id).await?;

        Ok(DestinationReviewsResponse {
            destination,
            average_rating: rating.average_rating,
            review_count: rating.review_count,
            reviews,
        })
    }

    pub async fn destination_reviews(
        pool: &PgPool,
        dataset: &Dataset,
        destination_id: &str,
    ) -> Result<Vec<ReviewResponse>, TravelError> {
        let destination = DestinationService::get_by_id(dataset, destination_id)?;
        let reviews = ReviewRepository::get_destination_reviews(pool, destination.id()).await?;
        Ok(reviews.iter().map(|r| r.to_response()).collect())
    }
}
