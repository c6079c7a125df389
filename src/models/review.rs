// src/models/review.rs

use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

pub const MIN_RATING: i16 = 1;
pub const MAX_RATING: i16 = 5;

/// Review row shared by list and destination reviews
/// `subject_id` is the list UUID (as text) or the dataset destination ID
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Review {
    pub id: Uuid,
    pub subject_id: String,
    pub user_id: Option<Uuid>,
    pub nickname: String,
    pub rating: i16,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Request body for POST .../reviews
/// `rating` accepts JSON numbers and numeric strings; range is checked by the service
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateReviewRequest {
    #[serde(deserialize_with = "number_or_numeric_string")]
    pub rating: f64,

    #[validate(length(max = 2000))]
    pub comment: Option<String>,
}

/// Validated review ready to be stored
#[derive(Debug, Clone, PartialEq)]
pub struct NewReview {
    pub rating: i16,
    pub comment: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    Text(String),
}

fn number_or_numeric_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrString::deserialize(deserializer) {
        Ok(NumberOrString::Number(n)) => Ok(n),
        Ok(NumberOrString::Text(s)) => s
            .trim()
            .parse()
            .map_err(|_| de::Error::custom("Rating must be between 1 and 5")),
        Err(_) => Err(de::Error::custom("Rating must be between 1 and 5")),
    }
}

/// Review DTO exposed via API
#[derive(Debug, Clone, Serialize)]
pub struct ReviewResponse {
    pub id: Uuid,
    pub user: Option<Uuid>,
    pub nickname: String,
    pub rating: i16,
    pub comment: Option<String>,
    pub date: DateTime<Utc>,
}

impl Review {
    /// Convert database Review into API response
    pub fn to_response(&self) -> ReviewResponse {
        ReviewResponse {
            id: self.id,
            user: self.user_id,
            nickname: self.nickname.clone(),
            rating: self.rating,
            comment: self.comment.clone(),
            date: self.created_at,
        }
    }
}
