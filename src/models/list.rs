// src/models/list.rs
// DOCUMENTATION: Core data structures for curated destination lists
// PURPOSE: Database rows, request DTOs and frontend-facing responses

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use super::{ReviewResponse, ANONYMOUS};

/// One entry of a list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListDestination {
    pub name: String,
    #[serde(default)]
    pub details: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    #[default]
    Private,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Visibility {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "public" => Ok(Visibility::Public),
            "private" => Ok(Visibility::Private),
            other => Err(format!("unknown visibility '{}'", other)),
        }
    }
}

/// Represents a list row joined with its owner's nickname
/// DOCUMENTATION: Maps the lists table plus `users.nickname AS owner_nickname`
#[derive(Debug, Clone, FromRow)]
pub struct TravelList {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub destinations: Json<Vec<ListDestination>>,

    /// Stored as text; see [`TravelList::visibility`]
    #[sqlx(rename = "visibility")]
    pub visibility_raw: String,

    pub average_rating: f64,
    pub last_modified: DateTime<Utc>,
    pub created_at: DateTime<Utc>,

    #[sqlx(default)]
    pub owner_nickname: Option<String>,
}

/// Request DTO for creating a list
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateListRequest {
    #[validate(length(min = 1, max = 100, message = "List name is required"))]
    pub name: String,

    #[validate(length(max = 1000))]
    pub description: Option<String>,

    #[serde(default)]
    #[validate(length(max = 200))]
    pub destinations: Vec<ListDestination>,

    #[serde(default)]
    pub visibility: Option<Visibility>,
}

/// Request DTO for PUT /api/lists/{id}
/// All fields are optional - only provided fields are updated
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateListRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,

    #[validate(length(max = 1000))]
    pub description: Option<String>,

    #[validate(length(max = 200))]
    pub destinations: Option<Vec<ListDestination>>,

    pub visibility: Option<Visibility>,
}

/// Owner summary embedded in every list response
#[derive(Debug, Clone, Serialize)]
pub struct ListOwner {
    pub id: Uuid,
    pub nickname: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub destinations: Vec<ListDestination>,
    pub visibility: Visibility,
    pub average_rating: f64,
    pub last_modified: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub user: ListOwner,
}

/// List with its reviews, used by GET /api/lists/{id} and review writes
#[derive(Debug, Serialize)]
pub struct ListDetailResponse {
    #[serde(flatten)]
    pub list: ListResponse,
    pub reviews: Vec<ReviewResponse>,
}

/// `?page=&limit=` query parameters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaginationQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedListsResponse {
    pub lists: Vec<ListResponse>,
    pub current_page: i64,
    pub total_pages: i64,
    pub total_lists: i64,
}

/// Response of GET /api/lists/home
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeListsResponse {
    pub public_lists: Vec<ListResponse>,
    pub user_lists: Vec<ListResponse>,
    pub current_page: i64,
    pub total_pages: i64,
}

impl TravelList {
    /// Parsed visibility; unknown values are treated as private
    pub fn visibility(&self) -> Visibility {
        self.visibility_raw.parse().unwrap_or_default()
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }

    /// Whether `viewer` may read this list
    pub fn is_visible_to(&self, viewer: Option<Uuid>) -> bool {
        self.visibility() == Visibility::Public || viewer == Some(self.user_id)
    }

    pub fn to_response(&self) -> ListResponse {
        let nickname = self
            .owner_nickname
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(ANONYMOUS)
            .to_string();

        ListResponse {
            id: self.id,
            name: self.name.clone(),
            description: self.description.clone(),
            destinations: self.destinations.0.clone(),
            visibility: self.visibility(),
            average_rating: self.average_rating,
            last_modified: self.last_modified,
            created_at: self.created_at,
            user: ListOwner {
                id: self.user_id,
                nickname,
            },
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_list(owner: Uuid, visibility: Visibility) -> TravelList {
    TravelList {
        id: Uuid::new_v4(),
        user_id: owner,
        name: "Alpine towns".to_string(),
        description: None,
        destinations: Json(vec![ListDestination {
            name: "Hallstatt".to_string(),
            details: Some("Lake village".to_string()),
        }]),
        visibility_raw: visibility.as_str().to_string(),
        average_rating: 0.0,
        last_modified: Utc::now(),
        created_at: Utc::now(),
        owner_nickname: None,
    }
}
