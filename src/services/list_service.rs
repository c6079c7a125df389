// src/services/list_service.rs
// DOCUMENTATION: Business logic for curated lists
// PURPOSE: Ownership checks, sanitization and pagination between handlers and repository

use crate::db::{ListRepository, ReviewRepository};
use crate::errors::TravelError;
use crate::models::{
    CreateListRequest, HomeListsResponse, ListDetailResponse, ListResponse,
    PaginatedListsResponse, PaginationQuery, TravelList, UpdateListRequest,
};
use crate::services::sanitize::{clean_optional_text, clean_text, sanitize_destinations};
use sqlx::PgPool;
use uuid::Uuid;

pub const MAX_PAGE_SIZE: i64 = 100;

/// Resolved `page`/`limit` pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
}

impl Pagination {
    /// page >= 1, limit within 1..=MAX_PAGE_SIZE
    pub fn from_query(query: &PaginationQuery, default_limit: i64) -> Self {
        Self {
            page: query.page.unwrap_or(1).max(1),
            limit: query.limit.unwrap_or(default_limit).clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Saturates instead of overflowing for absurd page numbers
    pub fn offset(&self) -> i64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }

    pub fn total_pages(&self, total: i64) -> i64 {
        (total + self.limit - 1) / self.limit
    }
}

/// Forbidden unless `user_id` owns `list`
pub fn ensure_owner(list: &TravelList, user_id: Uuid) -> Result<(), TravelError> {
    if list.is_owned_by(user_id) {
        Ok(())
    } else {
        log::warn!("User {} attempted to modify list {}", user_id, list.id);
        Err(TravelError::Forbidden)
    }
}

fn to_responses(lists: Vec<TravelList>) -> Vec<ListResponse> {
    lists.iter().map(TravelList::to_response).collect()
}

pub struct ListService;

impl ListService {
    pub async fn create_list(
        pool: &PgPool,
        owner: Uuid,
        req: CreateListRequest,
    ) -> Result<ListResponse, TravelError> {
        let clean = CreateListRequest {
            name: clean_text(&req.name, 100),
            description: clean_optional_text(req.description.as_deref(), 1000),
            destinations: sanitize_destinations(&req.destinations),
            visibility: req.visibility,
        };

        if clean.name.is_empty() {
            return Err(TravelError::ValidationError(
                "List name is required".to_string(),
            ));
        }

        let list = ListRepository::create_list(pool, owner, &clean).await?;
        Ok(list.to_response())
    }

    /// Page of public lists
    pub async fn public_lists(
        pool: &PgPool,
        pagination: Pagination,
    ) -> Result<PaginatedListsResponse, TravelError> {
        let lists =
            ListRepository::list_public(pool, pagination.limit, pagination.offset()).await?;
        let total = ListRepository::count_public(pool).await?;

        Ok(PaginatedListsResponse {
            lists: to_responses(lists),
            current_page: pagination.page,
            total_pages: pagination.total_pages(total),
            total_lists: total,
        })
    }

    /// Public lists and the caller's lists side by side
    pub async fn home_lists(
        pool: &PgPool,
        user_id: Uuid,
        pagination: Pagination,
    ) -> Result<HomeListsResponse, TravelError> {
        let limit_offset = (pagination.limit, pagination.offset());
        let public_lists = ListRepository::list_public(pool, limit_offset.0, limit_offset.1).await?;
        let user_lists = ListRepository::list_by_owner(pool, user_id, Some(limit_offset)).await?;

        let total_public = ListRepository::count_public(pool).await?;
        let total_user = ListRepository::count_by_owner(pool, user_id).await?;

        Ok(HomeListsResponse {
            public_lists: to_responses(public_lists),
            user_lists: to_responses(user_lists),
            current_page: pagination.page,
            total_pages: pagination.total_pages(total_public + total_user),
        })
    }

    pub async fn my_lists(pool: &PgPool, user_id: Uuid) -> Result<Vec<ListResponse>, TravelError> {
        let lists = ListRepository::list_by_owner(pool, user_id, None).await?;
        Ok(to_responses(lists))
    }

    /// List with reviews; private lists are hidden from everyone but the owner
    pub async fn get_list(
        pool: &PgPool,
        id: Uuid,
        viewer: Option<Uuid>,
    ) -> Result<ListDetailResponse, TravelError> {
        let list = Self::visible_list(pool, id, viewer).await?;
        let reviews = ReviewRepository::get_list_reviews(pool, list.id).await?;

        Ok(ListDetailResponse {
            list: list.to_response(),
            reviews: reviews.iter().map(|r| r.to_response()).collect(),
        })
    }

    pub async fn update_list(
        pool: &PgPool,
        id: Uuid,
        user_id: Uuid,
        req: UpdateListRequest,
    ) -> Result<ListResponse, TravelError> {
        let list = ListRepository::get_by_id(pool, id).await?;
        ensure_owner(&list, user_id)?;

        // blank values leave the stored field untouched
        let clean = UpdateListRequest {
            name: req
                .name
                .as_deref()
                .map(|n| clean_text(n, 100))
                .filter(|n| !n.is_empty()),
            description: clean_optional_text(req.description.as_deref(), 1000),
            destinations: req.destinations.as_deref().map(sanitize_destinations),
            visibility: req.visibility,
        };

        let updated = ListRepository::update_list(pool, id, &clean).await?;
        Ok(updated.to_response())
    }

    pub async fn delete_list(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<(), TravelError> {
        let list = ListRepository::get_by_id(pool, id).await?;
        ensure_owner(&list, user_id)?;
        ListRepository::delete_list(pool, id).await
    }

    /// Fetch a list, reporting private lists of other users as missing
    pub async fn visible_list(
        pool: &PgPool,
        id: Uuid,
        viewer: Option<Uuid>,
    ) -> Result<TravelList, TravelError> {
        let list = ListRepository::get_by_id(pool, id).await?;
        if !list.is_visible_to(viewer) {
            log::warn!("Private list {} requested by non-owner", id);
            return Err(TravelError::NotFound("List not found".to_string()));
        }
        Ok(list)
    }
}
