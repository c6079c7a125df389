// src/db/list_repository.rs
// DOCUMENTATION: Database access layer for curated lists
// PURPOSE: Abstract list queries from business logic

use crate::errors::TravelError;
use crate::models::{CreateListRequest, TravelList, UpdateListRequest, Visibility};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

/// SELECT prefix joining the owner's nickname
const LIST_SELECT: &str = r#"
    SELECT
        l.id, l.user_id, l.name, l.description, l.destinations,
        l.visibility, l.average_rating, l.last_modified, l.created_at,
        u.nickname AS owner_nickname
    FROM lists l
    LEFT JOIN users u ON u.id = l.user_id
"#;

pub struct ListRepository;

impl ListRepository {
    /// Create new list owned by `owner`
    /// DOCUMENTATION: Used by POST /api/lists
    pub async fn create_list(
        pool: &PgPool,
        owner: Uuid,
        req: &CreateListRequest,
    ) -> Result<TravelList, TravelError> {
        let visibility = req.visibility.unwrap_or_default();

        let inserted: (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO lists (user_id, name, description, destinations, visibility, last_modified, created_at)
            VALUES ($1, $2, $3, $4, $5, NOW(), NOW())
            RETURNING id
            "#,
        )
        .bind(owner)
        .bind(&req.name)
        .bind(&req.description)
        .bind(Json(&req.destinations))
        .bind(visibility.as_str())
        .fetch_one(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to create list: {}", e);
            TravelError::DatabaseError(e.to_string())
        })?;

        let list = Self::get_by_id(pool, inserted.0).await?;
        log::info!("Created list {} for user {}", list.id, owner);
        Ok(list)
    }

    /// Retrieve list by ID
    pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<TravelList, TravelError> {
        Self::find_by_id(pool, id).await?.ok_or_else(|| {
            log::warn!("List not found: {}", id);
            TravelError::NotFound("List not found".to_string())
        })
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<TravelList>, TravelError> {
        let sql = format!("{} WHERE l.id = $1", LIST_SELECT);

        sqlx::query_as::<_, TravelList>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|e| {
                log::error!("Database error fetching list {}: {}", id, e);
                TravelError::DatabaseError(e.to_string())
            })
    }

    /// Page of public lists, most recently modified first
    pub async fn list_public(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TravelList>, TravelError> {
        let sql = format!(
            "{} WHERE l.visibility = $1 ORDER BY l.last_modified DESC LIMIT $2 OFFSET $3",
            LIST_SELECT
        );

        sqlx::query_as::<_, TravelList>(&sql)
            .bind(Visibility::Public.as_str())
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
            .map_err(|e| {
                log::error!("Failed to fetch public lists: {}", e);
                TravelError::DatabaseError(e.to_string())
            })
    }

    pub async fn count_public(pool: &PgPool) -> Result<i64, TravelError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM lists WHERE visibility = $1")
            .bind(Visibility::Public.as_str())
            .fetch_one(pool)
            .await
            .map_err(|e| {
                log::error!("Count query error: {}", e);
                TravelError::DatabaseError(e.to_string())
            })?;

        Ok(count.0)
    }

    /// Lists owned by `owner`, most recently modified first
    /// DOCUMENTATION: `page` of None returns every list
    pub async fn list_by_owner(
        pool: &PgPool,
        owner: Uuid,
        page: Option<(i64, i64)>,
    ) -> Result<Vec<TravelList>, TravelError> {
        let query = match page {
            Some((limit, offset)) => {
                let sql = format!(
                    "{} WHERE l.user_id = $1 ORDER BY l.last_modified DESC LIMIT $2 OFFSET $3",
                    LIST_SELECT
                );
                sqlx::query_as::<_, TravelList>(&sql)
                    .bind(owner)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(pool)
                    .await
            }
            None => {
                let sql = format!(
                    "{} WHERE l.user_id = $1 ORDER BY l.last_modified DESC",
                    LIST_SELECT
                );
                sqlx::query_as::<_, TravelList>(&sql)
                    .bind(owner)
                    .fetch_all(pool)
                    .await
            }
        };

        query.map_err(|e| {
            log::error!("Failed to fetch lists for user {}: {}", owner, e);
            TravelError::DatabaseError(e.to_string())
        })
    }

    pub async fn count_by_owner(pool: &PgPool, owner: Uuid) -> Result<i64, TravelError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM lists WHERE user_id = $1")
            .bind(owner)
            .fetch_one(pool)
            .await
            .map_err(|e| {
                log::error!("Count query error: {}", e);
                TravelError::DatabaseError(e.to_string())
            })?;

        Ok(count.0)
    }

    /// Update existing list
    /// DOCUMENTATION: Partial update - only provided fields are modified
    pub async fn update_list(
        pool: &PgPool,
        id: Uuid,
        req: &UpdateListRequest,
    ) -> Result<TravelList, TravelError> {
        let rows = sqlx::query(
            r#"
            UPDATE lists
            SET name = COALESCE($1, name),
                description = COALESCE($2, description),
                destinations = COALESCE($3, destinations),
                visibility = COALESCE($4, visibility),
                last_modified = NOW()
            WHERE id = $5
            "#,
        )
        .bind(&req.name)
        .bind(&req.description)
        .bind(req.destinations.as_ref().map(Json))
        .bind(req.visibility.map(|v| v.as_str()))
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| {
            log::error!("Update failed for list {}: {}", id, e);
            TravelError::DatabaseError(e.to_string())
        })?
        .rows_affected();

        if rows == 0 {
            return Err(TravelError::NotFound("List not found".to_string()));
        }

        log::info!("Updated list: {}", id);
        Self::get_by_id(pool, id).await
    }

    pub async fn delete_list(pool: &PgPool, id: Uuid) -> Result<(), TravelError> {
        let rows = sqlx::query("DELETE FROM lists WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await
            .map_err(|e| {
                log::error!("Delete failed for list {}: {}", id, e);
                TravelError::DatabaseError(e.to_string())
            })?
            .rows_affected();

        if rows == 0 {
            return Err(TravelError::NotFound("List not found".to_string()));
        }

        log::info!("Deleted list: {}", id);
        Ok(())
    }
}
