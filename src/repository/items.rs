//! Items repository for database operations

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::item::{CreateItem, Item},
};

const ITEM_COLUMNS: &str = "id, name, description, available, owner_id, request_id";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Insert an item for `owner_id`
    async fn create(&self, owner_id: i64, item: &CreateItem) -> AppResult<Item>;

    /// Get item by ID
    async fn get_by_id(&self, id: i64) -> AppResult<Item>;

    /// Persist name, description and availability of an existing item
    async fn update(&self, item: &Item) -> AppResult<Item>;

    /// Items owned by a user, ordered by ID
    async fn list_by_owner(&self, owner_id: i64) -> AppResult<Vec<Item>>;

    /// Available items whose name or description contains `text`, ignoring case
    async fn search_available(&self, text: &str) -> AppResult<Vec<Item>>;

    /// Items listed in answer to any of the given requests
    async fn list_by_requests(&self, request_ids: Vec<i64>) -> AppResult<Vec<Item>>;
}

#[derive(Clone)]
pub struct ItemsRepository {
    pool: Pool<Postgres>,
}

impl ItemsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

/// Escape LIKE wildcards so user text matches literally
fn like_pattern(text: &str) -> String {
    let escaped = text
        .to_lowercase()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

#[async_trait]
impl ItemStore for ItemsRepository {
    async fn create(&self, owner_id: i64, item: &CreateItem) -> AppResult<Item> {
        let query = format!(
            r#"
            INSERT INTO items (name, description, available, owner_id, request_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            ITEM_COLUMNS
        );

        let created = sqlx::query_as::<_, Item>(&query)
            .bind(item.name.trim())
            .bind(item.description.trim())
            .bind(item.available.unwrap_or(false))
            .bind(owner_id)
            .bind(item.request_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    async fn get_by_id(&self, id: i64) -> AppResult<Item> {
        let query = format!("SELECT {} FROM items WHERE id = $1", ITEM_COLUMNS);
        sqlx::query_as::<_, Item>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Item with id {} not found", id)))
    }

    async fn update(&self, item: &Item) -> AppResult<Item> {
        let query = format!(
            "UPDATE items SET name = $1, description = $2, available = $3 WHERE id = $4 RETURNING {}",
            ITEM_COLUMNS
        );
        sqlx::query_as::<_, Item>(&query)
            .bind(&item.name)
            .bind(&item.description)
            .bind(item.available)
            .bind(item.id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Item with id {} not found", item.id)))
    }

    async fn list_by_owner(&self, owner_id: i64) -> AppResult<Vec<Item>> {
        let query = format!("SELECT {} FROM items WHERE owner_id = $1 ORDER BY id", ITEM_COLUMNS);
        let items = sqlx::query_as::<_, Item>(&query)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    async fn search_available(&self, text: &str) -> AppResult<Vec<Item>> {
        let query = format!(
            r#"
            SELECT {} FROM items
            WHERE available = TRUE
              AND (LOWER(name) LIKE $1 OR LOWER(description) LIKE $1)
            ORDER BY id
            "#,
            ITEM_COLUMNS
        );
        let items = sqlx::query_as::<_, Item>(&query)
            .bind(like_pattern(text))
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }

    async fn list_by_requests(&self, request_ids: Vec<i64>) -> AppResult<Vec<Item>> {
        if request_ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!(
            "SELECT {} FROM items WHERE request_id = ANY($1) ORDER BY id",
            ITEM_COLUMNS
        );
        let items = sqlx::query_as::<_, Item>(&query)
            .bind(request_ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }
}
