//! Item requests repository for database operations

use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::{FromRow, Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        page::PageRequest,
        request::{ItemRequest, ItemRequestDetails},
        user::User,
    },
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemRequestStore: Send + Sync {
    async fn create(
        &self,
        requestor_id: i64,
        description: &str,
        created: NaiveDateTime,
    ) -> AppResult<ItemRequestDetails>;

    async fn get_by_id(&self, id: i64) -> AppResult<ItemRequestDetails>;

    /// Requests posted by the user, newest first
    async fn list_by_requestor(&self, requestor_id: i64) -> AppResult<Vec<ItemRequestDetails>>;

    /// Requests posted by everybody else, newest first
    async fn list_others(&self, requestor_id: i64, page: PageRequest) -> AppResult<Vec<ItemRequestDetails>>;
}

const DETAILS_SELECT: &str = r#"
    SELECT r.id, r.description, r.requestor_id, r.created,
           u.name AS requestor_name, u.email AS requestor_email
    FROM requests r
    JOIN users u ON r.requestor_id = u.id
"#;

#[derive(Debug, FromRow)]
struct ItemRequestRow {
    #[sqlx(flatten)]
    request: ItemRequest,
    requestor_name: String,
    requestor_email: String,
}

impl From<ItemRequestRow> for ItemRequestDetails {
    fn from(row: ItemRequestRow) -> Self {
        let requestor = User {
            id: row.request.requestor_id,
            name: row.requestor_name,
            email: row.requestor_email,
        };
        ItemRequestDetails {
            request: row.request,
            requestor,
        }
    }
}

#[derive(Clone)]
pub struct RequestsRepository {
    pool: Pool<Postgres>,
}

impl RequestsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ItemRequestStore for RequestsRepository {
    async fn create(
        &self,
        requestor_id: i64,
        description: &str,
        created: NaiveDateTime,
    ) -> AppResult<ItemRequestDetails> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO requests (description, requestor_id, created) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(description)
        .bind(requestor_id)
        .bind(created)
        .fetch_one(&self.pool)
        .await?;

        self.get_by_id(id).await
    }

    async fn get_by_id(&self, id: i64) -> AppResult<ItemRequestDetails> {
        let query = format!("{} WHERE r.id = $1", DETAILS_SELECT);
        sqlx::query_as::<_, ItemRequestRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(ItemRequestDetails::from)
            .ok_or_else(|| AppError::NotFound(format!("Request with id {} not found", id)))
    }

    async fn list_by_requestor(&self, requestor_id: i64) -> AppResult<Vec<ItemRequestDetails>> {
        let query = format!(
            "{} WHERE r.requestor_id = $1 ORDER BY r.created DESC, r.id DESC",
            DETAILS_SELECT
        );
        let rows = sqlx::query_as::<_, ItemRequestRow>(&query)
            .bind(requestor_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(ItemRequestDetails::from).collect())
    }

    async fn list_others(&self, requestor_id: i64, page: PageRequest) -> AppResult<Vec<ItemRequestDetails>> {
        let query = format!(
            "{} WHERE r.requestor_id != $1 ORDER BY r.created DESC, r.id DESC LIMIT $2 OFFSET $3",
            DETAILS_SELECT
        );
        let rows = sqlx::query_as::<_, ItemRequestRow>(&query)
            .bind(requestor_id)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(ItemRequestDetails::from).collect())
    }
}
