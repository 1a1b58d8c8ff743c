//! Repository layer for database operations
//!
//! Each aggregate has a store trait and a PostgreSQL implementation. Services
//! only see the traits, so unit tests swap in `mockall` mocks.

pub mod bookings;
pub mod comments;
pub mod items;
pub mod requests;
pub mod users;

use std::sync::Arc;

use sqlx::{Pool, Postgres};

pub use bookings::{BookingStore, BookingsRepository};
pub use comments::{CommentStore, CommentsRepository};
pub use items::{ItemStore, ItemsRepository};
pub use requests::{ItemRequestStore, RequestsRepository};
pub use users::{UserStore, UsersRepository};

use crate::error::AppResult;

/// Main repository struct holding one store per aggregate
#[derive(Clone)]
pub struct Repository {
    pool: Option<Pool<Postgres>>,
    pub users: Arc<dyn UserStore>,
    pub items: Arc<dyn ItemStore>,
    pub bookings: Arc<dyn BookingStore>,
    pub comments: Arc<dyn CommentStore>,
    pub requests: Arc<dyn ItemRequestStore>,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            users: Arc::new(UsersRepository::new(pool.clone())),
            items: Arc::new(ItemsRepository::new(pool.clone())),
            bookings: Arc::new(BookingsRepository::new(pool.clone())),
            comments: Arc::new(CommentsRepository::new(pool.clone())),
            requests: Arc::new(RequestsRepository::new(pool.clone())),
            pool: Some(pool),
        }
    }

    #[cfg(test)]
    pub(crate) fn from_stores(
        users: Arc<dyn UserStore>,
        items: Arc<dyn ItemStore>,
        bookings: Arc<dyn BookingStore>,
        comments: Arc<dyn CommentStore>,
        requests: Arc<dyn ItemRequestStore>,
    ) -> Self {
        Self {
            pool: None,
            users,
            items,
            bookings,
            comments,
            requests,
        }
    }

    /// Round-trip to the database, if there is one
    pub async fn ping(&self) -> AppResult<()> {
        if let Some(pool) = &self.pool {
            sqlx::query("SELECT 1").execute(pool).await?;
        }
        Ok(())
    }
}
