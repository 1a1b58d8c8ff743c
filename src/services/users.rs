//! User management service

use crate::{
    error::{AppError, AppResult},
    models::user::{CreateUser, UpdateUser, User},
    repository::Repository,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
}

impl UsersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Register a user. Emails are unique across all users.
    pub async fn create_user(&self, user: CreateUser) -> AppResult<User> {
        let name = user.name.trim();
        let email = user.email.trim();

        if self.repository.users.email_exists(email, None).await? {
            return Err(AppError::Conflict(format!("Email {} is already in use", email)));
        }

        let created = self.repository.users.create(name, email).await?;
        tracing::info!("Created user id={}", created.id);
        Ok(created)
    }

    /// Apply a partial update. Blank fields are ignored.
    pub async fn update_user(&self, id: i64, update: UpdateUser) -> AppResult<User> {
        let current = self.repository.users.get_by_id(id).await?;

        if let Some(email) = update.changed_email(&current) {
            if self.repository.users.email_exists(email, Some(id)).await? {
                return Err(AppError::Conflict(format!("Email {} is already in use", email)));
            }
        }

        let updated = update.apply(&current);
        if updated == current {
            return Ok(current);
        }

        tracing::debug!("Updating user id={}", id);
        self.repository.users.update(&updated).await
    }

    pub async fn get_user(&self, id: i64) -> AppResult<User> {
        self.repository.users.get_by_id(id).await
    }

    pub async fn list_users(&self) -> AppResult<Vec<User>> {
        self.repository.users.list().await
    }

    /// Delete a user. Their items, bookings, requests and comments go with them.
    pub async fn delete_user(&self, id: i64) -> AppResult<()> {
        self.repository.users.delete(id).await?;
        tracing::info!("Deleted user id={}", id);
        Ok(())
    }
}
