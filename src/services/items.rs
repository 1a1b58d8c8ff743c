//! Item listing, search and comments

use chrono::NaiveDateTime;

use crate::{
    error::{AppError, AppResult},
    models::{
        self,
        comment::{CommentResponse, CreateComment},
        item::{BookingShort, CreateItem, Item, ItemResponse, UpdateItem},
        non_blank,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct ItemsService {
    repository: Repository,
}

impl ItemsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List a new item for `owner_id`, optionally in answer to a request
    pub async fn create_item(&self, owner_id: i64, item: CreateItem) -> AppResult<ItemResponse> {
        self.ensure_user(owner_id).await?;
        if let Some(request_id) = item.request_id {
            self.repository.requests.get_by_id(request_id).await?;
        }

        let created = self.repository.items.create(owner_id, &item).await?;
        tracing::info!("Created item id={} for owner id={}", created.id, owner_id);
        Ok(created.into())
    }

    /// Partial update, allowed for the owner only
    pub async fn update_item(
        &self,
        user_id: i64,
        item_id: i64,
        update: UpdateItem,
    ) -> AppResult<ItemResponse> {
        let current = self.repository.items.get_by_id(item_id).await?;
        if current.owner != user_id {
            return Err(AppError::NotFound(format!(
                "Item with id {} not found for owner {}",
                item_id, user_id
            )));
        }

        let updated = update.apply(&current);
        let item = if updated == current {
            current
        } else {
            self.repository.items.update(&updated).await?
        };
        Ok(item.into())
    }

    /// Item with its comments, plus last and next booking if `viewer_id` owns it
    pub async fn get_item(&self, viewer_id: i64, item_id: i64) -> AppResult<ItemResponse> {
        let item = self.repository.items.get_by_id(item_id).await?;
        self.describe(item, viewer_id, models::now()).await
    }

    pub async fn list_owner_items(&self, owner_id: i64) -> AppResult<Vec<ItemResponse>> {
        let items = self.repository.items.list_by_owner(owner_id).await?;
        let now = models::now();

        let mut responses = Vec::with_capacity(items.len());
        for item in items {
            responses.push(self.describe(item, owner_id, now).await?);
        }
        Ok(responses)
    }

    /// Available items matching `text`. Blank text finds nothing.
    pub async fn search(&self, text: Option<&String>) -> AppResult<Vec<ItemResponse>> {
        let Some(text) = non_blank(text) else {
            return Ok(Vec::new());
        };

        tracing::debug!("Searching items for '{}'", text);
        let items = self.repository.items.search_available(text).await?;
        Ok(items.into_iter().map(ItemResponse::from).collect())
    }

    /// Comment on an item the author has finished renting
    pub async fn add_comment(
        &self,
        author_id: i64,
        item_id: i64,
        comment: CreateComment,
    ) -> AppResult<CommentResponse> {
        self.ensure_user(author_id).await?;
        self.repository.items.get_by_id(item_id).await?;

        let text = comment.text.trim();
        if text.is_empty() {
            return Err(AppError::Validation("text: must not be blank".to_string()));
        }

        let now = models::now();
        let rented = self
            .repository
            .bookings
            .has_finished_approved(author_id, item_id, now)
            .await?;
        if !rented {
            return Err(AppError::Validation(format!(
                "User {} has no finished booking of item {}",
                author_id, item_id
            )));
        }

        let created = self
            .repository
            .comments
            .create(item_id, author_id, text, now)
            .await?;
        tracing::info!("User id={} commented on item id={}", author_id, item_id);
        Ok(created.into())
    }

    async fn ensure_user(&self, id: i64) -> AppResult<()> {
        if !self.repository.users.exists(id).await? {
            return Err(AppError::NotFound(format!("User with id {} not found", id)));
        }
        Ok(())
    }

    async fn describe(
        &self,
        item: Item,
        viewer_id: i64,
        now: NaiveDateTime,
    ) -> AppResult<ItemResponse> {
        let (last, next) = if item.owner == viewer_id {
            let bookings = &self.repository.bookings;
            (
                bookings.last_approved(item.id, now).await?,
                bookings.next_approved(item.id, now).await?,
            )
        } else {
            (None, None)
        };

        let comments = self.repository.comments.list_by_item(item.id).await?;

        let mut response = ItemResponse::from(item);
        response.last_booking = last.as_ref().map(BookingShort::from);
        response.next_booking = next.as_ref().map(BookingShort::from);
        response.comments = comments.into_iter().map(CommentResponse::from).collect();
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{
            booking::{Booking, BookingStatus},
            comment::{Comment, CommentDetails},
        },
        repository::mocks::MockStores,
        services::fixtures,
    };

    fn approved(id: i64, booker_id: i64) -> Booking {
        Booking {
            id,
            start: fixtures::at(1, 10),
            end: fixtures::at(2, 10),
            status: BookingStatus::Approved,
            item_id: 7,
            booker_id,
        }
    }

    fn comment_by(author_id: i64) -> CommentDetails {
        CommentDetails {
            comment: Comment {
                id: 1,
                text: "Works great".to_string(),
                item_id: 7,
                author_id,
                created: fixtures::at(3, 9),
            },
            author_name: "Carol".to_string(),
        }
    }

    fn new_item(request_id: Option<i64>) -> CreateItem {
        CreateItem {
            name: "Drill".to_string(),
            description: "Cordless drill".to_string(),
            available: Some(true),
            request_id,
        }
    }

    #[tokio::test]
    async fn test_create_item_for_unknown_owner() {
        let mut stores = MockStores::default();
        stores.users.expect_exists().returning(|_| Ok(false));
        stores.items.expect_create().never();

        let service = ItemsService::new(stores.into_repository());
        let err = service.create_item(5, new_item(None)).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_create_item_checks_request() {
        let mut stores = MockStores::default();
        stores.users.expect_exists().returning(|_| Ok(true));
        stores
            .requests
            .expect_get_by_id()
            .withf(|id| *id == 4)
            .returning(|id| Err(AppError::NotFound(format!("Request with id {} not found", id))));
        stores.items.expect_create().never();

        let service = ItemsService::new(stores.into_repository());
        let err = service.create_item(1, new_item(Some(4))).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_create_item_stores_for_owner() {
        let mut stores = MockStores::default();
        stores.users.expect_exists().returning(|_| Ok(true));
        stores
            .items
            .expect_create()
            .withf(|owner, item| *owner == 1 && item.name == "Drill")
            .returning(|owner, _| Ok(fixtures::item(7, owner)));

        let service = ItemsService::new(stores.into_repository());
        let created = service.create_item(1, new_item(None)).await.unwrap();
        assert_eq!(created.id, 7);
        assert_eq!(created.owner, 1);
        assert!(created.comments.is_empty());
    }

    #[tokio::test]
    async fn test_update_by_stranger_is_not_found() {
        let mut stores = MockStores::default();
        stores.items.expect_get_by_id().returning(|id| Ok(fixtures::item(id, 1)));
        stores.items.expect_update().never();

        let service = ItemsService::new(stores.into_repository());
        let update = UpdateItem {
            available: Some(false),
            ..Default::default()
        };
        let err = service.update_item(2, 7, update).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_by_owner_persists_changes() {
        let mut stores = MockStores::default();
        stores.items.expect_get_by_id().returning(|id| Ok(fixtures::item(id, 1)));
        stores
            .items
            .expect_update()
            .withf(|item| !item.available && item.name == "Drill")
            .returning(|item| Ok(item.clone()));

        let service = ItemsService::new(stores.into_repository());
        let update = UpdateItem {
            available: Some(false),
            ..Default::default()
        };
        let updated = service.update_item(1, 7, update).await.unwrap();
        assert!(!updated.available);
    }

    #[tokio::test]
    async fn test_owner_sees_last_and_next_booking() {
        let mut stores = MockStores::default();
        stores.items.expect_get_by_id().returning(|id| Ok(fixtures::item(id, 1)));
        stores.bookings.expect_last_approved().returning(|_, _| Ok(Some(approved(10, 2))));
        stores.bookings.expect_next_approved().returning(|_, _| Ok(Some(approved(11, 3))));
        stores.comments.expect_list_by_item().returning(|_| Ok(vec![comment_by(2)]));

        let service = ItemsService::new(stores.into_repository());
        let item = service.get_item(1, 7).await.unwrap();
        assert_eq!(item.last_booking, Some(BookingShort { id: 10, booker_id: 2 }));
        assert_eq!(item.next_booking, Some(BookingShort { id: 11, booker_id: 3 }));
        assert_eq!(item.comments.len(), 1);
        assert_eq!(item.comments[0].author_name, "Carol");
    }

    #[tokio::test]
    async fn test_other_users_do_not_see_bookings() {
        let mut stores = MockStores::default();
        stores.items.expect_get_by_id().returning(|id| Ok(fixtures::item(id, 1)));
        stores.bookings.expect_last_approved().never();
        stores.bookings.expect_next_approved().never();
        stores.comments.expect_list_by_item().returning(|_| Ok(vec![comment_by(2)]));

        let service = ItemsService::new(stores.into_repository());
        let item = service.get_item(2, 7).await.unwrap();
        assert!(item.last_booking.is_none());
        assert!(item.next_booking.is_none());
        assert_eq!(item.comments.len(), 1);
    }

    #[tokio::test]
    async fn test_blank_search_skips_store() {
        let mut stores = MockStores::default();
        stores.items.expect_search_available().never();

        let service = ItemsService::new(stores.into_repository());
        assert!(service.search(Some(&"  ".to_string())).await.unwrap().is_empty());
        assert!(service.search(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_passes_trimmed_text() {
        let mut stores = MockStores::default();
        stores
            .items
            .expect_search_available()
            .withf(|text| text == "drill")
            .returning(|_| Ok(vec![fixtures::item(7, 1)]));

        let service = ItemsService::new(stores.into_repository());
        let found = service.search(Some(&" drill ".to_string())).await.unwrap();
        assert_eq!(found.len(), 1);
    }

    #[tokio::test]
    async fn test_comment_requires_finished_rental() {
        let mut stores = MockStores::default();
        stores.users.expect_exists().returning(|_| Ok(true));
        stores.items.expect_get_by_id().returning(|id| Ok(fixtures::item(id, 1)));
        stores.bookings.expect_has_finished_approved().returning(|_, _, _| Ok(false));
        stores.comments.expect_create().never();

        let service = ItemsService::new(stores.into_repository());
        let comment = CreateComment { text: "Nice".to_string() };
        let err = service.add_comment(2, 7, comment).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_comment_after_rental() {
        let mut stores = MockStores::default();
        stores.users.expect_exists().returning(|_| Ok(true));
        stores.items.expect_get_by_id().returning(|id| Ok(fixtures::item(id, 1)));
        stores
            .bookings
            .expect_has_finished_approved()
            .withf(|booker, item, _| *booker == 2 && *item == 7)
            .returning(|_, _, _| Ok(true));
        stores
            .comments
            .expect_create()
            .withf(|item, author, text, _| *item == 7 && *author == 2 && text == "Works great")
            .returning(|_, author, _, _| Ok(comment_by(author)));

        let service = ItemsService::new(stores.into_repository());
        let comment = CreateComment { text: " Works great ".to_string() };
        let created = service.add_comment(2, 7, comment).await.unwrap();
        assert_eq!(created.text, "Works great");
        assert_eq!(created.author_name, "Carol");
    }
}
