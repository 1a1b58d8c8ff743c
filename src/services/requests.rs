//! Item request board

use std::collections::HashMap;

use crate::{
    error::{AppError, AppResult},
    models::{
        self,
        item::Item,
        page::PageRequest,
        request::{CreateItemRequest, ItemRequestDetails, ItemRequestResponse},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct RequestsService {
    repository: Repository,
}

impl RequestsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn create_request(
        &self,
        requestor_id: i64,
        request: CreateItemRequest,
    ) -> AppResult<ItemRequestResponse> {
        self.ensure_user(requestor_id).await?;

        let description = request.description.trim();
        if description.is_empty() {
            return Err(AppError::Validation("description: must not be blank".to_string()));
        }

        let created = self
            .repository
            .requests
            .create(requestor_id, description, models::now())
            .await?;
        tracing::info!("Created item request id={} by user id={}", created.request.id, requestor_id);
        Ok(ItemRequestResponse::new(created, Vec::new()))
    }

    /// The caller's own requests, newest first
    pub async fn list_own(&self, requestor_id: i64) -> AppResult<Vec<ItemRequestResponse>> {
        self.ensure_user(requestor_id).await?;
        let requests = self.repository.requests.list_by_requestor(requestor_id).await?;
        self.with_items(requests).await
    }

    /// Everybody else's requests, newest first
    pub async fn list_others(
        &self,
        requestor_id: i64,
        page: PageRequest,
    ) -> AppResult<Vec<ItemRequestResponse>> {
        self.ensure_user(requestor_id).await?;
        let requests = self.repository.requests.list_others(requestor_id, page).await?;
        self.with_items(requests).await
    }

    pub async fn get_request(&self, user_id: i64, request_id: i64) -> AppResult<ItemRequestResponse> {
        self.ensure_user(user_id).await?;
        let request = self.repository.requests.get_by_id(request_id).await?;
        let mut responses = self.with_items(vec![request]).await?;
        responses
            .pop()
            .ok_or_else(|| AppError::Internal("request vanished while loading items".to_string()))
    }

    async fn with_items(
        &self,
        requests: Vec<ItemRequestDetails>,
    ) -> AppResult<Vec<ItemRequestResponse>> {
        let ids = requests.iter().map(|r| r.request.id).collect();
        let items = self.repository.items.list_by_requests(ids).await?;

        let mut by_request: HashMap<i64, Vec<Item>> = HashMap::new();
        for item in items {
            if let Some(request_id) = item.request_id {
                by_request.entry(request_id).or_default().push(item);
            }
        }

        Ok(requests
            .into_iter()
            .map(|details| {
                let items = by_request.remove(&details.request.id).unwrap_or_default();
                ItemRequestResponse::new(details, items)
            })
            .collect())
    }

    async fn ensure_user(&self, id: i64) -> AppResult<()> {
        if !self.repository.users.exists(id).await? {
            return Err(AppError::NotFound(format!("User with id {} not found", id)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::request::ItemRequest,
        repository::mocks::MockStores,
        services::fixtures,
    };

    fn request(id: i64, requestor_id: i64) -> ItemRequestDetails {
        ItemRequestDetails {
            request: ItemRequest {
                id,
                description: "Need a ladder".to_string(),
                requestor_id,
                created: fixtures::at(1, id as u32),
            },
            requestor: fixtures::user(requestor_id),
        }
    }

    fn answer(id: i64, request_id: i64) -> Item {
        let mut item = fixtures::item(id, 5);
        item.request_id = Some(request_id);
        item
    }

    #[tokio::test]
    async fn test_create_for_unknown_user() {
        let mut stores = MockStores::default();
        stores.users.expect_exists().returning(|_| Ok(false));
        stores.requests.expect_create().never();

        let service = RequestsService::new(stores.into_repository());
        let request = CreateItemRequest { description: "Need a ladder".to_string() };
        let err = service.create_request(3, request).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_create_starts_without_items() {
        let mut stores = MockStores::default();
        stores.users.expect_exists().returning(|_| Ok(true));
        stores
            .requests
            .expect_create()
            .withf(|requestor, description, _| *requestor == 3 && description == "Need a ladder")
            .returning(|requestor, _, _| Ok(request(1, requestor)));

        let service = RequestsService::new(stores.into_repository());
        let request = CreateItemRequest { description: " Need a ladder ".to_string() };
        let created = service.create_request(3, request).await.unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(created.requestor.id, 3);
        assert!(created.items.is_empty());
    }

    #[tokio::test]
    async fn test_items_are_grouped_by_request() {
        let mut stores = MockStores::default();
        stores.users.expect_exists().returning(|_| Ok(true));
        stores
            .requests
            .expect_list_by_requestor()
            .returning(|requestor| Ok(vec![request(2, requestor), request(1, requestor)]));
        stores
            .items
            .expect_list_by_requests()
            .withf(|ids| ids == &vec![2, 1])
            .returning(|_| Ok(vec![answer(10, 1), answer(11, 2), answer(12, 1)]));

        let service = RequestsService::new(stores.into_repository());
        let requests = service.list_own(3).await.unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].id, 2);
        assert_eq!(requests[0].items.len(), 1);
        assert_eq!(requests[1].items.iter().map(|i| i.id).collect::<Vec<_>>(), vec![10, 12]);
    }

    #[tokio::test]
    async fn test_others_are_paged() {
        let mut stores = MockStores::default();
        stores.users.expect_exists().returning(|_| Ok(true));
        stores
            .requests
            .expect_list_others()
            .withf(|requestor, page| *requestor == 3 && page.limit() == 2 && page.offset() == 2)
            .returning(|_, _| Ok(vec![request(4, 8)]));
        stores.items.expect_list_by_requests().returning(|_| Ok(Vec::new()));

        let service = RequestsService::new(stores.into_repository());
        let page = PageRequest::new(3, 2).unwrap();
        let requests = service.list_others(3, page).await.unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].requestor.id, 8);
    }

    #[tokio::test]
    async fn test_get_unknown_request() {
        let mut stores = MockStores::default();
        stores.users.expect_exists().returning(|_| Ok(true));
        stores
            .requests
            .expect_get_by_id()
            .returning(|id| Err(AppError::NotFound(format!("Request with id {} not found", id))));

        let service = RequestsService::new(stores.into_repository());
        let err = service.get_request(3, 99).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
