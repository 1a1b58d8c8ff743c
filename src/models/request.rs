//! Item requests: asks for things nobody lists yet

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::{item::Item, not_blank, user::User};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ItemRequest {
    pub id: i64,
    pub description: String,
    pub requestor_id: i64,
    pub created: NaiveDateTime,
}

/// Request joined with the user who posted it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRequestDetails {
    pub request: ItemRequest,
    pub requestor: User,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateItemRequest {
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub description: String,
}

/// Item listed in answer to a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequestedItem {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub available: bool,
    pub owner: i64,
    pub request_id: Option<i64>,
}

impl From<Item> for RequestedItem {
    fn from(item: Item) -> Self {
        Self {
            id: item.id,
            name: item.name,
            description: item.description,
            available: item.available,
            owner: item.owner,
            request_id: item.request_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemRequestResponse {
    pub id: i64,
    pub description: String,
    pub requestor: User,
    pub created: NaiveDateTime,
    pub items: Vec<RequestedItem>,
}

impl ItemRequestResponse {
    pub fn new(details: ItemRequestDetails, items: Vec<Item>) -> Self {
        Self {
            id: details.request.id,
            description: details.request.description,
            requestor: details.requestor,
            created: details.request.created,
            items: items.into_iter().map(RequestedItem::from).collect(),
        }
    }
}
