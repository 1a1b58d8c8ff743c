//! Item (listing) model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::{booking::Booking, comment::CommentResponse, non_blank, not_blank};

/// Item as stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub available: bool,
    /// Owner user id
    #[sqlx(rename = "owner_id")]
    pub owner: i64,
    /// Request this item was listed in answer to
    pub request_id: Option<i64>,
}

/// Create item request
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateItem {
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub name: String,
    #[serde(default)]
    #[validate(custom(function = "not_blank"))]
    pub description: String,
    #[validate(required(message = "must be set"))]
    pub available: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<i64>,
}

/// Partial item update; absent or blank fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available: Option<bool>,
}

impl UpdateItem {
    pub fn apply(&self, item: &Item) -> Item {
        let mut updated = item.clone();
        if let Some(name) = non_blank(self.name.as_ref()) {
            updated.name = name.to_string();
        }
        if let Some(description) = non_blank(self.description.as_ref()) {
            updated.description = description.to_string();
        }
        if let Some(available) = self.available {
            updated.available = available;
        }
        updated
    }
}

/// Search query
#[derive(Debug, Deserialize, Serialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    pub text: Option<String>,
}

/// Booking reference shown on an item to its owner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingShort {
    pub id: i64,
    pub booker_id: i64,
}

impl From<&Booking> for BookingShort {
    fn from(booking: &Booking) -> Self {
        Self {
            id: booking.id,
            booker_id: booking.booker_id,
        }
    }
}

/// Item view returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemResponse {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub available: bool,
    pub owner: i64,
    pub request_id: Option<i64>,
    /// Most recent approved booking that has started (owner only)
    pub last_booking: Option<BookingShort>,
    /// Nearest approved booking yet to start (owner only)
    pub next_booking: Option<BookingShort>,
    pub comments: Vec<CommentResponse>,
}

impl From<Item> for ItemResponse {
    fn from(item: Item) -> Self {
        Self {
            id: item.id,
            name: item.name,
            description: item.description,
            available: item.available,
            owner: item.owner,
            request_id: item.request_id,
            last_booking: None,
            next_booking: None,
            comments: Vec::new(),
        }
    }
}
