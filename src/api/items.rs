//! Item catalog endpoints

use axum::{extract::State, Json};

use crate::{
    error::{AppResult, ErrorResponse},
    models::{
        comment::{CommentResponse, CreateComment},
        item::{CreateItem, ItemResponse, SearchQuery, UpdateItem},
    },
};

use super::{Path, Query, SharerUserId, ValidatedJson};

/// List the caller's own items
#[utoipa::path(
    get,
    path = "/items",
    tag = "items",
    params(
        ("X-Sharer-User-Id" = i64, Header, description = "Acting user")
    ),
    responses(
        (status = 200, description = "Items owned by the caller", body = Vec<ItemResponse>)
    )
)]
pub async fn list_items(
    State(state): State<crate::AppState>,
    SharerUserId(user_id): SharerUserId,
) -> AppResult<Json<Vec<ItemResponse>>> {
    let items = state.services.items.list_owner_items(user_id).await?;
    Ok(Json(items))
}

/// Get item by ID
#[utoipa::path(
    get,
    path = "/items/{id}",
    tag = "items",
    params(
        ("id" = i64, Path, description = "Item ID"),
        ("X-Sharer-User-Id" = i64, Header, description = "Acting user")
    ),
    responses(
        (status = 200, description = "Item with comments, and bookings for its owner", body = ItemResponse),
        (status = 404, description = "Item not found", body = ErrorResponse)
    )
)]
pub async fn get_item(
    State(state): State<crate::AppState>,
    SharerUserId(user_id): SharerUserId,
    Path(id): Path<i64>,
) -> AppResult<Json<ItemResponse>> {
    let item = state.services.items.get_item(user_id, id).await?;
    Ok(Json(item))
}

/// List a new item
#[utoipa::path(
    post,
    path = "/items",
    tag = "items",
    params(
        ("X-Sharer-User-Id" = i64, Header, description = "Owner")
    ),
    request_body = CreateItem,
    responses(
        (status = 200, description = "Item created", body = ItemResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 404, description = "Owner or request not found", body = ErrorResponse)
    )
)]
pub async fn create_item(
    State(state): State<crate::AppState>,
    SharerUserId(user_id): SharerUserId,
    ValidatedJson(item): ValidatedJson<CreateItem>,
) -> AppResult<Json<ItemResponse>> {
    let created = state.services.items.create_item(user_id, item).await?;
    Ok(Json(created))
}

/// Update an item (owner only)
#[utoipa::path(
    patch,
    path = "/items/{id}",
    tag = "items",
    params(
        ("id" = i64, Path, description = "Item ID"),
        ("X-Sharer-User-Id" = i64, Header, description = "Owner")
    ),
    request_body = UpdateItem,
    responses(
        (status = 200, description = "Item updated", body = ItemResponse),
        (status = 404, description = "Item not found for this owner", body = ErrorResponse)
    )
)]
pub async fn update_item(
    State(state): State<crate::AppState>,
    SharerUserId(user_id): SharerUserId,
    Path(id): Path<i64>,
    ValidatedJson(item): ValidatedJson<UpdateItem>,
) -> AppResult<Json<ItemResponse>> {
    let updated = state.services.items.update_item(user_id, id, item).await?;
    Ok(Json(updated))
}

/// Search available items by name or description
#[utoipa::path(
    get,
    path = "/items/search",
    tag = "items",
    params(
        SearchQuery,
        ("X-Sharer-User-Id" = i64, Header, description = "Acting user")
    ),
    responses(
        (status = 200, description = "Matching available items", body = Vec<ItemResponse>)
    )
)]
pub async fn search_items(
    State(state): State<crate::AppState>,
    SharerUserId(_user_id): SharerUserId,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<ItemResponse>>> {
    let items = state.services.items.search(query.text.as_ref()).await?;
    Ok(Json(items))
}

/// Comment on an item after renting it
#[utoipa::path(
    post,
    path = "/items/{id}/comment",
    tag = "items",
    params(
        ("id" = i64, Path, description = "Item ID"),
        ("X-Sharer-User-Id" = i64, Header, description = "Author")
    ),
    request_body = CreateComment,
    responses(
        (status = 200, description = "Comment added", body = CommentResponse),
        (status = 400, description = "Author has not finished renting the item", body = ErrorResponse),
        (status = 404, description = "Author or item not found", body = ErrorResponse)
    )
)]
pub async fn create_comment(
    State(state): State<crate::AppState>,
    SharerUserId(user_id): SharerUserId,
    Path(id): Path<i64>,
    ValidatedJson(comment): ValidatedJson<CreateComment>,
) -> AppResult<Json<CommentResponse>> {
    let created = state.services.items.add_comment(user_id, id, comment).await?;
    Ok(Json(created))
}
