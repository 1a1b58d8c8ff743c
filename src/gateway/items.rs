//! Gateway item routes

use axum::{
    extract::State,
    http::Method,
    response::Response,
};

use super::{client::Forward, GatewayState};
use crate::{
    api::{Path, Query, SharerUserId, ValidatedJson},
    error::AppResult,
    models::{
        comment::CreateComment,
        item::{CreateItem, SearchQuery, UpdateItem},
    },
};

pub async fn list_items(
    State(state): State<GatewayState>,
    SharerUserId(user_id): SharerUserId,
) -> AppResult<Response> {
    state.client.forward(Forward::get("/items").as_user(user_id)).await
}

pub async fn get_item(
    State(state): State<GatewayState>,
    SharerUserId(user_id): SharerUserId,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    let call = Forward::get(format!("/items/{}", id)).as_user(user_id);
    state.client.forward(call).await
}

pub async fn create_item(
    State(state): State<GatewayState>,
    SharerUserId(user_id): SharerUserId,
    ValidatedJson(item): ValidatedJson<CreateItem>,
) -> AppResult<Response> {
    let call = Forward::new(Method::POST, "/items").as_user(user_id).json(&item)?;
    state.client.forward(call).await
}

pub async fn update_item(
    State(state): State<GatewayState>,
    SharerUserId(user_id): SharerUserId,
    Path(id): Path<i64>,
    ValidatedJson(item): ValidatedJson<UpdateItem>,
) -> AppResult<Response> {
    let call = Forward::new(Method::PATCH, format!("/items/{}", id))
        .as_user(user_id)
        .json(&item)?;
    state.client.forward(call).await
}

pub async fn search_items(
    State(state): State<GatewayState>,
    SharerUserId(user_id): SharerUserId,
    Query(query): Query<SearchQuery>,
) -> AppResult<Response> {
    let mut call = Forward::get("/items/search").as_user(user_id);
    if let Some(text) = query.text {
        call = call.query("text", text);
    }
    state.client.forward(call).await
}

pub async fn create_comment(
    State(state): State<GatewayState>,
    SharerUserId(user_id): SharerUserId,
    Path(id): Path<i64>,
    ValidatedJson(comment): ValidatedJson<CreateComment>,
) -> AppResult<Response> {
    let call = Forward::new(Method::POST, format!("/items/{}/comment", id))
        .as_user(user_id)
        .json(&comment)?;
    state.client.forward(call).await
}
