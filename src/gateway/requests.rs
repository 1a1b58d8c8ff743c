//! Gateway item request routes

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
        page::{PageQuery, PageRequest},
        request::CreateItemRequest,
    },
};

pub async fn create_request(
    State(state): State<GatewayState>,
    SharerUserId(user_id): SharerUserId,
    ValidatedJson(request): ValidatedJson<CreateItemRequest>,
) -> AppResult<Response> {
    let call = Forward::new(Method::POST, "/requests")
        .as_user(user_id)
        .json(&request)?;
    state.client.forward(call).await
}

pub async fn list_own_requests(
    State(state): State<GatewayState>,
    SharerUserId(user_id): SharerUserId,
) -> AppResult<Response> {
    state.client.forward(Forward::get("/requests").as_user(user_id)).await
}

pub async fn list_other_requests(
    State(state): State<GatewayState>,
    SharerUserId(user_id): SharerUserId,
    Query(query): Query<PageQuery>,
) -> AppResult<Response> {
    let page = PageRequest::try_from(&query)?;
    let call = Forward::get("/requests/all")
        .as_user(user_id)
        .query("from", page.from())
        .query("size", page.limit());
    state.client.forward(call).await
}

pub async fn get_request(
    State(state): State<GatewayState>,
    SharerUserId(user_id): SharerUserId,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    let call = Forward::get(format!("/requests/{}", id)).as_user(user_id);
    state.client.forward(call).await
}
