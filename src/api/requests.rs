//! Item request endpoints

use axum::{extract::State, Json};

use crate::{
    error::{AppResult, ErrorResponse},
    models::{
        page::{PageQuery, PageRequest},
        request::{CreateItemRequest, ItemRequestResponse},
    },
};

use super::{Path, Query, SharerUserId, ValidatedJson};

/// Post a request for an item nobody lists yet
#[utoipa::path(
    post,
    path = "/requests",
    tag = "requests",
    params(
        ("X-Sharer-User-Id" = i64, Header, description = "Requestor")
    ),
    request_body = CreateItemRequest,
    responses(
        (status = 200, description = "Request created", body = ItemRequestResponse),
        (status = 400, description = "Blank description", body = ErrorResponse),
        (status = 404, description = "Requestor not found", body = ErrorResponse)
    )
)]
pub async fn create_request(
    State(state): State<crate::AppState>,
    SharerUserId(user_id): SharerUserId,
    ValidatedJson(request): ValidatedJson<CreateItemRequest>,
) -> AppResult<Json<ItemRequestResponse>> {
    let created = state.services.requests.create_request(user_id, request).await?;
    Ok(Json(created))
}

/// The caller's own requests with the items listed in answer
#[utoipa::path(
    get,
    path = "/requests",
    tag = "requests",
    params(
        ("X-Sharer-User-Id" = i64, Header, description = "Requestor")
    ),
    responses(
        (status = 200, description = "Requests, newest first", body = Vec<ItemRequestResponse>)
    )
)]
pub async fn list_own_requests(
    State(state): State<crate::AppState>,
    SharerUserId(user_id): SharerUserId,
) -> AppResult<Json<Vec<ItemRequestResponse>>> {
    let requests = state.services.requests.list_own(user_id).await?;
    Ok(Json(requests))
}

/// Other users' requests, paginated
#[utoipa::path(
    get,
    path = "/requests/all",
    tag = "requests",
    params(
        PageQuery,
        ("X-Sharer-User-Id" = i64, Header, description = "Acting user")
    ),
    responses(
        (status = 200, description = "Requests, newest first", body = Vec<ItemRequestResponse>),
        (status = 400, description = "Bad page", body = ErrorResponse)
    )
)]
pub async fn list_other_requests(
    State(state): State<crate::AppState>,
    SharerUserId(user_id): SharerUserId,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Vec<ItemRequestResponse>>> {
    let page = PageRequest::try_from(&query)?;
    let requests = state.services.requests.list_others(user_id, page).await?;
    Ok(Json(requests))
}

#[utoipa::path(
    get,
    path = "/requests/{id}",
    tag = "requests",
    params(
        ("id" = i64, Path, description = "Request ID"),
        ("X-Sharer-User-Id" = i64, Header, description = "Acting user")
    ),
    responses(
        (status = 200, description = "Request with its items", body = ItemRequestResponse),
        (status = 404, description = "Request not found", body = ErrorResponse)
    )
)]
pub async fn get_request(
    State(state): State<crate::AppState>,
    SharerUserId(user_id): SharerUserId,
    Path(id): Path<i64>,
) -> AppResult<Json<ItemRequestResponse>> {
    let request = state.services.requests.get_request(user_id, id).await?;
    Ok(Json(request))
}
