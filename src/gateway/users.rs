//! Gateway user routes

use axum::{
    extract::State,
    http::Method,
    response::Response,
};

use super::{client::Forward, GatewayState};
use crate::{
    api::{Path, ValidatedJson},
    error::AppResult,
    models::user::{CreateUser, UpdateUser},
};

pub async fn list_users(State(state): State<GatewayState>) -> AppResult<Response> {
    state.client.forward(Forward::get("/users")).await
}

pub async fn get_user(State(state): State<GatewayState>, Path(id): Path<i64>) -> AppResult<Response> {
    state.client.forward(Forward::get(format!("/users/{}", id))).await
}

pub async fn create_user(
    State(state): State<GatewayState>,
    ValidatedJson(user): ValidatedJson<CreateUser>,
) -> AppResult<Response> {
    let call = Forward::new(Method::POST, "/users").json(&user)?;
    state.client.forward(call).await
}

pub async fn update_user(
    State(state): State<GatewayState>,
    Path(id): Path<i64>,
    ValidatedJson(user): ValidatedJson<UpdateUser>,
) -> AppResult<Response> {
    let call = Forward::new(Method::PATCH, format!("/users/{}", id)).json(&user)?;
    state.client.forward(call).await
}

pub async fn delete_user(State(state): State<GatewayState>, Path(id): Path<i64>) -> AppResult<Response> {
    state
        .client
        .forward(Forward::new(Method::DELETE, format!("/users/{}", id)))
        .await
}
