//! Gateway booking routes. Periods, states and pages are checked here
//! so obviously bad calls never reach the server.

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
        self,
        booking::{ApprovalQuery, BookingListQuery, CreateBooking},
    },
};

pub async fn create_booking(
    State(state): State<GatewayState>,
    SharerUserId(user_id): SharerUserId,
    ValidatedJson(booking): ValidatedJson<CreateBooking>,
) -> AppResult<Response> {
    booking.period(models::now())?;

    let call = Forward::new(Method::POST, "/bookings")
        .as_user(user_id)
        .json(&booking)?;
    state.client.forward(call).await
}

pub async fn decide_booking(
    State(state): State<GatewayState>,
    SharerUserId(user_id): SharerUserId,
    Path(id): Path<i64>,
    Query(query): Query<ApprovalQuery>,
) -> AppResult<Response> {
    let call = Forward::new(Method::PATCH, format!("/bookings/{}", id))
        .as_user(user_id)
        .query("approved", query.approved);
    state.client.forward(call).await
}

pub async fn get_booking(
    State(state): State<GatewayState>,
    SharerUserId(user_id): SharerUserId,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    let call = Forward::get(format!("/bookings/{}", id)).as_user(user_id);
    state.client.forward(call).await
}

pub async fn list_bookings(
    State(state): State<GatewayState>,
    SharerUserId(user_id): SharerUserId,
    Query(query): Query<BookingListQuery>,
) -> AppResult<Response> {
    forward_list(&state, "/bookings", user_id, &query).await
}

pub async fn list_owner_bookings(
    State(state): State<GatewayState>,
    SharerUserId(user_id): SharerUserId,
    Query(query): Query<BookingListQuery>,
) -> AppResult<Response> {
    forward_list(&state, "/bookings/owner", user_id, &query).await
}

async fn forward_list(
    state: &GatewayState,
    path: &str,
    user_id: i64,
    query: &BookingListQuery,
) -> AppResult<Response> {
    let (booking_state, page) = query.resolve()?;
    let call = Forward::get(path)
        .as_user(user_id)
        .query("state", booking_state)
        .query("from", page.from())
        .query("size", page.limit());
    state.client.forward(call).await
}
