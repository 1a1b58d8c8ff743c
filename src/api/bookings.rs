//! Booking endpoints

use axum::{extract::State, Json};

use crate::{
    error::{AppResult, ErrorResponse},
    models::booking::{ApprovalQuery, BookingListQuery, BookingResponse, CreateBooking},
};

use super::{Path, Query, SharerUserId, ValidatedJson};

/// Book an item
#[utoipa::path(
    post,
    path = "/bookings",
    tag = "bookings",
    params(
        ("X-Sharer-User-Id" = i64, Header, description = "Booker")
    ),
    request_body = CreateBooking,
    responses(
        (status = 200, description = "Booking created, waiting for approval", body = BookingResponse),
        (status = 400, description = "Invalid period, unavailable item or own item", body = ErrorResponse),
        (status = 404, description = "Booker or item not found", body = ErrorResponse)
    )
)]
pub async fn create_booking(
    State(state): State<crate::AppState>,
    SharerUserId(user_id): SharerUserId,
    ValidatedJson(booking): ValidatedJson<CreateBooking>,
) -> AppResult<Json<BookingResponse>> {
    let created = state.services.bookings.create_booking(user_id, booking).await?;
    Ok(Json(created))
}

/// Approve or reject a waiting booking
#[utoipa::path(
    patch,
    path = "/bookings/{id}",
    tag = "bookings",
    params(
        ("id" = i64, Path, description = "Booking ID"),
        ApprovalQuery,
        ("X-Sharer-User-Id" = i64, Header, description = "Owner of the booked item")
    ),
    responses(
        (status = 200, description = "Booking decided", body = BookingResponse),
        (status = 400, description = "Not the owner, or already decided", body = ErrorResponse),
        (status = 404, description = "Booking not found", body = ErrorResponse)
    )
)]
pub async fn decide_booking(
    State(state): State<crate::AppState>,
    SharerUserId(user_id): SharerUserId,
    Path(id): Path<i64>,
    Query(query): Query<ApprovalQuery>,
) -> AppResult<Json<BookingResponse>> {
    let booking = state.services.bookings.decide(user_id, id, query.approved).await?;
    Ok(Json(booking))
}

/// Get a booking (booker or item owner only)
#[utoipa::path(
    get,
    path = "/bookings/{id}",
    tag = "bookings",
    params(
        ("id" = i64, Path, description = "Booking ID"),
        ("X-Sharer-User-Id" = i64, Header, description = "Booker or item owner")
    ),
    responses(
        (status = 200, description = "Booking details", body = BookingResponse),
        (status = 404, description = "Booking not found for this user", body = ErrorResponse)
    )
)]
pub async fn get_booking(
    State(state): State<crate::AppState>,
    SharerUserId(user_id): SharerUserId,
    Path(id): Path<i64>,
) -> AppResult<Json<BookingResponse>> {
    let booking = state.services.bookings.get_booking(user_id, id).await?;
    Ok(Json(booking))
}

/// List bookings made by the caller
#[utoipa::path(
    get,
    path = "/bookings",
    tag = "bookings",
    params(
        BookingListQuery,
        ("X-Sharer-User-Id" = i64, Header, description = "Booker")
    ),
    responses(
        (status = 200, description = "Bookings, latest start first", body = Vec<BookingResponse>),
        (status = 400, description = "Unknown state or bad page", body = ErrorResponse)
    )
)]
pub async fn list_bookings(
    State(state): State<crate::AppState>,
    SharerUserId(user_id): SharerUserId,
    Query(query): Query<BookingListQuery>,
) -> AppResult<Json<Vec<BookingResponse>>> {
    let (booking_state, page) = query.resolve()?;
    let bookings = state
        .services
        .bookings
        .list_for_booker(user_id, booking_state, page)
        .await?;
    Ok(Json(bookings))
}

/// List bookings of the caller's items
#[utoipa::path(
    get,
    path = "/bookings/owner",
    tag = "bookings",
    params(
        BookingListQuery,
        ("X-Sharer-User-Id" = i64, Header, description = "Item owner")
    ),
    responses(
        (status = 200, description = "Bookings, latest start first", body = Vec<BookingResponse>),
        (status = 400, description = "Unknown state or bad page", body = ErrorResponse)
    )
)]
pub async fn list_owner_bookings(
    State(state): State<crate::AppState>,
    SharerUserId(user_id): SharerUserId,
    Query(query): Query<BookingListQuery>,
) -> AppResult<Json<Vec<BookingResponse>>> {
    let (booking_state, page) = query.resolve()?;
    let bookings = state
        .services
        .bookings
        .list_for_owner(user_id, booking_state, page)
        .await?;
    Ok(Json(bookings))
}
