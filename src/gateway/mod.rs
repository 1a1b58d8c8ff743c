//! Validating gateway.
//!
//! Exposes the same routes as the server. Each handler checks the caller
//! header, the body and the query parameters, then forwards the call to the
//! server and relays whatever it answers.

pub mod bookings;
pub mod client;
pub mod items;
pub mod requests;
pub mod users;

use axum::{
    extract::State,
    response::Response,
    routing::{get, post},
    Json, Router,
};

pub use client::{Forward, ShareItClient};

use crate::{
    api::{health::HealthResponse, with_layers},
    error::AppResult,
};

/// State shared by gateway handlers
#[derive(Clone)]
pub struct GatewayState {
    pub client: ShareItClient,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::new("healthy"))
}

/// The gateway is ready when the server is
async fn readiness_check(State(state): State<GatewayState>) -> AppResult<Response> {
    state.client.forward(Forward::get("/ready")).await
}

/// Create the gateway router with all routes
pub fn router(state: GatewayState) -> Router {
    let api = Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        // Users
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/:id",
            get(users::get_user)
                .patch(users::update_user)
                .delete(users::delete_user),
        )
        // Items
        .route("/items", get(items::list_items).post(items::create_item))
        .route("/items/search", get(items::search_items))
        .route("/items/:id", get(items::get_item).patch(items::update_item))
        .route("/items/:id/comment", post(items::create_comment))
        // Bookings
        .route("/bookings", get(bookings::list_bookings).post(bookings::create_booking))
        .route("/bookings/owner", get(bookings::list_owner_bookings))
        .route("/bookings/:id", get(bookings::get_booking).patch(bookings::decide_booking))
        // Item requests
        .route("/requests", get(requests::list_own_requests).post(requests::create_request))
        .route("/requests/all", get(requests::list_other_requests))
        .route("/requests/:id", get(requests::get_request))
        .with_state(state);

    with_layers(api)
}
