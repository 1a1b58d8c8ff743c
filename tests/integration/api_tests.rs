//! API integration tests
//!
//! These run against a live gateway (or server) with a database behind it.
//! Point them elsewhere with `SHAREIT_TEST_URL`.

use std::time::Duration;

use chrono::Local;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

const SHARER_USER_ID: &str = "X-Sharer-User-Id";

fn base_url() -> String {
    std::env::var("SHAREIT_TEST_URL").unwrap_or_else(|_| "http://localhost:8080".to_string())
}

fn at_offset(seconds: i64) -> String {
    (Local::now().naive_local() + chrono::Duration::seconds(seconds))
        .format("%Y-%m-%dT%H:%M:%S")
        .to_string()
}

/// Register a user with an email nobody else has
async fn create_user(client: &Client, name: &str) -> i64 {
    let nanos = Local::now().timestamp_nanos_opt().unwrap_or_default();
    let response = client
        .post(format!("{}/users", base_url()))
        .json(&json!({
            "name": name,
            "email": format!("{}.{}@example.com", name.to_lowercase(), nanos)
        }))
        .send()
        .await
        .expect("Failed to create user");

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse user");
    body["id"].as_i64().expect("No id in user")
}

async fn create_item(client: &Client, owner: i64, name: &str) -> i64 {
    let response = client
        .post(format!("{}/items", base_url()))
        .header(SHARER_USER_ID, owner)
        .json(&json!({
            "name": name,
            "description": format!("{} in good condition", name),
            "available": true
        }))
        .send()
        .await
        .expect("Failed to create item");

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("Failed to parse item");
    body["id"].as_i64().expect("No id in item")
}

async fn book(client: &Client, booker: i64, item: i64, start: i64, end: i64) -> reqwest::Response {
    client
        .post(format!("{}/bookings", base_url()))
        .header(SHARER_USER_ID, booker)
        .json(&json!({
            "itemId": item,
            "start": at_offset(start),
            "end": at_offset(end)
        }))
        .send()
        .await
        .expect("Failed to send booking")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", base_url()))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_duplicate_email_is_conflict() {
    let client = Client::new();
    let id = create_user(&client, "Dup").await;

    let user: Value = client
        .get(format!("{}/users/{}", base_url(), id))
        .send()
        .await
        .expect("Failed to fetch user")
        .json()
        .await
        .expect("Failed to parse user");

    let response = client
        .post(format!("{}/users", base_url()))
        .json(&json!({"name": "Other", "email": user["email"]}))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore]
async fn test_owner_cannot_book_own_item() {
    let client = Client::new();
    let owner = create_user(&client, "Owner").await;
    let item = create_item(&client, owner, "Ladder").await;

    let response = book(&client, owner, item, 3600, 7200).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore]
async fn test_booking_lifecycle() {
    let client = Client::new();
    let owner = create_user(&client, "Owner").await;
    let booker = create_user(&client, "Booker").await;
    let item = create_item(&client, owner, "Drill").await;

    let response = book(&client, booker, item, 3600, 7200).await;
    assert_eq!(response.status(), StatusCode::OK);
    let booking: Value = response.json().await.expect("Failed to parse booking");
    assert_eq!(booking["status"], "WAITING");
    let booking_id = booking["id"].as_i64().expect("No id in booking");

    // Only the owner decides
    let response = client
        .patch(format!("{}/bookings/{}?approved=true", base_url(), booking_id))
        .header(SHARER_USER_ID, booker)
        .send()
        .await
        .expect("Failed to send approval");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = client
        .patch(format!("{}/bookings/{}?approved=true", base_url(), booking_id))
        .header(SHARER_USER_ID, owner)
        .send()
        .await
        .expect("Failed to send approval");
    assert_eq!(response.status(), StatusCode::OK);
    let approved: Value = response.json().await.expect("Failed to parse booking");
    assert_eq!(approved["status"], "APPROVED");

    // Decisions are final
    let response = client
        .patch(format!("{}/bookings/{}?approved=false", base_url(), booking_id))
        .header(SHARER_USER_ID, owner)
        .send()
        .await
        .expect("Failed to send rejection");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // The owner sees the upcoming booking, the booker does not
    let owner_view: Value = client
        .get(format!("{}/items/{}", base_url(), item))
        .header(SHARER_USER_ID, owner)
        .send()
        .await
        .expect("Failed to fetch item")
        .json()
        .await
        .expect("Failed to parse item");
    assert_eq!(owner_view["nextBooking"]["id"], booking_id);

    let booker_view: Value = client
        .get(format!("{}/items/{}", base_url(), item))
        .header(SHARER_USER_ID, booker)
        .send()
        .await
        .expect("Failed to fetch item")
        .json()
        .await
        .expect("Failed to parse item");
    assert!(booker_view["nextBooking"].is_null());

    let future: Value = client
        .get(format!("{}/bookings/owner?state=FUTURE", base_url()))
        .header(SHARER_USER_ID, owner)
        .send()
        .await
        .expect("Failed to list bookings")
        .json()
        .await
        .expect("Failed to parse bookings");
    assert!(future
        .as_array()
        .expect("Expected a list")
        .iter()
        .any(|b| b["id"] == booking_id));
}

#[tokio::test]
#[ignore]
async fn test_comment_after_finished_booking() {
    let client = Client::new();
    let owner = create_user(&client, "Owner").await;
    let booker = create_user(&client, "Booker").await;
    let item = create_item(&client, owner, "Saw").await;

    let comment_url = format!("{}/items/{}/comment", base_url(), item);

    let response = client
        .post(&comment_url)
        .header(SHARER_USER_ID, booker)
        .json(&json!({"text": "Sharp"}))
        .send()
        .await
        .expect("Failed to send comment");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let booking: Value = book(&client, booker, item, 2, 3)
        .await
        .json()
        .await
        .expect("Failed to parse booking");
    client
        .patch(format!("{}/bookings/{}?approved=true", base_url(), booking["id"]))
        .header(SHARER_USER_ID, owner)
        .send()
        .await
        .expect("Failed to send approval");

    tokio::time::sleep(Duration::from_secs(5)).await;

    let response = client
        .post(&comment_url)
        .header(SHARER_USER_ID, booker)
        .json(&json!({"text": "Sharp"}))
        .send()
        .await
        .expect("Failed to send comment");
    assert_eq!(response.status(), StatusCode::OK);
    let comment: Value = response.json().await.expect("Failed to parse comment");
    assert_eq!(comment["authorName"], "Booker");
}

#[tokio::test]
#[ignore]
async fn test_requests_list_answers() {
    let client = Client::new();
    let requestor = create_user(&client, "Requestor").await;
    let helper = create_user(&client, "Helper").await;

    let request: Value = client
        .post(format!("{}/requests", base_url()))
        .header(SHARER_USER_ID, requestor)
        .json(&json!({"description": "Looking for a tent"}))
        .send()
        .await
        .expect("Failed to create request")
        .json()
        .await
        .expect("Failed to parse request");
    let request_id = request["id"].as_i64().expect("No id in request");

    let response = client
        .post(format!("{}/items", base_url()))
        .header(SHARER_USER_ID, helper)
        .json(&json!({
            "name": "Tent",
            "description": "Two-person tent",
            "available": true,
            "requestId": request_id
        }))
        .send()
        .await
        .expect("Failed to create item");
    assert_eq!(response.status(), StatusCode::OK);

    let fetched: Value = client
        .get(format!("{}/requests/{}", base_url(), request_id))
        .header(SHARER_USER_ID, helper)
        .send()
        .await
        .expect("Failed to fetch request")
        .json()
        .await
        .expect("Failed to parse request");
    assert_eq!(fetched["items"][0]["name"], "Tent");
    assert_eq!(fetched["requestor"]["id"], requestor);
}

#[tokio::test]
#[ignore]
async fn test_unknown_state_is_rejected() {
    let client = Client::new();
    let user = create_user(&client, "Lister").await;

    let response = client
        .get(format!("{}/bookings?state=UNSUPPORTED_STATUS", base_url()))
        .header(SHARER_USER_ID, user)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["message"], "Unknown state: UNSUPPORTED_STATUS");
}
