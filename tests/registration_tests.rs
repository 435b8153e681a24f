//! Registration endpoint tests: the seat-booking taxonomy, seat
//! conservation, and the attendance listing.

mod support;

use axum::http::StatusCode;
use serde_json::json;
use support::{TestApp, ALICE, BOB, CAROL, DAVE};

#[tokio::test]
async fn registration_requires_a_principal() {
    let app = TestApp::new();
    let key = app.create_conference(ALICE, "X", 2).await;

    let (status, _) = app
        .post(&format!("/conference/{key}/registration"), None, None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn seats_run_out_in_arrival_order() {
    let app = TestApp::new();
    let key = app.create_conference(ALICE, "X", 2).await;
    let path = format!("/conference/{key}/registration");

    let (status, body) = app.post(&path, Some(BOB), None).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["result"], true);
    assert_eq!(body["reason"], "Registration successful");

    let (status, _) = app.post(&path, Some(CAROL), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.post(&path, Some(DAVE), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "There are no seats available");

    assert_eq!(app.seats_available(&key).await, 0);
}

#[tokio::test]
async fn double_registration_is_a_conflict_without_state_change() {
    let app = TestApp::new();
    let key = app.create_conference(ALICE, "X", 2).await;
    let path = format!("/conference/{key}/registration");

    app.post(&path, Some(BOB), None).await;
    let (status, body) = app.post(&path, Some(BOB), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "You have already registered");
    assert_eq!(app.seats_available(&key).await, 1);
}

#[tokio::test]
async fn registering_for_an_unknown_conference_is_not_found() {
    let app = TestApp::new();
    let (status, body) = app
        .post("/conference/bogus-key/registration", Some(BOB), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "No Conference found with key: bogus-key");
}

#[tokio::test]
async fn unregistering_returns_the_seat_and_forgets_the_attendance() {
    let app = TestApp::new();
    let key = app.create_conference(ALICE, "X", 2).await;
    let path = format!("/conference/{key}/registration");

    app.post(&path, Some(BOB), None).await;
    assert_eq!(app.seats_available(&key).await, 1);

    let (status, body) = app.delete(&path, Some(BOB)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], true);
    assert_eq!(app.seats_available(&key).await, 2);

    let (_, attending) = app.get("/getConferencesToAttend", Some(BOB)).await;
    assert_eq!(attending, json!([]));

    // A second unregistration has nothing to remove.
    let (status, body) = app.delete(&path, Some(BOB)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid conferenceKey");
    assert_eq!(app.seats_available(&key).await, 2);
}

#[tokio::test]
async fn register_then_unregister_restores_the_pre_state() {
    let app = TestApp::new();
    let key = app.create_conference(ALICE, "X", 3).await;
    let path = format!("/conference/{key}/registration");

    let before = app.seats_available(&key).await;
    app.post(&path, Some(BOB), None).await;
    app.delete(&path, Some(BOB)).await;
    assert_eq!(app.seats_available(&key).await, before);
}

#[tokio::test]
async fn attendance_listing_requires_a_persisted_profile() {
    let app = TestApp::new();

    let (status, _) = app.get("/getConferencesToAttend", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app.get("/getConferencesToAttend", Some(BOB)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Profile doesn't exist.");
}

#[tokio::test]
async fn attendance_listing_preserves_registration_order() {
    let app = TestApp::new();
    let first = app.create_conference(ALICE, "First", 5).await;
    let second = app.create_conference(ALICE, "Second", 5).await;

    app.post(&format!("/conference/{second}/registration"), Some(BOB), None)
        .await;
    app.post(&format!("/conference/{first}/registration"), Some(BOB), None)
        .await;

    let (status, body) = app.get("/getConferencesToAttend", Some(BOB)).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Second", "First"]);
}
