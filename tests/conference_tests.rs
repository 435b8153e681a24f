//! Conference endpoint tests: creation, key round-trips, and the
//! created-by-caller listing.

mod support;

use axum::http::StatusCode;
use serde_json::json;
use support::{TestApp, ALICE, BOB};

#[tokio::test]
async fn creating_a_conference_requires_a_principal() {
    let app = TestApp::new();
    let (status, _) = app
        .post("/conference", None, Some(json!({ "name": "X" })))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn created_conference_starts_with_all_seats_available() {
    let app = TestApp::new();
    let (status, body) = app
        .post(
            "/conference",
            Some(ALICE),
            Some(json!({
                "name": "X",
                "city": "London",
                "topics": ["Web Technologies"],
                "startDate": "2026-01-15",
                "endDate": "2026-01-17",
                "maxAttendees": 2
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["seatsAvailable"], 2);
    assert_eq!(body["maxAttendees"], 2);
    assert_eq!(body["month"], 1);
    assert_eq!(body["organizerUserId"], "u1");
    // Organizer profile was materialized in the same commit.
    assert_eq!(body["organizerDisplayName"], "alice");
    assert!(body["websafeConferenceKey"].as_str().is_some());
}

#[tokio::test]
async fn conferences_are_readable_without_authentication() {
    let app = TestApp::new();
    let key = app.create_conference(ALICE, "X", 5).await;

    let (status, body) = app.get(&format!("/conference/{key}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "X");
    assert_eq!(body["websafeConferenceKey"], key.as_str());
}

#[tokio::test]
async fn unknown_keys_are_not_found() {
    let app = TestApp::new();

    let (status, body) = app.get("/conference/not-a-real-key", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body["message"],
        "No Conference found with key: not-a-real-key"
    );
}

#[tokio::test]
async fn nameless_conferences_are_rejected() {
    let app = TestApp::new();
    let (status, body) = app
        .post(
            "/conference",
            Some(ALICE),
            Some(json!({ "name": "", "maxAttendees": 5 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn created_listing_is_scoped_to_the_caller() {
    let app = TestApp::new();
    app.create_conference(ALICE, "A", 5).await;
    app.create_conference(ALICE, "B", 5).await;
    app.create_conference(BOB, "C", 5).await;

    let (status, body) = app.post("/getConferencesCreated", Some(ALICE), None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["A", "B"]);

    let (status, _) = app.post("/getConferencesCreated", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
