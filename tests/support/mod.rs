//! In-process test application harness
//!
//! Drives the real router over an in-memory store; requests run through
//! `tower::ServiceExt::oneshot`, no sockets involved.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use conference_central::{api::create_router, state::AppState, Config};

pub const ALICE: (&str, &str) = ("u1", "alice@ex.com");
pub const BOB: (&str, &str) = ("u2", "bob@ex.com");
pub const CAROL: (&str, &str) = ("u3", "carol@ex.com");
pub const DAVE: (&str, &str) = ("u4", "dave@ex.com");

pub struct TestApp {
    pub state: AppState,
}

impl TestApp {
    pub fn new() -> Self {
        Self {
            state: AppState::new(Config::default()),
        }
    }

    pub async fn request(
        &self,
        method: Method,
        path: &str,
        principal: Option<(&str, &str)>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some((user_id, email)) = principal {
            builder = builder
                .header("x-user-id", user_id)
                .header("x-user-email", email);
        }
        let request = match body {
            Some(value) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(value.to_string()))
                .expect("request"),
            None => builder.body(Body::empty()).expect("request"),
        };

        let response = create_router(self.state.clone())
            .oneshot(request)
            .await
            .expect("infallible");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, value)
    }

    pub async fn get(&self, path: &str, principal: Option<(&str, &str)>) -> (StatusCode, Value) {
        self.request(Method::GET, path, principal, None).await
    }

    pub async fn post(
        &self,
        path: &str,
        principal: Option<(&str, &str)>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        self.request(Method::POST, path, principal, body).await
    }

    pub async fn delete(&self, path: &str, principal: Option<(&str, &str)>) -> (StatusCode, Value) {
        self.request(Method::DELETE, path, principal, None).await
    }

    /// Create a conference as `organizer` and return its websafe key.
    pub async fn create_conference(
        &self,
        organizer: (&str, &str),
        name: &str,
        max_attendees: u32,
    ) -> String {
        let (status, body) = self
            .post(
                "/conference",
                Some(organizer),
                Some(json!({ "name": name, "maxAttendees": max_attendees })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create conference: {body}");
        body["websafeConferenceKey"]
            .as_str()
            .expect("websafe key in response")
            .to_string()
    }

    /// Current `seatsAvailable` of a conference, read through the API.
    pub async fn seats_available(&self, websafe_key: &str) -> u64 {
        let (status, body) = self.get(&format!("/conference/{websafe_key}"), None).await;
        assert_eq!(status, StatusCode::OK, "get conference: {body}");
        body["seatsAvailable"].as_u64().expect("seatsAvailable")
    }
}
